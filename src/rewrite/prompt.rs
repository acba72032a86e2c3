//! Instruction envelopes sent to the model.
//!
//! Each envelope has four parts in a fixed order: a rule preamble for the
//! mode, the source text inside a quote fence, the settings as `Key: value`
//! lines, and an output example matching the contract the validator enforces.
//! Builders are pure; identical inputs give byte-identical prompts.

use super::types::{RewriteMode, RewriteRequest, SubjectRequest};

const MIN_FENCE_QUOTES: usize = 3;

const GRAMMAR_RULES: [&str; 11] = [
    "You are a grammar correction assistant.",
    "",
    "STRICT RULES:",
    "- Fix grammar, spelling, punctuation only.",
    "- Do NOT rephrase sentences.",
    "- Preserve sentence structure exactly.",
    "- Output VALID JSON ONLY. No explanations outside the JSON, no markdown.",
    "- Generate exactly 2 rewritten versions.",
    "- Each version must be a complete email.",
    "- Do not return fewer or more than 2 items in the rewrites array.",
    "- Both versions must differ in word choice while adhering to the above rules.",
];

const REWRITE_RULES: [&str; 13] = [
    "You are a professional email rewriting assistant.",
    "",
    "STRICT CONSTRAINTS:",
    "- Preserve the original intent exactly.",
    "- Do NOT add new facts, assumptions, or promises.",
    "- Improve grammar, clarity, and tone only.",
    "- Match the specified purpose, tone, length, and audience.",
    "- Output VALID JSON ONLY. No markdown or commentary.",
    "- Avoid language that sounds defensive, confrontational, or accusatory, especially when addressing managers.",
    "- Frame requests as alignment and clarification, not negotiation or pushback.",
    "- Each rewritten version must be a complete email including greeting, body, and closing/signature.",
    "- Generate at least 2 rewritten versions.",
    "- All newline characters inside strings MUST be escaped as \\n",
];

const SUBJECT_RULES: [&str; 8] = [
    "You are a professional email subject line rewriting assistant.",
    "",
    "STRICT CONSTRAINTS:",
    "- Preserve the original intent.",
    "- Do NOT add new information or assumptions.",
    "- Improve clarity, tone, and professionalism only.",
    "- Match the specified tone and audience.",
    "- Output VALID JSON ONLY. No markdown. No explanations.",
];

const GRAMMAR_OUTPUT_EXAMPLE: &str = r#"{
  "rewrites": [
    {
      "email": "corrected email text",
      "explanation": "explanation of changes"
    },
    {
      "email": "corrected email text",
      "explanation": "explanation of changes"
    }
  ]
}"#;

const REWRITE_OUTPUT_EXAMPLE: &str = r#"{
  "rewrites": [
    {
      "email": "full mail body including greeting, body, and closing/signature",
      "explanation": "brief explanation of changes"
    },
    {
      "email": "full mail body including greeting, body, and closing/signature",
      "explanation": "brief explanation of changes"
    }
  ]
}"#;

const SUBJECT_OUTPUT_EXAMPLE: &str = r#"{
  "subjects": [
    "string",
    "string"
  ]
}"#;

/// Build the instruction for an email request; the rule set follows `request.mode`.
pub fn build_rewrite_prompt(request: &RewriteRequest) -> String {
    let (rules, example): (&[&str], &str) = match request.mode {
        RewriteMode::Grammar => (&GRAMMAR_RULES, GRAMMAR_OUTPUT_EXAMPLE),
        RewriteMode::Rewrite => (&REWRITE_RULES, REWRITE_OUTPUT_EXAMPLE),
    };

    assemble(
        rules,
        "INPUT EMAIL:",
        &request.source_text,
        &[
            ("Purpose", &request.purpose),
            ("Tone", &request.tone),
            ("Length", &request.length),
            ("Audience", &request.audience),
        ],
        example,
    )
}

pub fn build_subject_prompt(request: &SubjectRequest) -> String {
    assemble(
        &SUBJECT_RULES,
        "INPUT SUBJECT:",
        &request.subject,
        &[("Tone", &request.tone), ("Audience", &request.audience)],
        SUBJECT_OUTPUT_EXAMPLE,
    )
}

fn assemble(
    rules: &[&str],
    input_label: &str,
    source: &str,
    settings: &[(&str, &str)],
    example: &str,
) -> String {
    let fence = fence_for(source);
    let mut prompt = rules.join("\n");

    prompt.push_str("\n\n");
    prompt.push_str(input_label);
    prompt.push('\n');
    prompt.push_str(&fence);
    prompt.push('\n');
    prompt.push_str(source);
    prompt.push('\n');
    prompt.push_str(&fence);

    prompt.push_str("\n\nSETTINGS:\n");
    for (key, value) in settings {
        prompt.push_str(key);
        prompt.push_str(": ");
        prompt.push_str(&single_line(value));
        prompt.push('\n');
    }

    prompt.push_str("\nOUTPUT FORMAT:\n");
    prompt.push_str(example);
    prompt.push('\n');
    prompt
}

/// A run of double quotes longer than any run inside `text` (minimum three),
/// so nothing in the text can terminate the fence.
pub(crate) fn fence_for(text: &str) -> String {
    let longest_run = text
        .split(|c| c != '"')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let width = if longest_run < MIN_FENCE_QUOTES {
        MIN_FENCE_QUOTES
    } else {
        longest_run + 1
    };
    "\"".repeat(width)
}

/// Settings are single `Key: value` lines; embedded line breaks would let a
/// value masquerade as a rule.
fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
