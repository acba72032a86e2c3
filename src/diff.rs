//! Word-level change highlighting between a source text and a rewrite.
//!
//! This is set membership, not an alignment: a rewritten word is unchanged if
//! the same whitespace-delimited token appears anywhere in the original.
//! Position, reordering, and attached punctuation are not considered.

use crate::ui::style;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffToken {
    pub text: String,
    pub changed: bool,
}

/// Tag every word of `rewritten` as changed or not relative to `original`.
pub fn highlight_differences(original: &str, rewritten: &str) -> Vec<DiffToken> {
    let known: HashSet<&str> = original.split_whitespace().collect();
    rewritten
        .split_whitespace()
        .map(|word| DiffToken {
            text: word.to_string(),
            changed: !known.contains(word),
        })
        .collect()
}

/// Plain rendering: changed words wrapped as `[[word]]`.
pub fn render_marked(tokens: &[DiffToken]) -> String {
    join_with(tokens, |t| format!("[[{}]]", t.text))
}

/// Terminal rendering with changed words highlighted.
pub fn render_terminal(tokens: &[DiffToken]) -> String {
    join_with(tokens, |t| style::changed(&t.text))
}

fn join_with(tokens: &[DiffToken], mark: impl Fn(&DiffToken) -> String) -> String {
    tokens
        .iter()
        .map(|t| if t.changed { mark(t) } else { t.text.clone() })
        .collect::<Vec<_>>()
        .join(" ")
}
