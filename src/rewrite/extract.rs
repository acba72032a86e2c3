use crate::error::RewriteError;
use serde_json::Value;

/// Recover a JSON document from raw model output.
///
/// Tries the whole trimmed text first, then the greedy span from the first
/// `{` to the last `}`. The greedy span is intentional: nested objects stay
/// intact, but two separate objects in one reply yield an unparsable span.
pub fn extract_json(raw: &str) -> Result<Value, RewriteError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(RewriteError::EmptyResponse);
    }

    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }

    let Some(span) = brace_span(text) else {
        return Err(RewriteError::MalformedOutput(
            "no JSON object found in model output".into(),
        ));
    };

    serde_json::from_str::<Value>(span)
        .map_err(|e| RewriteError::MalformedOutput(format!("embedded JSON did not parse: {e}")))
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
