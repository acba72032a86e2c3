//! Output contracts the parsed model JSON must satisfy.
//!
//! Grammar mode requires exactly two candidates, rewrite mode at least two,
//! and subject suggestions at least two strings. Anything else is a
//! [`RewriteError::SchemaViolation`] naming the offending path.

use super::types::{RewriteCandidate, RewriteMode};
use crate::error::RewriteError;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Exactly(usize),
    AtLeast(usize),
}

impl Cardinality {
    pub fn admits(self, count: usize) -> bool {
        match self {
            Self::Exactly(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }

    fn describe(self) -> String {
        match self {
            Self::Exactly(n) => format!("exactly {n}"),
            Self::AtLeast(n) => format!("at least {n}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contract {
    Candidates(Cardinality),
    Subjects(Cardinality),
}

impl Contract {
    pub fn for_mode(mode: RewriteMode) -> Self {
        match mode {
            RewriteMode::Grammar => Self::Candidates(Cardinality::Exactly(2)),
            RewriteMode::Rewrite => Self::Candidates(Cardinality::AtLeast(2)),
        }
    }

    pub fn subjects() -> Self {
        Self::Subjects(Cardinality::AtLeast(2))
    }

    pub fn field(self) -> &'static str {
        match self {
            Self::Candidates(_) => "rewrites",
            Self::Subjects(_) => "subjects",
        }
    }

    fn cardinality(self) -> Cardinality {
        match self {
            Self::Candidates(c) | Self::Subjects(c) => c,
        }
    }
}

/// Check `value` against the candidate contract for `mode`.
pub fn validate_candidates(
    value: &Value,
    mode: RewriteMode,
) -> Result<Vec<RewriteCandidate>, RewriteError> {
    let contract = Contract::for_mode(mode);
    let field = contract.field();
    let entries = entries(value, contract)?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let Some(obj) = entry.as_object() else {
                return Err(violation(format!("{field}[{i}]: expected object")));
            };
            Ok(RewriteCandidate {
                email: string_field(obj.get("email"), &format!("{field}[{i}].email"))?,
                explanation: string_field(
                    obj.get("explanation"),
                    &format!("{field}[{i}].explanation"),
                )?,
            })
        })
        .collect()
}

/// Check `value` against the subject suggestion contract.
pub fn validate_subjects(value: &Value) -> Result<Vec<String>, RewriteError> {
    let contract = Contract::subjects();
    let field = contract.field();
    let entries = entries(value, contract)?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| string_field(Some(entry), &format!("{field}[{i}]")))
        .collect()
}

fn entries(value: &Value, contract: Contract) -> Result<&Vec<Value>, RewriteError> {
    let field = contract.field();
    let Some(obj) = value.as_object() else {
        return Err(violation(format!(
            "expected a top-level object, got {}",
            type_name(value)
        )));
    };
    let Some(raw) = obj.get(field) else {
        return Err(violation(format!("missing field `{field}`")));
    };
    let Some(list) = raw.as_array() else {
        return Err(violation(format!(
            "{field}: expected array, got {}",
            type_name(raw)
        )));
    };

    let cardinality = contract.cardinality();
    if !cardinality.admits(list.len()) {
        return Err(violation(format!(
            "{field}: expected {} entries, found {}",
            cardinality.describe(),
            list.len()
        )));
    }
    Ok(list)
}

fn string_field(value: Option<&Value>, path: &str) -> Result<String, RewriteError> {
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(violation(format!(
            "{path}: expected string, got {}",
            type_name(other)
        ))),
        None => Err(violation(format!("{path}: missing"))),
    }
}

fn violation(message: String) -> RewriteError {
    RewriteError::SchemaViolation(message)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
