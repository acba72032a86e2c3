use crate::error::RewriteError;
use serde::{Deserialize, Serialize};

/// Minimum source length for an email rewrite, in characters.
pub const MIN_SOURCE_CHARS: usize = 10;
/// Minimum subject length, in characters.
pub const MIN_SUBJECT_CHARS: usize = 3;

/// Grammar-only correction or full stylistic rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RewriteMode {
    #[default]
    Rewrite,
    Grammar,
}

impl RewriteMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rewrite => "rewrite",
            Self::Grammar => "grammar",
        }
    }
}

impl std::fmt::Display for RewriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RewriteMode {
    type Err = RewriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rewrite" => Ok(Self::Rewrite),
            "grammar" => Ok(Self::Grammar),
            other => Err(RewriteError::InvalidRequest(format!(
                "unknown mode `{other}` (expected rewrite or grammar)"
            ))),
        }
    }
}

/// An email body plus the stylistic settings it should be rewritten to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRequest {
    #[serde(rename = "emailText", alias = "sourceText")]
    pub source_text: String,
    pub purpose: String,
    pub tone: String,
    pub length: String,
    pub audience: String,
    pub mode: RewriteMode,
}

impl RewriteRequest {
    pub fn validate(&self) -> Result<(), RewriteError> {
        let chars = self.source_text.chars().count();
        if chars < MIN_SOURCE_CHARS {
            return Err(RewriteError::InvalidRequest(format!(
                "emailText must be at least {MIN_SOURCE_CHARS} characters (got {chars})"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRequest {
    pub subject: String,
    pub tone: String,
    pub audience: String,
}

impl SubjectRequest {
    pub fn validate(&self) -> Result<(), RewriteError> {
        let chars = self.subject.chars().count();
        if chars < MIN_SUBJECT_CHARS {
            return Err(RewriteError::InvalidRequest(format!(
                "subject must be at least {MIN_SUBJECT_CHARS} characters (got {chars})"
            )));
        }
        Ok(())
    }
}

/// One model-produced rewrite and the model's rationale for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteCandidate {
    pub email: String,
    pub explanation: String,
}
