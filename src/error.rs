use thiserror::Error;

// ─── Rewrite pipeline errors ────────────────────────────────────────────────

/// Failure taxonomy for a single rewrite invocation.
///
/// Every variant is terminal for the invocation that produced it. The HTTP
/// boundary collapses all of them into one generic message; the variant and its
/// payload are only ever written to the log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// Request failed shape or length checks before any model call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Model returned no text at all.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// Model text could not be parsed as JSON, even after brace-span recovery.
    #[error("malformed model output: {0}")]
    MalformedOutput(String),

    /// Parsed JSON has the wrong fields, types or cardinality.
    #[error("schema violation: {0}")]
    SchemaViolation(String),

    /// The model call or the history read failed.
    #[error("service failure: {0}")]
    ServiceFailure(String),
}

impl RewriteError {
    /// Stable label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::EmptyResponse => "empty_response",
            Self::MalformedOutput(_) => "malformed_output",
            Self::SchemaViolation(_) => "schema_violation",
            Self::ServiceFailure(_) => "service_failure",
        }
    }

    /// True when the failure was caught before the model was contacted.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
