//! Structured-generation contract layer: prompt in, validated candidates out.

pub mod contract;
pub mod extract;
pub mod orchestrator;
pub mod prompt;
pub mod types;

pub use contract::{Cardinality, Contract, validate_candidates, validate_subjects};
pub use extract::extract_json;
pub use orchestrator::RewriteOrchestrator;
pub use prompt::{build_rewrite_prompt, build_subject_prompt};
pub use types::{
    MIN_SOURCE_CHARS, MIN_SUBJECT_CHARS, RewriteCandidate, RewriteMode, RewriteRequest,
    SubjectRequest,
};
