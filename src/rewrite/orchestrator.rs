use super::contract::{validate_candidates, validate_subjects};
use super::extract::extract_json;
use super::prompt::{build_rewrite_prompt, build_subject_prompt};
use super::types::{RewriteCandidate, RewriteRequest, SubjectRequest};
use crate::config::Config;
use crate::error::RewriteError;
use crate::providers::{Provider, sanitize_api_error};
use crate::utils::text::truncate_with_ellipsis;
use std::sync::Arc;

const RAW_LOG_CHARS: usize = 300;

/// Runs one request through prompt, model call, extraction and validation.
///
/// Stateless apart from the immutable model settings; safe to share across
/// concurrent gateway requests behind an `Arc`.
pub struct RewriteOrchestrator {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f64,
}

impl RewriteOrchestrator {
    pub fn new(provider: Arc<dyn Provider>, config: &Config) -> Self {
        Self {
            provider,
            model: config.default_model.clone(),
            temperature: config.default_temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn rewrite_email(
        &self,
        request: &RewriteRequest,
    ) -> Result<Vec<RewriteCandidate>, RewriteError> {
        let result = self.run_email(request).await;
        match &result {
            Ok(candidates) => tracing::info!(
                mode = %request.mode,
                candidates = candidates.len(),
                "email rewrite completed"
            ),
            Err(e) => log_failure("rewrite_email", e),
        }
        result
    }

    pub async fn rewrite_subject(
        &self,
        request: &SubjectRequest,
    ) -> Result<Vec<String>, RewriteError> {
        let result = self.run_subject(request).await;
        match &result {
            Ok(subjects) => tracing::info!(subjects = subjects.len(), "subject rewrite completed"),
            Err(e) => log_failure("rewrite_subject", e),
        }
        result
    }

    async fn run_email(
        &self,
        request: &RewriteRequest,
    ) -> Result<Vec<RewriteCandidate>, RewriteError> {
        request.validate()?;
        let prompt = build_rewrite_prompt(request);
        let raw = self.complete(&prompt).await?;
        let value = extract_json(&raw)?;
        validate_candidates(&value, request.mode)
    }

    async fn run_subject(&self, request: &SubjectRequest) -> Result<Vec<String>, RewriteError> {
        request.validate()?;
        let prompt = build_subject_prompt(request);
        let raw = self.complete(&prompt).await?;
        let value = extract_json(&raw)?;
        validate_subjects(&value)
    }

    async fn complete(&self, prompt: &str) -> Result<String, RewriteError> {
        let raw = self
            .provider
            .chat(prompt, &self.model, self.temperature)
            .await
            .map_err(|e| RewriteError::ServiceFailure(sanitize_api_error(&format!("{e:#}"))))?;

        tracing::debug!(
            provider = self.provider.name(),
            model = %self.model,
            raw = %truncate_with_ellipsis(&raw, RAW_LOG_CHARS),
            "model output received"
        );

        if raw.trim().is_empty() {
            return Err(RewriteError::EmptyResponse);
        }
        Ok(raw)
    }
}

fn log_failure(operation: &str, error: &RewriteError) {
    if error.is_client_error() {
        tracing::warn!(operation, kind = error.kind(), error = %error, "rejected request");
    } else {
        tracing::error!(operation, kind = error.kind(), error = %error, "rewrite failed");
    }
}
