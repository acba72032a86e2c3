use crate::error::RewriteError;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::rewrite::{RewriteRequest, SubjectRequest};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::future::Future;

use super::AppState;

pub(super) const REWRITE_EMAIL_FAILED: &str = "Failed to rewrite email";
pub(super) const REWRITE_SUBJECT_FAILED: &str = "Failed to rewrite subject";
pub(super) const HISTORY_FAILED: &str = "Failed to load version history";
pub(super) const REQUEST_FAILED: &str = "Request failed";

/// Generic failure message for a route, if it is one of ours.
pub(super) fn failure_message_for(path: &str) -> Option<&'static str> {
    match path {
        "/rewrite-email" => Some(REWRITE_EMAIL_FAILED),
        "/rewrite-subject" => Some(REWRITE_SUBJECT_FAILED),
        "/version-history" => Some(HISTORY_FAILED),
        _ => None,
    }
}

type JsonResponse = (StatusCode, Json<serde_json::Value>);

fn failure(status: StatusCode, message: &str) -> JsonResponse {
    (status, Json(serde_json::json!({ "error": message })))
}

/// Client-caused failures are 400, everything else 500; the body never
/// carries the underlying detail.
fn rewrite_failure(error: &RewriteError, message: &str) -> JsonResponse {
    let status = if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    failure(status, message)
}

/// Run a model-backed call on its own task. If the gateway timeout drops the
/// handler, the call still runs to completion or failure.
async fn run_detached<T, F>(call: F) -> Result<T, RewriteError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, RewriteError>> + Send + 'static,
{
    tokio::spawn(call)
        .await
        .unwrap_or_else(|e| Err(RewriteError::ServiceFailure(format!("rewrite task failed: {e}"))))
}

fn body_rejected(route: &str, rejection: &JsonRejection, message: &str) -> JsonResponse {
    tracing::warn!(route, error = %rejection, "rejected request body");
    failure(StatusCode::BAD_REQUEST, message)
}

/// GET /health
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /rewrite-email
pub(super) async fn handle_rewrite_email(
    State(state): State<AppState>,
    body: Result<Json<RewriteRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match body {
        Ok(b) => b,
        Err(e) => return body_rejected("/rewrite-email", &e, REWRITE_EMAIL_FAILED),
    };

    let orchestrator = state.orchestrator;
    match run_detached(async move { orchestrator.rewrite_email(&request).await }).await {
        Ok(rewrites) => (
            StatusCode::OK,
            Json(serde_json::json!({ "rewrites": rewrites })),
        ),
        Err(e) => rewrite_failure(&e, REWRITE_EMAIL_FAILED),
    }
}

/// POST /rewrite-subject
pub(super) async fn handle_rewrite_subject(
    State(state): State<AppState>,
    body: Result<Json<SubjectRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match body {
        Ok(b) => b,
        Err(e) => return body_rejected("/rewrite-subject", &e, REWRITE_SUBJECT_FAILED),
    };

    let orchestrator = state.orchestrator;
    match run_detached(async move { orchestrator.rewrite_subject(&request).await }).await {
        Ok(subjects) => (
            StatusCode::OK,
            Json(serde_json::json!({ "subjects": subjects })),
        ),
        Err(e) => rewrite_failure(&e, REWRITE_SUBJECT_FAILED),
    }
}

/// GET /version-history
pub(super) async fn handle_version_history(State(state): State<AppState>) -> impl IntoResponse {
    match state.history.recent(DEFAULT_HISTORY_LIMIT).await {
        Ok(entries) => (StatusCode::OK, Json(serde_json::json!(entries))),
        Err(e) => {
            let error = RewriteError::ServiceFailure(format!("{e:#}"));
            tracing::error!(
                kind = error.kind(),
                store = state.history.name(),
                error = %error,
                "version history read failed"
            );
            failure(StatusCode::INTERNAL_SERVER_ERROR, HISTORY_FAILED)
        }
    }
}
