//! Axum-based HTTP gateway exposing the rewrite and history endpoints.
//!
//! - Request body size limits (64KB max)
//! - Request timeouts (`gateway.request_timeout_secs`, 30s by default)
//! - CORS only for explicitly configured origins
//! - Internal failure details stay in the log; clients get a generic message

mod handlers;
mod server;

pub use server::{build_app, run_gateway, run_gateway_with_listener};

use crate::Config;
use crate::history::HistoryStore;
use crate::rewrite::RewriteOrchestrator;
use std::sync::Arc;

/// Maximum request body size (64KB) -- prevents memory exhaustion
pub const MAX_BODY_SIZE: usize = 65_536;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: Arc<RewriteOrchestrator>,
    pub history: Arc<dyn HistoryStore>,
}
