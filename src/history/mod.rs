//! Version history of accepted rewrites.
//!
//! The rewrite core only reads from this log; entries are appended by a
//! separate writer.

pub mod sqlite;

pub use sqlite::SqliteHistoryStore;

use crate::config::{Config, HistoryBackend};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Number of entries the gateway returns from `/version-history`.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// A stored rewrite, serialized with its storage column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub rewritten_email: String,
    pub tone: String,
    pub length: String,
    /// RFC 3339, UTC
    pub created_at: String,
}

/// Read access to the history log.
pub trait HistoryStore: Send + Sync {
    /// Up to `limit` entries, newest first.
    fn recent<'a>(
        &'a self,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<HistoryEntry>>> + Send + 'a>>;

    fn name(&self) -> &str;
}

/// Store used when history is disabled; always empty.
pub struct NoopHistoryStore;

impl HistoryStore for NoopHistoryStore {
    fn recent<'a>(
        &'a self,
        _limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<HistoryEntry>>> + Send + 'a>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Build the configured history backend.
pub async fn create_history_store(config: &Config) -> Result<Arc<dyn HistoryStore>> {
    match config.history.backend {
        HistoryBackend::Sqlite => {
            let store = SqliteHistoryStore::open(&config.history_db_path()).await?;
            Ok(Arc::new(store))
        }
        HistoryBackend::None => Ok(Arc::new(NoopHistoryStore)),
    }
}
