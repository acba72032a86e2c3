use super::{HistoryEntry, HistoryStore};
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use uuid::Uuid;

/// SQLite-backed history log (`email_versions` table).
pub struct SqliteHistoryStore {
    pool: SqlitePool,
}

impl SqliteHistoryStore {
    /// Wrap an existing pool and create the table if needed.
    pub async fn new(pool: SqlitePool) -> Result<Self> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS email_versions (
                 id TEXT PRIMARY KEY,
                 rewritten_email TEXT NOT NULL,
                 tone TEXT NOT NULL,
                 length TEXT NOT NULL,
                 created_at TEXT NOT NULL
             )",
        )
        .execute(&pool)
        .await
        .context("create email_versions table")?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_email_versions_created
                 ON email_versions(created_at)",
        )
        .execute(&pool)
        .await
        .context("create email_versions index")?;

        Ok(Self { pool })
    }

    /// Open (creating if missing) the database file at `path`.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create history directory: {}", parent.display())
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open history DB: {}", path.display()))?;

        Self::new(pool).await
    }

    /// Record an accepted rewrite. Used by the writer side and by tests.
    pub async fn append(
        &self,
        rewritten_email: &str,
        tone: &str,
        length: &str,
    ) -> Result<HistoryEntry> {
        let entry = HistoryEntry {
            id: Uuid::new_v4().to_string(),
            rewritten_email: rewritten_email.to_string(),
            tone: tone.to_string(),
            length: length.to_string(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };

        sqlx::query(
            "INSERT INTO email_versions (id, rewritten_email, tone, length, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&entry.id)
        .bind(&entry.rewritten_email)
        .bind(&entry.tone)
        .bind(&entry.length)
        .bind(&entry.created_at)
        .execute(&self.pool)
        .await
        .context("insert email version")?;

        Ok(entry)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn map_entry_row(row: &SqliteRow) -> Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.try_get("id")?,
        rewritten_email: row.try_get("rewritten_email")?,
        tone: row.try_get("tone")?,
        length: row.try_get("length")?,
        created_at: row.try_get("created_at")?,
    })
}

impl HistoryStore for SqliteHistoryStore {
    fn recent<'a>(
        &'a self,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<HistoryEntry>>> + Send + 'a>> {
        Box::pin(async move {
            let limit = i64::try_from(limit).unwrap_or(i64::MAX);
            let rows = sqlx::query(
                "SELECT id, rewritten_email, tone, length, created_at
                 FROM email_versions
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT $1",
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .context("load email versions")?;

            rows.iter().map(map_entry_row).collect()
        })
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
