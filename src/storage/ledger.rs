use crate::error::AppError;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Executor, Row, SqlitePool};
use std::path::Path;
use tracing::{debug, error};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS uploads (
    local_path  TEXT PRIMARY KEY NOT NULL,
    photo_id    TEXT NOT NULL UNIQUE,
    uploaded_at TEXT NOT NULL
)
"#;

/// Durable record of every image already delivered, keyed both ways.
#[derive(Debug, Clone)]
pub struct Ledger {
    pool: SqlitePool,
}

impl Ledger {
    /// Opens (creating if needed) the ledger at `path`.
    ///
    /// Any failure here is `AppError::LedgerUnavailable`: without the ledger we
    /// cannot tell what was uploaded already.
    pub async fn open(path: &Path) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Full);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| {
                error!("Cannot open upload ledger {}: {}", path.display(), e);
                AppError::LedgerUnavailable(e)
            })?;

        pool.execute(SCHEMA_SQL).await.map_err(|e| {
            error!("Cannot prepare upload ledger {}: {}", path.display(), e);
            AppError::LedgerUnavailable(e)
        })?;

        debug!("Upload ledger ready at {}", path.display());
        Ok(Self { pool })
    }

    /// True if `key` is either a recorded local path or a recorded photo id.
    pub async fn contains(&self, key: &str) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT 1 FROM uploads WHERE local_path = ? OR photo_id = ? LIMIT 1")
            .bind(key)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Records a delivered image. Both directions are written by the same
    /// statement, so a crash leaves either the whole record or none of it.
    /// Returns false if the path was already recorded; existing records are
    /// never modified.
    pub async fn put(&self, local_path: &str, photo_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO uploads (local_path, photo_id, uploaded_at)
            VALUES (?, ?, ?)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(local_path)
        .bind(photo_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn photo_id_for(&self, local_path: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT photo_id FROM uploads WHERE local_path = ?")
            .bind(local_path)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.try_get::<String, _>("photo_id")).transpose()?)
    }

    pub async fn local_path_for(&self, photo_id: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT local_path FROM uploads WHERE photo_id = ?")
            .bind(photo_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.try_get::<String, _>("local_path")).transpose()?)
    }

    pub async fn len(&self) -> Result<usize, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM uploads")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    pub async fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len().await? == 0)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
