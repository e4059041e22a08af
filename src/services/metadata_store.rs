//! MetadataStore — durable storage of `Recording` rows backed by SQLite.
//!
//! Owns metadata only; the binary payloads live in the remote object store.
//! The pool is created once at startup and shared across all requests; SQLite
//! serializes conflicting writes internally.

use crate::models::recording::Recording;
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;

const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

#[derive(Clone)]
pub struct MetadataStore {
    db: Arc<SqlitePool>,
}

impl MetadataStore {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Idempotently ensure the schema exists.
    ///
    /// Must run once before any other operation; a failure here aborts
    /// startup. Statements come from the embedded migration file.
    pub async fn initialize(&self) -> Result<(), sqlx::Error> {
        for stmt in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(stmt).execute(&*self.db).await?;
        }
        Ok(())
    }

    /// Insert a new row and return it with the generated id and timestamp.
    ///
    /// No uniqueness constraint on `filename` or `url`.
    pub async fn insert(
        &self,
        filename: &str,
        url: &str,
        filesize: i64,
    ) -> Result<Recording, sqlx::Error> {
        sqlx::query_as::<_, Recording>(
            "INSERT INTO recordings (filename, url, filesize, createdAt)
             VALUES (?, ?, ?, ?)
             RETURNING id, filename, url, filesize, createdAt",
        )
        .bind(filename)
        .bind(url)
        .bind(filesize)
        .bind(Utc::now())
        .fetch_one(&*self.db)
        .await
    }

    /// All rows, most recent first. The id tiebreak keeps the order stable
    /// when two rows share a timestamp.
    pub async fn list_all(&self) -> Result<Vec<Recording>, sqlx::Error> {
        sqlx::query_as::<_, Recording>(
            "SELECT id, filename, url, filesize, createdAt
             FROM recordings
             ORDER BY createdAt DESC, id DESC",
        )
        .fetch_all(&*self.db)
        .await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Recording>, sqlx::Error> {
        sqlx::query_as::<_, Recording>(
            "SELECT id, filename, url, filesize, createdAt FROM recordings WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&*self.db)
        .await
    }

    /// Remove a row. Deleting an absent id succeeds quietly; callers that
    /// care check existence first via `get_by_id`.
    pub async fn delete_by_id(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM recordings WHERE id = ?")
            .bind(id)
            .execute(&*self.db)
            .await?;
        Ok(())
    }

    /// Lightweight connectivity probe for readiness checks.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&*self.db)
            .await?;
        Ok(())
    }

    /// Orderly pool shutdown, called once the server has drained.
    pub async fn close(&self) {
        self.db.close().await;
    }
}
