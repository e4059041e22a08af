//! Represents one uploaded media recording.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Metadata row for a single uploaded recording.
///
/// The binary payload itself lives in the remote object store; this struct
/// only carries the metadata persisted in SQLite. Rows are never updated in
/// place — the lifecycle is create, read, delete.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    /// Auto-incremented primary key. Never reused after deletion.
    pub id: i64,

    /// Object name generated at upload time (timestamp plus extension).
    /// Not guaranteed unique under concurrent uploads in the same instant.
    pub filename: String,

    /// Publicly fetchable address of the stored object. Immutable once set.
    pub url: String,

    /// Byte length of the uploaded payload.
    pub filesize: i64,

    /// Insert time, assigned when the row is created.
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
