//! Core data model for the recording metadata service.
//!
//! The sole entity maps to the `recordings` table via `sqlx::FromRow` and
//! serializes as JSON via `serde`.

pub mod recording;
