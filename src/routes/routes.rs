//! Defines routes for the recording API and the optional frontend assets.
//!
//! ## Structure
//! - `POST   /api/recordings`       — upload one recording (multipart)
//! - `GET    /api/recordings`       — list all recordings, newest first
//! - `GET    /api/recordings/{id}`  — redirect to the stored public URL
//! - `DELETE /api/recordings/{id}`  — delete object and metadata row
//! - `GET    /healthz`, `/readyz`   — health endpoints
//!
//! Any unmatched route falls through to the frontend build directory when
//! one is configured (with `index.html` as the catch-all entry document for
//! client-side routing), or to a plain-text 404 otherwise.

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        recording_handlers::{
            create_recording, delete_recording, get_recording, list_recordings,
        },
    },
    services::recording_service::RecordingService,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode},
    routing::get,
};
use std::path::PathBuf;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
};

/// Uploads are whole video payloads; axum's 2 MB default is far too small.
const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

/// Build the router for the recording API.
///
/// The router carries shared state (`RecordingService`) to all handlers.
/// `static_dir` is the frontend build directory to serve at the root path,
/// when present.
pub fn routes(static_dir: Option<PathBuf>, allowed_origins: &[String]) -> Router<RecordingService> {
    let router = Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // recording API
        .route(
            "/api/recordings",
            get(list_recordings).post(create_recording),
        )
        .route(
            "/api/recordings/{id}",
            get(get_recording).delete(delete_recording),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors_layer(allowed_origins));

    match static_dir {
        Some(dir) => {
            let index = dir.join("index.html");
            router.fallback_service(
                ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .fallback(ServeFile::new(index)),
            )
        }
        None => router.fallback(fallback),
    }
}

/// Cross-origin requests are accepted only from the configured allow-list;
/// a malformed entry is skipped with a warning rather than rejecting
/// startup.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "not found")
}
