//! HTTP handlers for the recording CRUD surface.
//!
//! Each handler converts `RecordingService` outcomes into responses locally;
//! failures are logged server-side and surfaced as small JSON bodies.

use crate::{
    errors::AppError,
    services::recording_service::{RecordingService, ServiceError},
};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde_json::json;

/// Multipart field the client must supply.
const UPLOAD_FIELD: &str = "recording";

/// POST `/api/recordings` — accept exactly one binary file part and store it.
/// No part and more than one part are both rejected.
pub async fn create_recording(
    State(service): State<RecordingService>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut payload: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(format!("malformed multipart body: {err}")))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            if payload.is_some() {
                return Err(AppError::bad_request("more than one recording file uploaded"));
            }
            let bytes = field.bytes().await.map_err(|err| {
                AppError::bad_request(format!("could not read uploaded file: {err}"))
            })?;
            payload = Some(bytes);
        }
    }

    let Some(payload) = payload else {
        return Err(AppError::bad_request("no recording file uploaded"));
    };

    let recording = service
        .create(payload)
        .await
        .map_err(|err| log_service_error("recording upload failed", err))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "recording uploaded",
            "recording": recording,
        })),
    ))
}

/// GET `/api/recordings` — all rows, newest first, possibly empty.
pub async fn list_recordings(
    State(service): State<RecordingService>,
) -> Result<impl IntoResponse, AppError> {
    let recordings = service
        .list()
        .await
        .map_err(|err| log_service_error("listing recordings failed", err))?;
    Ok(Json(recordings))
}

/// GET `/api/recordings/{id}` — redirect to the stored public URL.
pub async fn get_recording(
    State(service): State<RecordingService>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let url = service
        .redirect_target(id)
        .await
        .map_err(|err| log_service_error("recording lookup failed", err))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}

/// DELETE `/api/recordings/{id}` — remove the object, then the row. A failed
/// object delete leaves the row intact and maps to 500 so the caller can
/// retry.
pub async fn delete_recording(
    State(service): State<RecordingService>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    service
        .delete(id)
        .await
        .map_err(|err| log_service_error("recording delete failed", err))?;

    Ok(Json(json!({ "message": "recording deleted" })))
}

/// Log everything except plain not-found lookups before converting for the
/// wire.
fn log_service_error(context: &str, err: ServiceError) -> AppError {
    if !matches!(err, ServiceError::NotFound(_)) {
        tracing::error!(error = %err, "{}", context);
    }
    err.into()
}
