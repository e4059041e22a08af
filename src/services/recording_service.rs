//! RecordingService — sequences the object store and the metadata store for
//! each API operation. This is the only component that mutates either store,
//! and the only place cross-store consistency decisions live.

use crate::models::recording::Recording;
use crate::services::metadata_store::MetadataStore;
use crate::services::object_store::{ObjectStore, ObjectStoreError};
use bytes::Bytes;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;

/// Every upload is stored and served as WebM video.
pub const RECORDING_CONTENT_TYPE: &str = "video/webm";
const RECORDING_EXTENSION: &str = "webm";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("recording {0} not found")]
    NotFound(i64),
    #[error("upload to object store failed: {0}")]
    UploadFailed(#[source] ObjectStoreError),
    #[error("object store delete failed: {0}")]
    DeleteFailed(#[source] ObjectStoreError),
    #[error("metadata store failure: {0}")]
    Metadata(#[from] sqlx::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Clone)]
pub struct RecordingService {
    metadata: MetadataStore,
    objects: Arc<dyn ObjectStore>,
}

impl RecordingService {
    pub fn new(metadata: MetadataStore, objects: Arc<dyn ObjectStore>) -> Self {
        Self { metadata, objects }
    }

    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    /// Store a new recording: upload the payload, then insert the metadata
    /// row. The generated name combines the current time with a fixed
    /// extension, so two uploads within the same millisecond collide and the
    /// object store keeps whichever payload arrived last.
    pub async fn create(&self, payload: Bytes) -> ServiceResult<Recording> {
        self.create_named(generate_object_name(), payload).await
    }

    /// Name-explicit variant of [`create`](Self::create).
    ///
    /// Object store first, then metadata: an upload failure must never leave
    /// a row pointing at a missing object. The reverse gap remains — a crash
    /// after the upload but before the insert orphans the stored object.
    pub async fn create_named(
        &self,
        object_name: String,
        payload: Bytes,
    ) -> ServiceResult<Recording> {
        let filesize = payload.len() as i64;
        self.objects
            .upload(&object_name, payload, RECORDING_CONTENT_TYPE)
            .await
            .map_err(ServiceError::UploadFailed)?;

        let url = self.objects.public_url(&object_name);
        let recording = self.metadata.insert(&object_name, &url, filesize).await?;
        Ok(recording)
    }

    /// All recordings, newest first. No filtering or pagination.
    pub async fn list(&self) -> ServiceResult<Vec<Recording>> {
        Ok(self.metadata.list_all().await?)
    }

    /// The stored public URL for a recording, for the caller to redirect to.
    /// Does not verify the object still exists in the store.
    pub async fn redirect_target(&self, id: i64) -> ServiceResult<String> {
        let recording = self
            .metadata
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;
        Ok(recording.url)
    }

    /// Remove a recording from both stores.
    ///
    /// The object goes first; if the provider fails, the metadata row is
    /// deliberately left intact so the inconsistency stays visible and a
    /// repeat delete can retry. An object the provider no longer has is
    /// tolerated — the row alone is removed.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let recording = self
            .metadata
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        let object_name = object_name_from_url(&recording.url);
        match self.objects.delete(object_name).await {
            Ok(()) | Err(ObjectStoreError::NotFound(_)) => {}
            Err(err) => return Err(ServiceError::DeleteFailed(err)),
        }

        self.metadata.delete_by_id(id).await?;
        Ok(())
    }
}

fn generate_object_name() -> String {
    format!(
        "recording-{}.{}",
        Utc::now().timestamp_millis(),
        RECORDING_EXTENSION
    )
}

/// The object name is re-derived from the stored URL's trailing path
/// segment. This only holds for URL schemes where the public URL ends in the
/// object name; the stored column is the URL, not the name.
fn object_name_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_carry_the_fixed_extension() {
        let name = generate_object_name();
        assert!(name.starts_with("recording-"));
        assert!(name.ends_with(".webm"));
    }

    #[test]
    fn object_name_is_the_trailing_url_segment() {
        assert_eq!(
            object_name_from_url(
                "https://storage.example.com/storage/v1/object/public/uploads/recording-1.webm"
            ),
            "recording-1.webm"
        );
        // a URL with no slashes falls back to the whole string
        assert_eq!(object_name_from_url("recording-1.webm"), "recording-1.webm");
    }
}
