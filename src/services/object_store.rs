//! Object store client — thin adapter over a bucket-style remote storage API.
//!
//! Every call is a single round trip; there is no caching, retry, or backoff.
//! Provider failures are collapsed into a closed set of variants so callers
//! can pattern-match instead of inspecting free-form errors.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode, header};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("object `{0}` not found")]
    NotFound(String),
    #[error("transient storage failure: {0}")]
    Transient(String),
    #[error("storage request rejected: {0}")]
    Permanent(String),
}

pub type ObjectStoreResult<T> = Result<T, ObjectStoreError>;

/// Upload, public-URL lookup, and delete against a single fixed bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write the object under `object_name`. A colliding name overwrites —
    /// provider semantics, surfaced to callers as last write wins.
    async fn upload(
        &self,
        object_name: &str,
        payload: Bytes,
        content_type: &str,
    ) -> ObjectStoreResult<()>;

    /// Deterministic construction of a publicly fetchable address. Does not
    /// verify the object exists.
    fn public_url(&self, object_name: &str) -> String;

    /// Remove the object if present. A missing object reports `NotFound`,
    /// which callers are expected to tolerate.
    async fn delete(&self, object_name: &str) -> ObjectStoreResult<()>;
}

/// HTTP-backed client for a Supabase-style storage API.
///
/// Objects live at `{endpoint}/storage/v1/object/{bucket}/{name}` and are
/// publicly readable at `{endpoint}/storage/v1/object/public/{bucket}/{name}`.
pub struct HttpObjectStore {
    client: Client,
    endpoint: String,
    bucket: String,
    api_key: String,
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

impl HttpObjectStore {
    pub fn new(endpoint: &str, bucket: &str, api_key: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn object_endpoint(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.endpoint, self.bucket, object_name
        )
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn upload(
        &self,
        object_name: &str,
        payload: Bytes,
        content_type: &str,
    ) -> ObjectStoreResult<()> {
        let response = self
            .client
            .post(self.object_endpoint(object_name))
            .bearer_auth(&self.api_key)
            .header(header::CONTENT_TYPE, content_type)
            // overwrite on name collision instead of rejecting
            .header("x-upsert", "true")
            .body(payload)
            .send()
            .await
            .map_err(transport_error)?;

        check_response(object_name, response).await
    }

    fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.endpoint, self.bucket, object_name
        )
    }

    async fn delete(&self, object_name: &str) -> ObjectStoreResult<()> {
        let response = self
            .client
            .delete(self.object_endpoint(object_name))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(transport_error)?;

        check_response(object_name, response).await
    }
}

async fn check_response(object_name: &str, response: reqwest::Response) -> ObjectStoreResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let detail = response.text().await.unwrap_or_default();
    Err(classify_status(status, object_name, &detail))
}

/// Collapse a provider status into the closed error set: 404 means the
/// object is gone, 5xx is worth retrying, everything else is a rejected
/// request.
fn classify_status(status: StatusCode, object_name: &str, detail: &str) -> ObjectStoreError {
    match status {
        StatusCode::NOT_FOUND => ObjectStoreError::NotFound(object_name.to_string()),
        s if s.is_server_error() => ObjectStoreError::Transient(format!("{status}: {detail}")),
        _ => ObjectStoreError::Permanent(format!("{status}: {detail}")),
    }
}

/// Timeouts and connect failures may resolve on retry; anything else in the
/// transport layer is treated as permanent.
fn transport_error(err: reqwest::Error) -> ObjectStoreError {
    if err.is_timeout() || err.is_connect() {
        ObjectStoreError::Transient(err.to_string())
    } else {
        ObjectStoreError::Permanent(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> HttpObjectStore {
        HttpObjectStore::new("https://storage.example.com/", "uploads", "key")
            .expect("client construction")
    }

    #[test]
    fn public_url_is_deterministic_and_ends_with_object_name() {
        let store = store();
        let url = store.public_url("recording-1700000000000.webm");
        assert_eq!(
            url,
            "https://storage.example.com/storage/v1/object/public/uploads/recording-1700000000000.webm"
        );
        assert_eq!(url, store.public_url("recording-1700000000000.webm"));
    }

    #[test]
    fn object_endpoint_trims_trailing_slash() {
        let store = store();
        assert_eq!(
            store.object_endpoint("a.webm"),
            "https://storage.example.com/storage/v1/object/uploads/a.webm"
        );
    }

    #[test]
    fn status_classification_covers_the_closed_set() {
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, "a.webm", ""),
            ObjectStoreError::NotFound(name) if name == "a.webm"
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, "a.webm", "upstream"),
            ObjectStoreError::Transient(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, "a.webm", "bad key"),
            ObjectStoreError::Permanent(_)
        ));
    }
}
