#![allow(dead_code)]
//! Shared test setup: an in-memory object store with switchable failure
//! modes, an in-memory SQLite metadata store, and a `TestServer` wrapper.

use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;
use recording_store::{
    routes::routes::routes,
    services::{
        metadata_store::MetadataStore,
        object_store::{ObjectStore, ObjectStoreError, ObjectStoreResult},
        recording_service::RecordingService,
    },
};
use sqlx::sqlite::SqlitePoolOptions;
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

pub const PUBLIC_BASE: &str = "http://objects.test/storage/v1/object/public/uploads";

/// In-memory stand-in for the remote object store.
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Bytes>>,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            fail_uploads: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
        }
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().expect("object map lock").len()
    }

    pub fn contains(&self, object_name: &str) -> bool {
        self.objects
            .lock()
            .expect("object map lock")
            .contains_key(object_name)
    }

    pub fn payload(&self, object_name: &str) -> Option<Bytes> {
        self.objects
            .lock()
            .expect("object map lock")
            .get(object_name)
            .cloned()
    }

    /// Drop an object behind the service's back, simulating provider-side
    /// loss.
    pub fn remove(&self, object_name: &str) {
        self.objects
            .lock()
            .expect("object map lock")
            .remove(object_name);
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(
        &self,
        object_name: &str,
        payload: Bytes,
        _content_type: &str,
    ) -> ObjectStoreResult<()> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(ObjectStoreError::Transient(
                "simulated provider outage".into(),
            ));
        }
        // overwrite on collision, matching provider upsert semantics
        self.objects
            .lock()
            .expect("object map lock")
            .insert(object_name.to_string(), payload);
        Ok(())
    }

    fn public_url(&self, object_name: &str) -> String {
        format!("{PUBLIC_BASE}/{object_name}")
    }

    async fn delete(&self, object_name: &str) -> ObjectStoreResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(ObjectStoreError::Transient(
                "simulated provider outage".into(),
            ));
        }
        match self
            .objects
            .lock()
            .expect("object map lock")
            .remove(object_name)
        {
            Some(_) => Ok(()),
            None => Err(ObjectStoreError::NotFound(object_name.to_string())),
        }
    }
}

pub struct TestContext {
    pub service: RecordingService,
    pub objects: Arc<MemoryObjectStore>,
}

/// Service wired to in-memory stores, schema initialized.
pub async fn setup_service() -> TestContext {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    let metadata = MetadataStore::new(Arc::new(pool));
    metadata.initialize().await.expect("schema creation");

    let objects = Arc::new(MemoryObjectStore::new());
    let service = RecordingService::new(metadata, objects.clone());
    TestContext { service, objects }
}

pub struct TestApp {
    pub server: TestServer,
    pub service: RecordingService,
    pub objects: Arc<MemoryObjectStore>,
}

pub async fn setup_app() -> TestApp {
    setup_app_with_origins(&[]).await
}

pub async fn setup_app_with_origins(origins: &[String]) -> TestApp {
    let ctx = setup_service().await;
    let app = routes(None, origins).with_state(ctx.service.clone());
    TestApp {
        server: TestServer::new(app).expect("test server"),
        service: ctx.service,
        objects: ctx.objects,
    }
}
