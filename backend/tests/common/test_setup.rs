use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response, Router};
use doclink_backend::{
    document_storage::{
        BucketSummary, DocumentStorage, InMemoryObjectStore, ObjectStore, PutObjectRequest,
        StorageResult,
    },
    server,
    types::Environment,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use super::utils::{multipart_body, MultipartPart, BOUNDARY};

pub const TEST_BUCKET: &str = "doclink-test-documents";
pub const TEST_PUBLIC_BASE_URL: &str = "https://objects.doclink.test";
pub const TEST_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Setup test environment variables with all the required configuration
pub fn setup_test_env() {
    // Load test environment variables
    dotenvy::from_path(".env.example").ok();

    // Initialize tracing for tests
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Router wired to an in-memory object store
pub struct TestSetup {
    pub router: Router,
    pub object_store: Arc<InMemoryObjectStore>,
    pub document_storage: Arc<DocumentStorage>,
}

impl TestSetup {
    pub fn new() -> Self {
        Self::with_store(InMemoryObjectStore::with_buckets([TEST_BUCKET]))
    }

    pub fn with_store(object_store: InMemoryObjectStore) -> Self {
        setup_test_env();

        let object_store = Arc::new(object_store);
        let document_storage = Arc::new(DocumentStorage::new(
            object_store.clone(),
            TEST_BUCKET.to_string(),
            TEST_PUBLIC_BASE_URL,
        ));

        Self {
            router: build_router(document_storage.clone()),
            object_store,
            document_storage,
        }
    }

    /// Uploads a single file in the `file` field
    pub async fn upload_file(&self, filename: &str, content_type: &str, data: &[u8]) -> Response {
        self.send_multipart(
            "/api/upload",
            &[MultipartPart::file("file", filename, content_type, data)],
        )
        .await
    }

    pub async fn send_multipart(&self, route: &str, parts: &[MultipartPart<'_>]) -> Response {
        self.send_post_request(
            route,
            &format!("multipart/form-data; boundary={BOUNDARY}"),
            multipart_body(parts),
        )
        .await
    }

    pub async fn send_post_request(&self, route: &str, content_type: &str, body: Vec<u8>) -> Response {
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .expect("Failed to build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    pub async fn send_get_request(&self, route: &str) -> Response {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())
            .expect("Failed to build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }
}

/// Builds the application router with the same layers the server runs with
pub fn build_router(document_storage: Arc<DocumentStorage>) -> Router {
    build_router_for(Environment::Development, document_storage)
}

pub fn build_router_for(environment: Environment, document_storage: Arc<DocumentStorage>) -> Router {
    server::router(environment, document_storage, TEST_REQUEST_TIMEOUT)
}

/// Object store whose calls take `delay` before succeeding
pub struct SlowObjectStore {
    pub delay: Duration,
}

#[async_trait]
impl ObjectStore for SlowObjectStore {
    async fn put_object(&self, _request: PutObjectRequest) -> StorageResult<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn list_buckets(&self) -> StorageResult<Vec<BucketSummary>> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }
}
