//! Document storage on top of an S3-compatible object store
mod error;
#[cfg(any(test, feature = "test-utils"))]
mod memory;
mod s3;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use chrono::{DateTime, Utc};
use document_policy::resolve_content_type;
use schemars::JsonSchema;
use serde::Serialize;
use tracing::{debug, info};

pub use error::{StorageError, StorageResult};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryObjectStore;
pub use s3::S3ObjectStore;

/// Disposition attached to every object so browsers preview instead of download
pub const CONTENT_DISPOSITION_INLINE: &str = "inline";

/// Advisory metadata attached to every object.
///
/// These are stored as user metadata (`x-amz-meta-*`), not as real response
/// headers; the bucket policy decides what browsers actually see.
pub const PUBLIC_READ_METADATA: [(&str, &str); 2] = [
    ("cache-control", "public, max-age=31536000"),
    ("access-control-allow-origin", "*"),
];

/// A single write to the object store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObjectRequest {
    /// Target bucket
    pub bucket: String,
    /// Object key within the bucket
    pub key: String,
    /// Object content
    pub body: Bytes,
    /// Content type stored with the object
    pub content_type: String,
    /// Content disposition stored with the object
    pub content_disposition: String,
    /// User metadata entries
    pub metadata: HashMap<String, String>,
}

/// A bucket visible to the configured credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct BucketSummary {
    /// Bucket name
    pub name: Option<String>,
    /// RFC 3339 creation timestamp, when the service reports one
    pub creation_date: Option<String>,
}

/// The object storage collaborator
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes one object
    async fn put_object(&self, request: PutObjectRequest) -> StorageResult<()>;

    /// Lists every bucket the credentials can see
    async fn list_buckets(&self) -> StorageResult<Vec<BucketSummary>>;
}

/// Object key of an uploaded document: `{timestamp_ms}-{filename}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Builds the key for a file uploaded at `timestamp_ms`
    #[must_use]
    pub fn new(timestamp_ms: i64, filename: &str) -> Self {
        Self(format!("{timestamp_ms}-{filename}"))
    }

    /// The key as stored
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A document received from a client
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    /// Original filename
    pub filename: String,
    /// MIME type reported by the client
    pub declared_type: String,
    /// File content
    pub content: Bytes,
}

/// Outcome of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    /// Object key the document was written under
    pub key: ObjectKey,
    /// Public URL of the object
    pub url: String,
    /// Original filename
    pub filename: String,
    /// Size in bytes
    pub size: u64,
    /// Content type the object was stored with
    pub content_type: String,
}

/// Document storage bound to a single bucket
pub struct DocumentStorage {
    store: Arc<dyn ObjectStore>,
    bucket_name: String,
    public_base_url: String,
}

impl DocumentStorage {
    /// Creates a new document storage
    ///
    /// # Arguments
    ///
    /// * `store` - Object store collaborator
    /// * `bucket_name` - The fixed bucket every document is written to
    /// * `public_base_url` - Scheme and host prefixed to `/{bucket}/{key}` in returned URLs
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, bucket_name: String, public_base_url: &str) -> Self {
        Self {
            store,
            bucket_name,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The configured bucket
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Public URL of an object in the configured bucket
    #[must_use]
    pub fn object_url(&self, key: &ObjectKey) -> String {
        format!(
            "{}/{}/{}",
            self.public_base_url,
            self.bucket_name,
            urlencoding::encode(key.as_str())
        )
    }

    /// Writes a document to the bucket and returns where it can be fetched
    ///
    /// # Errors
    ///
    /// Returns the [`StorageError`] reported by the object store. The write is
    /// issued once; only the SDK's own transport-level retries apply.
    pub async fn store_document(
        &self,
        upload: DocumentUpload,
        uploaded_at: DateTime<Utc>,
    ) -> StorageResult<StoredDocument> {
        let key = ObjectKey::new(uploaded_at.timestamp_millis(), &upload.filename);
        let content_type =
            resolve_content_type(&upload.filename, &upload.declared_type).to_string();
        let size = upload.content.len() as u64;

        debug!(key = %key, content_type = %content_type, size, "Writing document");

        self.store
            .put_object(PutObjectRequest {
                bucket: self.bucket_name.clone(),
                key: key.as_str().to_string(),
                body: upload.content,
                content_type: content_type.clone(),
                content_disposition: CONTENT_DISPOSITION_INLINE.to_string(),
                metadata: PUBLIC_READ_METADATA
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            })
            .await?;

        let url = self.object_url(&key);
        info!(key = %key, url = %url, "Document stored");

        Ok(StoredDocument {
            key,
            url,
            filename: upload.filename,
            size,
            content_type,
        })
    }

    /// Lists the buckets visible to the configured credentials
    ///
    /// # Errors
    ///
    /// Returns the [`StorageError`] reported by the object store
    pub async fn list_buckets(&self) -> StorageResult<Vec<BucketSummary>> {
        self.store.list_buckets().await
    }
}
