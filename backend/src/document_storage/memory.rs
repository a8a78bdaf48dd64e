//! In-memory object store used by tests

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{BucketSummary, ObjectStore, PutObjectRequest, StorageError, StorageResult};

/// Object store that records writes instead of sending them anywhere
#[derive(Default)]
pub struct InMemoryObjectStore {
    puts: Mutex<Vec<PutObjectRequest>>,
    buckets: Vec<BucketSummary>,
    failure: Option<String>,
}

impl InMemoryObjectStore {
    /// Store that reports the given buckets from `list_buckets`
    #[must_use]
    pub fn with_buckets<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            buckets: names
                .into_iter()
                .map(|name| BucketSummary {
                    name: Some(name.into()),
                    creation_date: None,
                })
                .collect(),
            ..Self::default()
        }
    }

    /// Store whose every call fails with `message`
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Every write received so far, in order
    pub async fn put_requests(&self) -> Vec<PutObjectRequest> {
        self.puts.lock().await.clone()
    }

    /// Number of writes received so far
    pub async fn put_count(&self) -> usize {
        self.puts.lock().await.len()
    }

    fn check_failure(&self) -> StorageResult<()> {
        self.failure
            .as_ref()
            .map_or(Ok(()), |msg| Err(StorageError::S3Error(msg.clone())))
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_object(&self, request: PutObjectRequest) -> StorageResult<()> {
        self.check_failure()?;
        self.puts.lock().await.push(request);
        Ok(())
    }

    async fn list_buckets(&self) -> StorageResult<Vec<BucketSummary>> {
        self.check_failure()?;
        Ok(self.buckets.clone())
    }
}
