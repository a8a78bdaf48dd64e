//! `aws-sdk-s3` backed object store

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::{
    primitives::{ByteStream, DateTimeFormat},
    Client as S3Client,
};
use tracing::{error, info};

use super::{BucketSummary, ObjectStore, PutObjectRequest, StorageResult};

/// Object store backed by an S3-compatible service
pub struct S3ObjectStore {
    s3_client: Arc<S3Client>,
}

impl S3ObjectStore {
    /// Wraps a pre-configured S3 client
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>) -> Self {
        Self { s3_client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, request: PutObjectRequest) -> StorageResult<()> {
        let size = request.body.len();
        let start = std::time::Instant::now();

        self.s3_client
            .put_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .body(ByteStream::from(request.body))
            .content_type(request.content_type)
            .content_disposition(request.content_disposition)
            .set_metadata(Some(request.metadata))
            .send()
            .await
            .map_err(|e| {
                error!(
                    bucket = %request.bucket,
                    key = %request.key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_millis(),
                    "S3 put_object failed: {e}"
                );
                e
            })?;

        info!(
            bucket = %request.bucket,
            key = %request.key,
            size_bytes = size,
            duration_ms = start.elapsed().as_millis(),
            "S3 put_object successful"
        );

        Ok(())
    }

    async fn list_buckets(&self) -> StorageResult<Vec<BucketSummary>> {
        let output = self.s3_client.list_buckets().send().await?;

        Ok(output
            .buckets()
            .iter()
            .map(|bucket| BucketSummary {
                name: bucket.name().map(ToString::to_string),
                creation_date: bucket
                    .creation_date()
                    .and_then(|date| date.fmt(DateTimeFormat::DateTime).ok()),
            })
            .collect())
    }
}
