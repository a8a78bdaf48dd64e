use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use doclink_backend::types::Environment;

/// S3 client pointed at LocalStack, with the development bucket created
pub async fn localstack_client() -> (Arc<S3Client>, String) {
    super::setup_test_env();

    let environment = Environment::Development;
    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let bucket_name = environment.s3_bucket();

    // Creating an existing bucket is fine for these tests
    let _ = s3_client.create_bucket().bucket(&bucket_name).send().await;

    (s3_client, bucket_name)
}

/// Download data from an object URL using HTTP
pub async fn download_from_url(url: &str) -> Result<reqwest::Response, reqwest::Error> {
    reqwest::Client::new().get(url).send().await
}
