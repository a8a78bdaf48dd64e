use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use doclink_backend::{
    document_storage::{DocumentStorage, S3ObjectStore},
    server,
    types::Environment,
};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(environment.tracing_level().as_str()));

    // Configure logging format based on environment
    // Use JSON format for staging/production, regular format for development
    match environment {
        Environment::Production | Environment::Staging => {
            fmt().json().with_env_filter(env_filter).init();
        }
        Environment::Development => {
            fmt().with_env_filter(env_filter).init();
        }
    }

    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let bucket_name = environment.s3_bucket();
    let public_base_url = environment.public_base_url();

    let document_storage = Arc::new(DocumentStorage::new(
        Arc::new(S3ObjectStore::new(s3_client)),
        bucket_name,
        &public_base_url,
    ));

    tracing::info!(
        bucket = %document_storage.bucket_name(),
        public_base_url = %public_base_url,
        "Initialized document storage in {:?} environment",
        environment
    );

    server::start(environment, document_storage).await
}
