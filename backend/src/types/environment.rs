//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use aws_config::{
    meta::region::RegionProviderChain, retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion,
};
use tracing::Level;

const LOCALSTACK_ENDPOINT_URL: &str = "http://localhost:4566";
const DEFAULT_PUBLIC_BASE_URL: &str = "https://s3.amazonaws.com";
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the S3 bucket every document is written to
    ///
    /// # Panics
    ///
    /// Panics if the `S3_BUCKET_NAME` environment variable is not set outside development
    #[must_use]
    pub fn s3_bucket(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("S3_BUCKET_NAME").expect("S3_BUCKET_NAME environment variable is not set")
            }
            Self::Development => {
                env::var("S3_BUCKET_NAME").unwrap_or_else(|_| "doclink-documents".to_string())
            }
        }
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development | Self::Staging)
    }

    /// Returns the endpoint URL to use for the object store, if not AWS itself
    #[must_use]
    pub fn s3_endpoint_url(&self) -> Option<String> {
        env::var("S3_ENDPOINT_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| match self {
                // Regular AWS endpoints for production and staging
                Self::Production | Self::Staging => None,
                // LocalStack endpoint for development
                Self::Development => Some(LOCALSTACK_ENDPOINT_URL.to_string()),
            })
    }

    /// Scheme and host of the public object URLs handed back to clients
    #[must_use]
    pub fn public_base_url(&self) -> String {
        env::var("PUBLIC_OBJECT_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.s3_endpoint_url())
            .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string())
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let region = RegionProviderChain::default_provider().or_else(DEFAULT_REGION);

        let mut config_builder = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.s3_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.load().await
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // S3-compatible services and LocalStack address buckets by path
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if self.s3_endpoint_url().is_some() {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }

    /// Upper bound on the time a single request may take
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        let secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Default log level when `RUST_LOG` is not set
    #[must_use]
    pub fn tracing_level(&self) -> Level {
        env::var("TRACING_LEVEL")
            .ok()
            .and_then(|val| val.parse::<Level>().ok())
            .unwrap_or(match self {
                Self::Production | Self::Staging => Level::INFO,
                Self::Development => Level::DEBUG,
            })
    }
}
