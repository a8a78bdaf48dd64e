//! Error types for object storage operations

use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use thiserror::Error;

/// Result type for object storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while talking to the object store
#[derive(Error, Debug)]
pub enum StorageError {
    /// S3 service error
    #[error("S3 service error: {0}")]
    S3Error(String),

    /// AWS SDK error (dispatch, timeout, credentials)
    #[error("AWS SDK error: {0}")]
    AwsError(String),

    /// The request could not be built from the client configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Upstream service error (5xx from S3)
    #[error("Upstream service error: {0}")]
    UpstreamError(String),
}

impl<E> From<SdkError<E>> for StorageError
where
    E: std::error::Error + 'static,
{
    fn from(error: SdkError<E>) -> Self {
        let message = DisplayErrorContext(&error).to_string();
        match &error {
            SdkError::ServiceError(service_err) if service_err.raw().status().as_u16() >= 500 => {
                Self::UpstreamError(message)
            }
            SdkError::ServiceError(_) => Self::S3Error(message),
            SdkError::ConstructionFailure(_) => Self::ConfigError(message),
            _ => Self::AwsError(message),
        }
    }
}
