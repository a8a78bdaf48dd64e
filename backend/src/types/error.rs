//! Universal error handling for the API

use std::time::Duration;

use aide::OperationOutput;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use document_policy::PolicyViolation;
use schemars::JsonSchema;
use serde::Serialize;

use crate::document_storage::StorageError;

/// API error response body
#[derive(Debug, Serialize, JsonSchema)]
pub struct ApiErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Underlying cause, present for server-side failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Application error type that wraps the API error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: ApiErrorResponse,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            inner: ApiErrorResponse {
                error: msg.into(),
                details: None,
            },
        }
    }

    /// Attach the underlying cause to the response body
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.inner.details = Some(details.into());
        self
    }

    /// The request carried no usable `file` field
    #[must_use]
    pub fn missing_file() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "No file uploaded")
    }

    /// Reading the upload or writing it to storage failed
    #[must_use]
    pub fn upload_failed(details: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to upload file").with_details(details)
    }

    /// The request did not finish within the configured timeout
    #[must_use]
    pub fn timed_out(after: Duration) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Request timed out")
            .with_details(format!("No response within {} s", after.as_secs_f64()))
    }

    /// A failure that is not tied to a specific route
    #[must_use]
    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").with_details(details)
    }

    /// HTTP status of the response
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!("Client error: {}", self.inner.error),
            500..=599 => tracing::error!(
                "Server error: {} - {}",
                self.inner.error,
                self.inner.details.as_deref().unwrap_or_default()
            ),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

/// Convert upload policy violations to application errors
impl From<PolicyViolation> for AppError {
    fn from(err: PolicyViolation) -> Self {
        let status = match err {
            PolicyViolation::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            PolicyViolation::Empty => return Self::missing_file(),
            PolicyViolation::UnsupportedType { .. } => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.to_string())
    }
}

/// Convert multipart read errors to application errors
impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::new(StatusCode::PAYLOAD_TOO_LARGE, "File exceeds the upload limit");
        }
        Self::upload_failed(err.body_text())
    }
}

/// Convert storage errors to application errors
impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::upload_failed(err.to_string())
    }
}

impl OperationOutput for AppError {
    type Inner = ApiErrorResponse;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        Json::<ApiErrorResponse>::operation_response(ctx, operation)
    }
}
