use std::sync::Arc;

use aide::OperationOutput;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use schemars::JsonSchema;
use serde::Serialize;
use tracing::instrument;

use crate::document_storage::{BucketSummary, DocumentStorage, StorageError};

#[derive(Debug, Serialize, JsonSchema)]
pub struct BucketListResponse {
    /// Always `true` for this response
    pub success: bool,
    /// Buckets visible to the configured credentials
    pub buckets: Vec<BucketSummary>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct DiagnosticErrorResponse {
    /// Always `false` for this response
    pub success: bool,
    /// Why the storage service could not be reached
    pub error: String,
}

/// Failure to reach the storage service
#[derive(Debug)]
pub struct DiagnosticError(StorageError);

impl IntoResponse for DiagnosticError {
    fn into_response(self) -> Response {
        tracing::error!("Storage connection check failed: {}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(DiagnosticErrorResponse {
                success: false,
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

impl OperationOutput for DiagnosticError {
    type Inner = DiagnosticErrorResponse;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        Json::<DiagnosticErrorResponse>::operation_response(ctx, operation)
    }
}

/// Lists the buckets visible to the configured storage credentials
///
/// Read-only; used to confirm the storage connection is configured correctly.
#[instrument(skip(document_storage))]
pub async fn test_storage_connection(
    Extension(document_storage): Extension<Arc<DocumentStorage>>,
) -> Result<Json<BucketListResponse>, DiagnosticError> {
    tracing::info!("Testing storage connection");

    let buckets = document_storage.list_buckets().await.map_err(DiagnosticError)?;

    tracing::info!(count = buckets.len(), "Listed buckets");

    Ok(Json(BucketListResponse {
        success: true,
        buckets,
    }))
}
