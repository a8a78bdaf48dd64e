use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart},
    Extension, Json,
};
use chrono::Utc;
use document_policy::{base_name, UploadPolicy, DEFAULT_CONTENT_TYPE, MAX_UPLOAD_BYTES};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    document_storage::{DocumentStorage, DocumentUpload},
    types::AppError,
};

/// Name of the multipart field carrying the document
pub const FILE_FIELD: &str = "file";

/// Request body limit: one maximum-size document plus multipart framing
#[allow(clippy::cast_possible_truncation)]
pub const MAX_REQUEST_BODY_BYTES: usize = MAX_UPLOAD_BYTES as usize + 64 * 1024;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UploadResponse {
    /// Public URL of the stored document
    pub url: String,
    /// Original filename
    pub filename: String,
    /// Size in bytes
    pub size: u64,
    /// Content type the document was stored with
    #[serde(rename = "type")]
    pub content_type: String,
}

/// Uploads a PDF or Word document and returns its public URL
///
/// The document is read from the `file` multipart field, checked against the
/// upload policy, and written once to the configured bucket under
/// `{epoch_ms}-{filename}`.
///
/// # Errors
///
/// - `400` - the `file` field is missing or empty, or the file is not a PDF/Word document
/// - `413` - the file exceeds 10 MiB
/// - `500` - reading the form body or writing to storage failed
#[instrument(skip(document_storage, multipart))]
pub async fn upload_document(
    Extension(document_storage): Extension<Arc<DocumentStorage>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    tracing::info!("Handling upload request");

    // Anything that is not a multipart form cannot carry a file
    let Ok(mut multipart) = multipart else {
        return Err(AppError::missing_file());
    };

    let upload = read_file_field(&mut multipart)
        .await?
        .ok_or_else(AppError::missing_file)?;

    UploadPolicy::default().validate(
        &upload.filename,
        &upload.declared_type,
        upload.content.len() as u64,
    )?;

    let stored = document_storage
        .store_document(upload, Utc::now())
        .await?;

    Ok(Json(UploadResponse {
        url: stored.url,
        filename: stored.filename,
        size: stored.size,
        content_type: stored.content_type,
    }))
}

/// Reads the first non-empty `file` field, skipping any other fields
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<DocumentUpload>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        // A `file` field without a filename is a plain text value, not a file
        let Some(filename) = field.file_name().map(base_name).map(ToString::to_string) else {
            continue;
        };
        let declared_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let content = field.bytes().await?;

        if filename.is_empty() || content.is_empty() {
            continue;
        }

        tracing::info!(filename = %filename, size = content.len(), "Received file");

        return Ok(Some(DocumentUpload {
            filename,
            declared_type,
            content,
        }));
    }

    Ok(None)
}
