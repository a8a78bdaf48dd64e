//! Sending a selected file to the upload endpoint

use async_trait::async_trait;
use document_policy::DEFAULT_CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::state::SelectedFile;

/// Path of the upload endpoint relative to the server URL
pub const UPLOAD_PATH: &str = "/api/upload";

/// Response of a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
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

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Errors that can occur while uploading
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-success status
    #[error("Upload rejected with HTTP {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error message from the response body, or the status reason
        message: String,
    },

    /// The request could not be sent or the response could not be read
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Sends one file to the server
#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// Uploads `file` and returns where it was stored
    async fn upload(&self, file: &SelectedFile) -> Result<UploadedDocument, TransportError>;
}

/// Multipart upload over HTTP
pub struct HttpUploadClient {
    http: reqwest::Client,
    upload_url: String,
}

impl HttpUploadClient {
    /// Creates a client for the server at `server_url`, e.g. `http://localhost:3000`
    #[must_use]
    pub fn new(server_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            upload_url: format!("{}{UPLOAD_PATH}", server_url.trim_end_matches('/')),
        }
    }

    /// Full URL uploads are posted to
    #[must_use]
    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }
}

#[async_trait]
impl UploadTransport for HttpUploadClient {
    async fn upload(&self, file: &SelectedFile) -> Result<UploadedDocument, TransportError> {
        let declared_type = if file.declared_type.is_empty() {
            DEFAULT_CONTENT_TYPE
        } else {
            &file.declared_type
        };

        let part = Part::bytes(file.content.to_vec())
            .file_name(file.name.clone())
            .mime_str(declared_type)?;
        let form = Form::new().part("file", part);

        debug!(url = %self.upload_url, filename = %file.name, "Posting upload");

        let response = self.http.post(&self.upload_url).multipart(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status.canonical_reason().unwrap_or("Unknown error").to_string(),
            };
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let uploaded: UploadedDocument = response.json().await?;
        info!(url = %uploaded.url, size = uploaded.size, "Upload complete");

        Ok(uploaded)
    }
}
