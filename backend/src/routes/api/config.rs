use axum::Json;
use document_policy::{accepted_content_types, allowed_extensions, MAX_UPLOAD_BYTES};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ConfigResponse {
    /// Maximum document size in bytes
    pub max_file_size_bytes: u64,
    /// Accepted filename extensions
    pub allowed_extensions: Vec<String>,
    /// Content types accepted when the extension is not recognised
    pub accepted_content_types: Vec<String>,
}

/// Upload limits clients validate against before sending a file
pub async fn get_config() -> Json<ConfigResponse> {
    Json(ConfigResponse {
        max_file_size_bytes: MAX_UPLOAD_BYTES,
        allowed_extensions: allowed_extensions()
            .into_iter()
            .map(ToString::to_string)
            .collect(),
        accepted_content_types: accepted_content_types()
            .into_iter()
            .map(ToString::to_string)
            .collect(),
    })
}
