use axum::Json;
use schemars::JsonSchema;
use serde::Serialize;

/// Liveness report
#[derive(Debug, Serialize, JsonSchema)]
pub struct HealthResponse {
    /// Always `ok` while the process is serving requests
    status: &'static str,
    /// Crate version of the running build
    semver: &'static str,
    /// Git revision baked in at build time through `GIT_REV`
    rev: Option<&'static str>,
}

/// Health check endpoint
///
/// Reports liveness only; use `/api/test-s3` to check the storage connection.
pub async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        semver: env!("CARGO_PKG_VERSION"),
        rev: option_env!("GIT_REV"),
    })
}
