pub mod config;
pub mod diagnostics;
pub mod upload;

use aide::axum::{
    routing::{get, post},
    ApiRouter,
};
use axum::extract::DefaultBodyLimit;

/// Creates the `/api` router
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .api_route("/upload", post(upload::upload_document))
        .api_route("/test-s3", get(diagnostics::test_storage_connection))
        .api_route("/config", get(config::get_config))
        .layer(DefaultBodyLimit::max(upload::MAX_REQUEST_BODY_BYTES))
}
