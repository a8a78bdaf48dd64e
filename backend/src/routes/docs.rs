//! API reference page and the OpenAPI document behind it, hidden in production

use aide::{axum::ApiRouter, openapi::OpenApi, scalar::Scalar};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Extension, Json,
};

use crate::types::Environment;

const OPENAPI_PATH: &str = "/openapi.json";

pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .route("/docs", get(api_reference))
        .route(OPENAPI_PATH, get(openapi_document))
}

#[allow(clippy::unused_async)]
async fn api_reference(Extension(environment): Extension<Environment>) -> Response {
    if !environment.show_api_docs() {
        return StatusCode::NOT_FOUND.into_response();
    }

    let page = Scalar::new(OPENAPI_PATH)
        .with_title("Doclink API Reference")
        .html();
    Html(page).into_response()
}

#[allow(clippy::unused_async)]
async fn openapi_document(
    Extension(environment): Extension<Environment>,
    Extension(openapi): Extension<OpenApi>,
) -> Response {
    if environment.show_api_docs() {
        Json(openapi).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}
