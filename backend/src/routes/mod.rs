pub mod api;
mod docs;
mod health;
mod page;

use aide::axum::{routing::get, ApiRouter};

/// Creates the router with all handler routes
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .merge(docs::handler())
        .merge(page::handler())
        .api_route("/health", get(health::handler))
        .nest("/api", api::handler())
}
