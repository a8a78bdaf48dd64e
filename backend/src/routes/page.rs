use aide::axum::ApiRouter;
use axum::{response::Html, routing::get};

/// The drag-and-drop upload widget, served as a single self-contained page
const UPLOAD_WIDGET_PAGE: &str = include_str!("../../static/index.html");

pub fn handler() -> ApiRouter {
    ApiRouter::new().route("/", get(upload_widget))
}

#[allow(clippy::unused_async)]
async fn upload_widget() -> Html<&'static str> {
    Html(UPLOAD_WIDGET_PAGE)
}
