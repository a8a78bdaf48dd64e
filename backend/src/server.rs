use std::sync::Arc;
use std::time::Duration;

use aide::openapi::{Info, OpenApi};
use axum::{error_handling::HandleErrorLayer, BoxError, Extension, Router};
use datadog_tracing::axum::{shutdown_signal, OtelAxumLayer, OtelInResponseLayer};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::{
    document_storage::DocumentStorage,
    types::{AppError, Environment},
};

const DEFAULT_PORT: u16 = 3000;

/// Builds the application with every layer the server runs with
///
/// Requests that outlive `request_timeout` are answered with the JSON error
/// envelope, never with an empty body.
pub fn router(
    environment: Environment,
    document_storage: Arc<DocumentStorage>,
    request_timeout: Duration,
) -> Router {
    let mut openapi = OpenApi {
        info: Info {
            title: "Doclink".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ..Info::default()
        },
        ..OpenApi::default()
    };

    routes::handler()
        .finish_api(&mut openapi)
        .layer(Extension(openapi))
        .layer(Extension(environment))
        .layer(Extension(document_storage))
        // Include trace context as header into the response
        .layer(OtelInResponseLayer)
        // Start OpenTelemetry trace on incoming request
        .layer(OtelAxumLayer::default())
        .layer(TraceLayer::new_for_http())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                    timeout_error(&err, request_timeout)
                }))
                .timeout(request_timeout),
        )
}

fn timeout_error(err: &BoxError, request_timeout: Duration) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        AppError::timed_out(request_timeout)
    } else {
        AppError::internal(err.to_string())
    }
}

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(
    environment: Environment,
    document_storage: Arc<DocumentStorage>,
) -> anyhow::Result<()> {
    let request_timeout = environment.request_timeout();
    let router = router(environment, document_storage, request_timeout);

    let addr = std::net::SocketAddr::from((
        [0, 0, 0, 0],
        std::env::var("PORT").map_or(Ok(DEFAULT_PORT), |p| p.parse())?,
    ));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("📄 Doclink started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}
