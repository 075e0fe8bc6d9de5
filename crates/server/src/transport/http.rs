//! HTTP transport for spawngrid server
//!
//! Endpoints:
//! - `GET /coordinates/{latitude}/{longitude}` - points around a coordinate
//! - `GET /health` - liveness check
//!
//! Responses carry `Access-Control-Allow-Origin: *`. Coordinates are read
//! from the undecoded request path and percent-decoded exactly once by the
//! cache, so every malformed segment goes through the status policy.

use crate::handler::Handler;
use crate::protocol::{ErrorBody, render_body};
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use spawngrid::SpawnError;
use std::future::Future;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the application router around `handler`.
pub fn router(handler: Handler) -> Router {
    Router::new()
        .route("/coordinates/:latitude/:longitude", get(coordinates))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(handler)
}

/// Serve HTTP on `listener` until `shutdown` resolves.
pub async fn run_server(
    listener: tokio::net::TcpListener,
    handler: Handler,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    info!("spawngrid HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(handler))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Shutdown signal received, server stopped");
    Ok(())
}

async fn coordinates(State(handler): State<Handler>, uri: Uri) -> Response {
    let (latitude, longitude) = coordinate_segments(uri.path());

    let result = handler
        .coordinates(latitude, longitude)
        .await
        .and_then(|record| render_body(&record));

    match result {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => error_response(&handler, &e),
    }
}

async fn health(State(handler): State<Handler>) -> Response {
    Json(handler.health()).into_response()
}

/// Still-encoded `latitude` and `longitude` segments of
/// `/coordinates/{latitude}/{longitude}`.
fn coordinate_segments(path: &str) -> (&str, &str) {
    let mut segments = path.trim_start_matches('/').split('/').skip(1);
    let latitude = segments.next().unwrap_or_default();
    let longitude = segments.next().unwrap_or_default();
    (latitude, longitude)
}

fn error_response(handler: &Handler, err: &SpawnError) -> Response {
    let status = handler.policy().status_for(err);
    (status, Json(ErrorBody::from(err))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_segments_stay_encoded() {
        assert_eq!(
            coordinate_segments("/coordinates/%252D1.5/0"),
            ("%252D1.5", "0")
        );
        assert_eq!(
            coordinate_segments("/coordinates/37.7749/%2D122.4194"),
            ("37.7749", "%2D122.4194")
        );
        assert_eq!(coordinate_segments("/coordinates/%FF/"), ("%FF", ""));
    }
}
