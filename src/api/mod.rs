//! REST API module using Axum
//!
//! Thin transport adapters over the shared [`Predictor`](crate::predictor::Predictor):
//! - v1 `/api/predict` returning the flat response body
//! - v2 `/api/v2/...` with the consistent envelope
//! - `/health` for liveness checks

pub mod envelope;
pub mod handlers;
mod routes;

pub use handlers::ApiState;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::defaults::{MAX_REQUEST_BODY_BYTES, REQUEST_TIMEOUT_SECS};
use crate::config::ServerConfig;

/// Build the CORS layer from the configured origin list.
///
/// `"*"` anywhere in the list allows every origin. Entries that are not
/// valid header values are skipped with a warning.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.iter().any(|o| o.trim() == "*") {
        tracing::info!("CORS: allowing any origin");
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.trim().parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "CORS: ignoring invalid origin");
                None
            }
        })
        .collect();
    tracing::info!(origins = ?origins, "CORS: allowing configured origins");
    base.allow_origin(allowed)
}

/// Create the complete application router.
pub fn create_app(state: ApiState, server: &ServerConfig) -> Router {
    Router::new()
        .nest("/api/v2", routes::v2_api_routes(state.clone()))
        .nest("/api", routes::api_routes(state.clone()))
        .merge(routes::health_routes(state))
        // Middleware
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&server.cors_origins))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
}
