//! API route definitions
//!
//! - `POST /api/predict` - v1 prediction (flat body)
//! - `POST /api/v2/predict` - v2 prediction (envelope)
//! - `GET  /api/v2/publishers/:name` - publisher statistics
//! - `GET  /health` - liveness

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, ApiState};

/// v1 routes, nested under `/api`.
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict_v1))
        .with_state(state)
}

/// v2 routes, nested under `/api/v2`.
pub fn v2_api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict_v2))
        .route("/publishers/:name", get(handlers::get_publisher))
        .with_state(state)
}

/// Health endpoint at root level.
pub fn health_routes(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .with_state(state)
}
