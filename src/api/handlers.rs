//! API route handlers
//!
//! Both prediction endpoints share one path through [`Predictor::predict`];
//! they differ only in how the result and errors are shaped:
//! - v1 (`/api/predict`): flat object, errors as `{ "error": "..." }`
//! - v2 (`/api/v2/predict`): [`ApiResponse`] envelope with provenance fields

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::config::PredictionSettings;
use crate::features::publisher_speed_score;
use crate::model::ModelError;
use crate::predictor::{PredictionError, Predictor};
use crate::types::{PredictionRequest, PredictionResult};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub predictor: Arc<Predictor>,
}

impl ApiState {
    pub fn new(predictor: Predictor) -> Self {
        Self {
            predictor: Arc::new(predictor),
        }
    }
}

// ============================================================================
// Request / response bodies
// ============================================================================

/// JSON body accepted by both prediction endpoints.
///
/// Required fields are optional here so a missing one produces a 400 that
/// names the field rather than a generic deserialization error.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PredictRequestBody {
    pub game_name: Option<String>,
    pub publisher: Option<String>,
    /// Kept as the raw JSON number so the sentence echoes it as written
    pub metacritic_score: Option<serde_json::Number>,
    pub release_year: Option<i32>,
    pub release_month: Option<u32>,
}

impl PredictRequestBody {
    /// Resolve defaults and check required fields.
    pub fn into_request(self, defaults: &PredictionSettings) -> Result<PredictionRequest, String> {
        let game_name = self.game_name.ok_or_else(|| missing_field("game_name"))?;
        let publisher = self.publisher.ok_or_else(|| missing_field("publisher"))?;

        let mut request = PredictionRequest::new(game_name, publisher).with_release(
            self.release_year.unwrap_or(defaults.default_release_year),
            self.release_month.unwrap_or(defaults.default_release_month),
        );
        if let Some(number) = self.metacritic_score {
            let score = number
                .as_f64()
                .ok_or_else(|| format!("metacritic_score {number} is not representable"))?;
            request = request.with_critic_score_text(score, number.to_string());
        }
        Ok(request)
    }
}

fn missing_field(name: &str) -> String {
    format!("Missing required field: {name}")
}

/// v1 response: the flat body the original endpoint returned.
#[derive(Debug, Serialize)]
pub struct PredictResponseV1 {
    pub game_name: String,
    pub publisher: String,
    pub predicted_years: f64,
    pub years_whole: i64,
    pub months_whole: u32,
    pub lower_bound_years: f64,
    pub upper_bound_years: f64,
    pub sentence: String,
    pub publisher_game_count: u32,
}

impl From<PredictionResult> for PredictResponseV1 {
    fn from(r: PredictionResult) -> Self {
        Self {
            game_name: r.game_name,
            publisher: r.publisher,
            predicted_years: r.predicted_years,
            years_whole: r.years_whole,
            months_whole: r.months_whole,
            lower_bound_years: r.lower_bound_years,
            upper_bound_years: r.upper_bound_years,
            sentence: r.sentence,
            publisher_game_count: r.publisher_game_count,
        }
    }
}

/// Publisher statistics for `/api/v2/publishers/:name`.
#[derive(Debug, Serialize)]
pub struct PublisherStatsV2 {
    pub publisher_name: String,
    pub avg_days_to_store: Option<f64>,
    pub sample_count: u32,
    pub avg_critic_score: Option<f64>,
    pub publisher_speed_score: f64,
}

/// Liveness for `/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub publishers: usize,
    pub global_mean_days: f64,
}

// ============================================================================
// Shared prediction path
// ============================================================================

/// Failure of one prediction call, already mapped to an HTTP status.
struct Failure {
    status: StatusCode,
    message: String,
}

impl Failure {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<PredictionError> for Failure {
    fn from(e: PredictionError) -> Self {
        if e.is_client_error() {
            return Self::bad_request(e.to_string());
        }
        // Evaluation details stay in the log.
        let reason = match &e {
            PredictionError::Model(ModelError::Evaluation(_)) => {
                "model evaluation failed".to_string()
            }
            other => other.to_string(),
        };
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Prediction failed: {reason}"),
        }
    }
}

fn run_prediction(
    state: &ApiState,
    payload: Result<Json<PredictRequestBody>, JsonRejection>,
) -> Result<PredictionResult, Failure> {
    let Json(body) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected prediction body");
        Failure::bad_request(rejection.body_text())
    })?;

    let request = body
        .into_request(state.predictor.prediction_settings())
        .map_err(Failure::bad_request)?;

    Ok(state.predictor.predict(&request)?)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/predict
pub async fn predict_v1(
    State(state): State<ApiState>,
    payload: Result<Json<PredictRequestBody>, JsonRejection>,
) -> Response {
    match run_prediction(&state, payload) {
        Ok(result) => Json(PredictResponseV1::from(result)).into_response(),
        Err(f) => (f.status, Json(serde_json::json!({ "error": f.message }))).into_response(),
    }
}

/// POST /api/v2/predict
pub async fn predict_v2(
    State(state): State<ApiState>,
    payload: Result<Json<PredictRequestBody>, JsonRejection>,
) -> Response {
    match run_prediction(&state, payload) {
        Ok(result) => ApiResponse::ok(result),
        Err(f) if f.status == StatusCode::BAD_REQUEST => ApiErrorResponse::bad_request(f.message),
        Err(f) => ApiErrorResponse::internal(f.message),
    }
}

/// GET /api/v2/publishers/:name
pub async fn get_publisher(State(state): State<ApiState>, Path(name): Path<String>) -> Response {
    match state.predictor.store().lookup(&name) {
        Some(record) => ApiResponse::ok(PublisherStatsV2 {
            publisher_name: record.publisher_name.clone(),
            avg_days_to_store: record.avg_days_to_store,
            sample_count: record.sample_count,
            avg_critic_score: record.avg_critic_score,
            publisher_speed_score: publisher_speed_score(record.avg_days_to_store),
        }),
        None => ApiErrorResponse::not_found(format!("No history for publisher '{name}'")),
    }
}

/// GET /health
pub async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let store = state.predictor.store();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        publishers: store.len(),
        global_mean_days: store.global_mean_days(),
    })
}
