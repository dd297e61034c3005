//! System-wide default constants.
//!
//! Centralises values used by the prediction core and the service shell.
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Prediction
// ============================================================================

/// Days per year used for every days <-> years conversion.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Days per month used only for the publisher historical-average wording.
///
/// The prediction itself is split with twelve months per year instead.
pub const DAYS_PER_MONTH_APPROX: f64 = 30.0;

/// Critic score assumed for a publisher with no history.
pub const FALLBACK_CRITIC_SCORE: f64 = 73.5;

/// Publisher speed score used when the average wait is zero or unknown.
pub const NEUTRAL_SPEED_SCORE: f64 = 0.5;

/// Lower confidence bound as a fraction of the estimate.
pub const LOWER_BOUND_FACTOR: f64 = 0.85;

/// Upper confidence bound as a fraction of the estimate.
pub const UPPER_BOUND_FACTOR: f64 = 1.15;

/// Floor applied to the lower confidence bound (years).
pub const LOWER_BOUND_FLOOR_YEARS: f64 = 0.1;

/// Release year assumed when a request omits it.
pub const DEFAULT_RELEASE_YEAR: i32 = 2024;

/// Release month assumed when a request omits it.
pub const DEFAULT_RELEASE_MONTH: u32 = 1;

// ============================================================================
// Narrative
// ============================================================================

/// Storefront named in explanation sentences.
pub const STOREFRONT_NAME: &str = "Epic Games Store";

/// Dataset named in the no-history sentence.
pub const DATASET_LABEL: &str = "Epic Games";

// ============================================================================
// Service
// ============================================================================

/// HTTP bind address when neither config, env nor CLI sets one.
pub const SERVER_ADDR: &str = "0.0.0.0:5000";

/// Maximum accepted request body (bytes).
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Per-request timeout (seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Artifacts
// ============================================================================

pub const MODEL_PATH: &str = "models/publisher_regression_model.json";
pub const ENCODER_PATH: &str = "models/publisher_encoder.json";
pub const STATS_PATH: &str = "models/publisher_statistics.csv";
