//! Predictor & Narrative Generator
//!
//! Single immutable context holding the statistics table, the encoder and the
//! regression model. Built once at startup, then shared (behind an `Arc`) by
//! every transport adapter.
//!
//! ## Paths
//!
//! - **Known publisher**: build the feature vector, call the model, convert
//!   days to years, split into whole years/months, apply the ±15% band
//!   (lower bound floored at 0.1 years) and render the full explanation.
//! - **Unknown publisher**: no model call. The industry-average wait is
//!   reported with both bounds at 0.0, meaning no interval is claimed.
//!
//! The historical-average wording splits days with 30-day months while the
//! estimate itself uses twelve months per year. Both conventions are kept as
//! they are; they are not interchangeable.

pub mod narrative;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::defaults::{
    DAYS_PER_MONTH_APPROX, DAYS_PER_YEAR, LOWER_BOUND_FACTOR, LOWER_BOUND_FLOOR_YEARS,
    UPPER_BOUND_FACTOR,
};
use crate::config::{NarrativeSettings, PredictionSettings, ServiceConfig};
use crate::features::FeatureBuilder;
use crate::model::{
    load_encoder, load_model, ArtifactError, CategoricalEncoder, EncodeError, ModelError,
    RegressionModel,
};
use crate::stats::PublisherStatsStore;
use crate::types::{PredictionBasis, PredictionRequest, PredictionResult, PublisherRecord};

use narrative::ModelNarrative;

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum PredictionError {
    /// The request itself is unusable; nothing was predicted
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("publisher encoding failed: {0}")]
    Encoding(#[from] EncodeError),

    #[error("{0}")]
    Model(#[from] ModelError),
}

impl PredictionError {
    /// Whether the caller is at fault (as opposed to the service).
    pub fn is_client_error(&self) -> bool {
        matches!(self, PredictionError::InvalidRequest(_))
    }
}

// ============================================================================
// Numeric helpers
// ============================================================================

/// Split fractional years into whole years and whole months (0..=11).
pub fn whole_years_months(predicted_years: f64) -> (i64, u32) {
    let years = predicted_years.floor();
    let months = ((predicted_years - years) * 12.0).floor().clamp(0.0, 11.0);
    (years as i64, months as u32)
}

/// ±15% band around the estimate, lower bound floored at 0.1 years.
pub fn confidence_bounds(predicted_years: f64) -> (f64, f64) {
    (
        (predicted_years * LOWER_BOUND_FACTOR).max(LOWER_BOUND_FLOOR_YEARS),
        predicted_years * UPPER_BOUND_FACTOR,
    )
}

/// Publisher average wait as (whole years, whole 30-day months of the remainder).
///
/// The month figure can reach 12 for remainders of 360-364 days.
pub fn historical_average(avg_days: f64) -> (i64, i64) {
    let years = (avg_days / DAYS_PER_YEAR).floor();
    let months = (avg_days.rem_euclid(DAYS_PER_YEAR) / DAYS_PER_MONTH_APPROX).floor();
    (years as i64, months as i64)
}

// ============================================================================
// Predictor
// ============================================================================

pub struct Predictor {
    store: PublisherStatsStore,
    encoder: Box<dyn CategoricalEncoder>,
    model: Box<dyn RegressionModel>,
    prediction: PredictionSettings,
    narrative: NarrativeSettings,
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("publishers", &self.store.len())
            .field("global_mean_days", &self.store.global_mean_days())
            .field("prediction", &self.prediction)
            .finish_non_exhaustive()
    }
}

impl Predictor {
    /// Assemble a predictor from already-loaded parts.
    ///
    /// Fails if any publisher in the table is missing from the encoder
    /// vocabulary, since such a publisher could never be encoded.
    pub fn new(
        store: PublisherStatsStore,
        encoder: Box<dyn CategoricalEncoder>,
        model: Box<dyn RegressionModel>,
        prediction: &PredictionSettings,
        narrative: NarrativeSettings,
    ) -> Result<Self, ArtifactError> {
        let mut missing: Vec<String> = store
            .publishers()
            .filter(|p| !encoder.contains(p))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            missing.sort();
            return Err(ArtifactError::EncoderCoverage { missing });
        }

        Ok(Self {
            store,
            encoder,
            model,
            prediction: prediction.clone(),
            narrative,
        })
    }

    /// Load every artifact named in the config and assemble the predictor.
    pub fn load(config: &ServiceConfig) -> Result<Self, ArtifactError> {
        let paths = &config.artifacts;
        let store = PublisherStatsStore::load_csv(&paths.stats_path)?;
        let encoder = load_encoder(&paths.encoder_path)?;
        let model = load_model(&paths.model_path)?;

        let predictor = Self::new(
            store,
            Box::new(encoder),
            Box::new(model),
            &config.prediction,
            config.narrative.clone(),
        )?;
        info!(
            publishers = predictor.store.len(),
            global_mean_days = predictor.store.global_mean_days(),
            "Predictor ready"
        );
        Ok(predictor)
    }

    pub fn store(&self) -> &PublisherStatsStore {
        &self.store
    }

    /// Defaults applied to requests that omit optional fields.
    pub fn prediction_settings(&self) -> &PredictionSettings {
        &self.prediction
    }

    /// Predict when `request.game_name` will appear on the storefront.
    pub fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, PredictionError> {
        validate(request)?;

        match self.store.lookup(&request.publisher) {
            Some(record) => self.predict_known(request, record),
            None => Ok(self.predict_unknown(request)),
        }
    }

    fn predict_unknown(&self, request: &PredictionRequest) -> PredictionResult {
        let avg_days = self.store.global_mean_days();
        let predicted_years = avg_days / DAYS_PER_YEAR;
        let (years_whole, months_whole) = whole_years_months(predicted_years);

        debug!(
            publisher = %request.publisher,
            basis = %PredictionBasis::IndustryAverage,
            avg_days,
            critic_score = self.prediction.fallback_critic_score,
            "No publisher history, using industry average"
        );

        PredictionResult {
            game_name: request.game_name.clone(),
            publisher: request.publisher.clone(),
            predicted_years,
            years_whole,
            months_whole,
            lower_bound_years: 0.0,
            upper_bound_years: 0.0,
            sentence: narrative::no_history_sentence(
                &self.narrative,
                &request.publisher,
                years_whole,
                months_whole,
            ),
            publisher_game_count: 0,
            basis: PredictionBasis::IndustryAverage,
        }
    }

    fn predict_known(
        &self,
        request: &PredictionRequest,
        record: &PublisherRecord,
    ) -> Result<PredictionResult, PredictionError> {
        let features = FeatureBuilder::new(self.encoder.as_ref()).build(
            record,
            request.critic_score,
            request.release_year,
            request.release_month,
        )?;

        let predicted_days = self.model.predict(&features).map_err(|e| {
            error!(publisher = %request.publisher, error = %e, "Model evaluation failed");
            e
        })?;

        let predicted_years = predicted_days / DAYS_PER_YEAR;
        let (years_whole, months_whole) = whole_years_months(predicted_years);
        let (lower_bound_years, upper_bound_years) = confidence_bounds(predicted_years);

        debug!(
            publisher = %request.publisher,
            basis = %PredictionBasis::Model,
            predicted_days,
            has_critic_score = request.critic_score.is_some(),
            "Model prediction"
        );

        let sentence = narrative::model_sentence(
            &self.narrative,
            &ModelNarrative {
                publisher: &request.publisher,
                game_name: &request.game_name,
                sample_count: record.sample_count,
                average_wait: record.avg_days_to_store.map(historical_average),
                avg_critic_score: record.avg_critic_score,
                critic_score: request.critic_score,
                critic_score_text: request.critic_score_text.as_deref(),
                years_whole,
                months_whole,
                lower_bound_years,
                upper_bound_years,
            },
        );

        Ok(PredictionResult {
            game_name: request.game_name.clone(),
            publisher: request.publisher.clone(),
            predicted_years,
            years_whole,
            months_whole,
            lower_bound_years,
            upper_bound_years,
            sentence,
            publisher_game_count: record.sample_count,
            basis: PredictionBasis::Model,
        })
    }
}

fn validate(request: &PredictionRequest) -> Result<(), PredictionError> {
    if !(1..=12).contains(&request.release_month) {
        return Err(PredictionError::InvalidRequest(format!(
            "release_month must be between 1 and 12, got {}",
            request.release_month
        )));
    }
    if let Some(score) = request.critic_score {
        if !score.is_finite() {
            return Err(PredictionError::InvalidRequest(
                "metacritic_score must be a finite number".to_string(),
            ));
        }
    }
    Ok(())
}
