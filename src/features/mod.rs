//! Feature Vector Builder
//!
//! Turns a publisher's history plus per-request overrides into the fixed
//! ten-column model input. Only ever called for publishers present in the
//! statistics table; unknown publishers never reach this step.

use crate::config::defaults::{DAYS_PER_YEAR, NEUTRAL_SPEED_SCORE};
use crate::model::{CategoricalEncoder, EncodeError};
use crate::types::{FeatureVector, PublisherRecord};

/// Inverse of the publisher's average wait in years.
///
/// Zero or unknown waits get the neutral score instead of dividing by zero.
pub fn publisher_speed_score(avg_days_to_store: Option<f64>) -> f64 {
    match avg_days_to_store {
        Some(days) if days != 0.0 && !days.is_nan() => 1.0 / (days / DAYS_PER_YEAR),
        _ => NEUTRAL_SPEED_SCORE,
    }
}

/// Builds model inputs, encoding publisher identity with the trained encoder.
pub struct FeatureBuilder<'a> {
    encoder: &'a dyn CategoricalEncoder,
}

impl<'a> FeatureBuilder<'a> {
    pub fn new(encoder: &'a dyn CategoricalEncoder) -> Self {
        Self { encoder }
    }

    /// Build the model input for one request.
    ///
    /// Without a critic score the publisher's average is used and the
    /// has-score flag is 0.
    pub fn build(
        &self,
        record: &PublisherRecord,
        critic_score: Option<f64>,
        release_year: i32,
        release_month: u32,
    ) -> Result<FeatureVector, EncodeError> {
        let (critic_score_filled, has_critic_score) = match critic_score {
            Some(score) => (score, 1.0),
            None => (record.avg_critic_score.unwrap_or(f64::NAN), 0.0),
        };

        let publisher_code = self.encoder.encode(&record.publisher_name)?;

        Ok(FeatureVector {
            critic_score_filled,
            has_critic_score,
            release_year: f64::from(release_year),
            release_month: f64::from(release_month),
            publisher_count: 1.0,
            developer_count: 1.0,
            publisher_sample_count: f64::from(record.sample_count),
            avg_days_to_store: record.avg_days_to_store.unwrap_or(f64::NAN),
            publisher_speed_score: publisher_speed_score(record.avg_days_to_store),
            publisher_code: f64::from(publisher_code),
        })
    }
}
