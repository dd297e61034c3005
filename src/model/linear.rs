//! gblinear booster inference.
//!
//! ```text
//! output = base_score + bias + Σ(feature[i] × weight[i])
//! ```
//!
//! A missing (NaN) feature contributes nothing to the sum.

use serde::{Deserialize, Serialize};

use super::{ModelError, RegressionModel};
use crate::types::{FeatureVector, FEATURE_COUNT};

/// Linear regression over the fixed feature schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    pub base_score: f64,
    #[serde(default)]
    pub bias: f64,
    /// One weight per feature, in schema order
    pub weights: [f64; FEATURE_COUNT],
}

impl LinearModel {
    pub fn new(base_score: f64, bias: f64, weights: [f64; FEATURE_COUNT]) -> Self {
        Self {
            base_score,
            bias,
            weights,
        }
    }
}

impl RegressionModel for LinearModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let sum: f64 = features
            .to_array()
            .iter()
            .zip(self.weights.iter())
            .filter(|(x, _)| !x.is_nan())
            .map(|(x, w)| x * w)
            .sum();
        let out = self.base_score + self.bias + sum;
        if out.is_finite() {
            Ok(out)
        } else {
            Err(ModelError::NonFinite(out))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector() -> FeatureVector {
        FeatureVector {
            critic_score_filled: 90.0,
            has_critic_score: 1.0,
            release_year: 2024.0,
            release_month: 3.0,
            publisher_count: 1.0,
            developer_count: 1.0,
            publisher_sample_count: 5.0,
            avg_days_to_store: 730.0,
            publisher_speed_score: 0.5,
            publisher_code: 2.0,
        }
    }

    #[test]
    fn test_weighted_sum() {
        let mut weights = [0.0; FEATURE_COUNT];
        weights[7] = 0.5; // avg_days_to_epic
        let model = LinearModel::new(10.0, -10.0, weights);
        assert!((model.predict(&vector()).unwrap() - 365.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_feature_contributes_nothing() {
        let mut weights = [0.0; FEATURE_COUNT];
        weights[0] = 2.0;
        weights[7] = 1.0;
        let model = LinearModel::new(0.0, 5.0, weights);
        let mut v = vector();
        v.avg_days_to_store = f64::NAN;
        assert!((model.predict(&v).unwrap() - 185.0).abs() < 1e-9);
    }

    #[test]
    fn test_overflow_is_error() {
        let model = LinearModel::new(f64::MAX, f64::MAX, [0.0; FEATURE_COUNT]);
        assert!(matches!(
            model.predict(&vector()),
            Err(ModelError::NonFinite(_))
        ));
    }
}
