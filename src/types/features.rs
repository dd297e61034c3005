//! Model input vector

use serde::Serialize;

/// Number of model input columns.
pub const FEATURE_COUNT: usize = 10;

/// Column names of the trained model, in input order.
///
/// A model artifact declaring any other names or order is rejected at load.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "metacritic_filled",
    "has_metacritic",
    "release_year",
    "release_month",
    "num_publishers",
    "num_developers",
    "games_count",
    "avg_days_to_epic",
    "publisher_speed_score",
    "publisher_encoded",
];

/// Fixed-shape numeric input for the regression model.
///
/// Missing values are carried as `f64::NAN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub critic_score_filled: f64,
    pub has_critic_score: f64,
    pub release_year: f64,
    pub release_month: f64,
    pub publisher_count: f64,
    pub developer_count: f64,
    pub publisher_sample_count: f64,
    pub avg_days_to_store: f64,
    pub publisher_speed_score: f64,
    pub publisher_code: f64,
}

impl FeatureVector {
    /// Values in [`FEATURE_NAMES`] order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.critic_score_filled,
            self.has_critic_score,
            self.release_year,
            self.release_month,
            self.publisher_count,
            self.developer_count,
            self.publisher_sample_count,
            self.avg_days_to_store,
            self.publisher_speed_score,
            self.publisher_code,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_order_matches_names() {
        let v = FeatureVector {
            critic_score_filled: 0.0,
            has_critic_score: 1.0,
            release_year: 2.0,
            release_month: 3.0,
            publisher_count: 4.0,
            developer_count: 5.0,
            publisher_sample_count: 6.0,
            avg_days_to_store: 7.0,
            publisher_speed_score: 8.0,
            publisher_code: 9.0,
        };
        let arr = v.to_array();
        for (i, value) in arr.iter().enumerate() {
            assert_eq!(*value, i as f64, "column {} out of place", FEATURE_NAMES[i]);
        }
    }
}
