//! Publisher statistics row

use serde::{Deserialize, Serialize};

/// Aggregate history for one publisher, as loaded from the statistics table.
///
/// Undefined cells (empty or `nan` in the source table) are kept as `None`
/// so the feature builder can hand them to the model as missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublisherRecord {
    /// Publisher name, unique key of the table (case-sensitive)
    pub publisher_name: String,
    /// Mean days between original release and storefront appearance
    pub avg_days_to_store: Option<f64>,
    /// Number of games the averages were computed over
    pub sample_count: u32,
    /// Mean critic score over the publisher's games
    pub avg_critic_score: Option<f64>,
}

impl PublisherRecord {
    pub fn new(
        publisher_name: impl Into<String>,
        avg_days_to_store: f64,
        sample_count: u32,
        avg_critic_score: f64,
    ) -> Self {
        Self {
            publisher_name: publisher_name.into(),
            avg_days_to_store: Some(avg_days_to_store),
            sample_count,
            avg_critic_score: Some(avg_critic_score),
        }
    }
}
