//! Prediction request and result types

use serde::{Deserialize, Serialize};

use crate::config::defaults::{DEFAULT_RELEASE_MONTH, DEFAULT_RELEASE_YEAR};

/// One prediction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub game_name: String,
    pub publisher: String,
    /// Critic score for the game, if one is known
    pub critic_score: Option<f64>,
    /// Critic score as the caller wrote it (`"90.0"` vs `"90"`), echoed in the sentence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critic_score_text: Option<String>,
    pub release_year: i32,
    /// 1-12
    pub release_month: u32,
}

impl PredictionRequest {
    /// Request with no critic score and the default release date.
    pub fn new(game_name: impl Into<String>, publisher: impl Into<String>) -> Self {
        Self {
            game_name: game_name.into(),
            publisher: publisher.into(),
            critic_score: None,
            critic_score_text: None,
            release_year: DEFAULT_RELEASE_YEAR,
            release_month: DEFAULT_RELEASE_MONTH,
        }
    }

    pub fn with_critic_score(mut self, score: f64) -> Self {
        self.critic_score = Some(score);
        self.critic_score_text = None;
        self
    }

    /// Critic score together with its original textual form.
    pub fn with_critic_score_text(mut self, score: f64, text: impl Into<String>) -> Self {
        self.critic_score = Some(score);
        self.critic_score_text = Some(text.into());
        self
    }

    pub fn with_release(mut self, year: i32, month: u32) -> Self {
        self.release_year = year;
        self.release_month = month;
        self
    }
}

/// Which branch produced a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionBasis {
    /// Publisher found in the statistics table; regression model invoked
    Model,
    /// Publisher unknown; industry average used, no interval claimed
    IndustryAverage,
}

impl std::fmt::Display for PredictionBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictionBasis::Model => write!(f, "model"),
            PredictionBasis::IndustryAverage => write!(f, "industry_average"),
        }
    }
}

/// Structured estimate with its rendered explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub game_name: String,
    pub publisher: String,
    pub predicted_years: f64,
    pub years_whole: i64,
    /// Always within 0..=11
    pub months_whole: u32,
    pub lower_bound_years: f64,
    pub upper_bound_years: f64,
    pub sentence: String,
    /// Publisher sample count used; 0 for an unknown publisher
    pub publisher_game_count: u32,
    pub basis: PredictionBasis,
}
