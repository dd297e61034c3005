//! Regression model and categorical encoder
//!
//! The prediction core only depends on two narrow contracts:
//! - [`RegressionModel`]: `predict(&FeatureVector) -> days`
//! - [`CategoricalEncoder`]: `encode(publisher) -> code`
//!
//! Concrete artifacts loaded from JSON exports live in the submodules:
//! - `linear`: gblinear booster (weighted sum of features)
//! - `trees`: gbtree booster (sum of regression tree leaves)
//! - `encoder`: label encoder (class list, code = position)
//! - `artifact`: file loading and schema checks

pub mod artifact;
pub mod encoder;
pub mod linear;
pub mod trees;

pub use artifact::{load_encoder, load_model, ArtifactError, ModelArtifact};
pub use encoder::LabelEncoder;
pub use linear::LinearModel;
pub use trees::TreeEnsemble;

use thiserror::Error;

use crate::types::FeatureVector;

/// Failure while evaluating the regression model.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("model produced a non-finite prediction ({0})")]
    NonFinite(f64),

    #[error("model evaluation failed: {0}")]
    Evaluation(String),
}

/// Failure while encoding a categorical value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("category '{0}' is not in the encoder vocabulary")]
    UnknownCategory(String),
}

/// A frozen regression model mapping a feature vector to predicted days.
///
/// Implementations must be deterministic and safe for concurrent read-only use.
pub trait RegressionModel: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError>;
}

/// A frozen categorical encoder mapping a publisher name to its trained code.
pub trait CategoricalEncoder: Send + Sync {
    fn encode(&self, category: &str) -> Result<u32, EncodeError>;

    /// Whether `category` is in the vocabulary.
    fn contains(&self, category: &str) -> bool {
        self.encode(category).is_ok()
    }
}
