//! storefront-eta: Storefront Arrival Prediction
//!
//! Estimates how long after its original release a game will be given away
//! free on a digital storefront, from the publisher's history on that store.
//!
//! ## Architecture
//!
//! - **Stats**: read-only publisher history table plus the global mean wait
//! - **Features**: fixed ten-column model input built from history and request
//! - **Model**: injected regression model and publisher encoder (JSON artifacts)
//! - **Predictor**: known/unknown publisher paths and the explanation sentence
//! - **API**: axum adapters (v1 flat, v2 envelope) over one shared predictor

pub mod api;
pub mod config;
pub mod features;
pub mod model;
pub mod predictor;
pub mod stats;
pub mod types;

pub use config::ServiceConfig;
pub use predictor::{PredictionError, Predictor};
pub use stats::{PublisherStatsStore, StatsError};
pub use types::{
    FeatureVector, PredictionBasis, PredictionRequest, PredictionResult, PublisherRecord,
};
