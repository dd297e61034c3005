//! Shared data structures for storefront arrival prediction
//!
//! This module defines the records that flow through the prediction pipeline:
//! - PublisherRecord: one row of the publisher statistics table
//! - PredictionRequest: one caller request (game, publisher, optional overrides)
//! - FeatureVector: the fixed-shape model input
//! - PredictionResult: structured estimate plus rendered explanation

mod publisher;
mod features;
mod prediction;

pub use publisher::*;
pub use features::*;
pub use prediction::*;
