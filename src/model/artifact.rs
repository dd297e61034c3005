//! Artifact loading for the model and the encoder.
//!
//! Model file layout:
//!
//! ```json
//! {
//!   "booster": "gbtree",
//!   "feature_names": ["metacritic_filled", "has_metacritic", ...],
//!   "base_score": 420.0,
//!   "trees": [{ "nodes": [...] }]
//! }
//! ```
//!
//! `"booster": "gblinear"` takes `base_score`, `bias` and `weights` instead of
//! `trees`. Every check here runs once at startup; a failure means the
//! service must not start.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use super::encoder::LabelEncoderSpec;
use super::{LabelEncoder, LinearModel, ModelError, RegressionModel, TreeEnsemble};
use crate::stats::StatsError;
use crate::types::{FeatureVector, FEATURE_NAMES};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse artifact {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Model feature schema mismatch: expected {expected:?}, found {found:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Invalid encoder: {0}")]
    InvalidEncoder(String),

    #[error("Statistics table: {0}")]
    Stats(#[from] StatsError),

    #[error("Encoder vocabulary is missing {} publisher(s) from the statistics table, e.g. '{}'", .missing.len(), .missing.first().map_or("", String::as_str))]
    EncoderCoverage { missing: Vec<String> },
}

/// Booster variants a model file may contain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "booster", rename_all = "lowercase")]
pub enum ModelArtifact {
    Gblinear(LinearModel),
    Gbtree(TreeEnsemble),
}

impl ModelArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::Gblinear(_) => "gblinear",
            ModelArtifact::Gbtree(_) => "gbtree",
        }
    }
}

impl RegressionModel for ModelArtifact {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        match self {
            ModelArtifact::Gblinear(m) => m.predict(features),
            ModelArtifact::Gbtree(m) => m.predict(features),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelFile {
    feature_names: Vec<String>,
    #[serde(flatten)]
    model: ModelArtifact,
}

fn read(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a model document and check it against the fixed feature schema.
pub fn parse_model(bytes: &[u8], path: &Path) -> Result<ModelArtifact, ArtifactError> {
    let file: ModelFile = serde_json::from_slice(bytes).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    if file.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES) {
        return Err(ArtifactError::SchemaMismatch {
            expected: FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect(),
            found: file.feature_names,
        });
    }

    if let ModelArtifact::Gbtree(ensemble) = &file.model {
        ensemble.validate().map_err(ArtifactError::InvalidModel)?;
    }

    Ok(file.model)
}

/// Load the regression model from a JSON file.
pub fn load_model(path: &Path) -> Result<ModelArtifact, ArtifactError> {
    let model = parse_model(&read(path)?, path)?;
    info!(path = %path.display(), booster = model.kind(), "Loaded regression model");
    Ok(model)
}

/// Load the publisher label encoder from a JSON file.
pub fn load_encoder(path: &Path) -> Result<LabelEncoder, ArtifactError> {
    let spec: LabelEncoderSpec =
        serde_json::from_slice(&read(path)?).map_err(|source| ArtifactError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    let encoder = LabelEncoder::try_from(spec).map_err(ArtifactError::InvalidEncoder)?;
    if encoder.is_empty() {
        return Err(ArtifactError::InvalidEncoder("no classes".to_string()));
    }
    info!(path = %path.display(), classes = encoder.len(), "Loaded publisher encoder");
    Ok(encoder)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names_json() -> String {
        serde_json::to_string(&FEATURE_NAMES).unwrap()
    }

    #[test]
    fn test_parse_linear() {
        let doc = format!(
            r#"{{"booster":"gblinear","feature_names":{},"base_score":1,"bias":2,"weights":[0,0,0,0,0,0,0,1,0,0]}}"#,
            names_json()
        );
        let model = parse_model(doc.as_bytes(), Path::new("m.json")).unwrap();
        assert_eq!(model.kind(), "gblinear");
    }

    #[test]
    fn test_parse_tree() {
        let doc = format!(
            r#"{{"booster":"gbtree","feature_names":{},"base_score":0.5,"trees":[{{"nodes":[{{"leaf":364.5}}]}}]}}"#,
            names_json()
        );
        let model = parse_model(doc.as_bytes(), Path::new("m.json")).unwrap();
        assert_eq!(model.kind(), "gbtree");
    }

    #[test]
    fn test_reordered_schema_rejected() {
        let mut names: Vec<&str> = FEATURE_NAMES.to_vec();
        names.swap(0, 1);
        let doc = format!(
            r#"{{"booster":"gblinear","feature_names":{},"weights":[0,0,0,0,0,0,0,0,0,0]}}"#,
            serde_json::to_string(&names).unwrap()
        );
        assert!(matches!(
            parse_model(doc.as_bytes(), Path::new("m.json")),
            Err(ArtifactError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_booster_is_parse_error() {
        let doc = format!(
            r#"{{"booster":"dart","feature_names":{}}}"#,
            names_json()
        );
        assert!(matches!(
            parse_model(doc.as_bytes(), Path::new("m.json")),
            Err(ArtifactError::Json { .. })
        ));
    }

    #[test]
    fn test_broken_tree_rejected() {
        let doc = format!(
            r#"{{"booster":"gbtree","feature_names":{},"trees":[{{"nodes":[{{"feature":0,"threshold":1,"left":5,"right":6}}]}}]}}"#,
            names_json()
        );
        assert!(matches!(
            parse_model(doc.as_bytes(), Path::new("m.json")),
            Err(ArtifactError::InvalidModel(_))
        ));
    }
}
