//! Artifact Loading Tests
//!
//! Writes model, encoder and statistics files into a temporary directory and
//! loads them through the same path the binary uses at startup.

use std::fs;
use std::path::{Path, PathBuf};

use storefront_eta::model::ArtifactError;
use storefront_eta::types::FEATURE_NAMES;
use storefront_eta::{PredictionBasis, PredictionRequest, Predictor, ServiceConfig, StatsError};
use tempfile::TempDir;

const STATS_CSV: &str = "\
primary_publisher,avg_days_to_epic,games_count,avg_metacritic,avg_price
Acme,730.0,5.0,80.0,19.99
\"Quote, Inc.\",70.0,2,nan,9.99
";

/// One stump on has_metacritic: scored games take 365 days, others 500.
fn tree_model_json() -> String {
    format!(
        r#"{{
  "booster": "gbtree",
  "feature_names": {},
  "base_score": 65.0,
  "trees": [
    {{ "nodes": [
      {{ "feature": 1, "threshold": 0.5, "left": 1, "right": 2 }},
      {{ "leaf": 435.0 }},
      {{ "leaf": 300.0 }}
    ] }}
  ]
}}"#,
        serde_json::to_string(&FEATURE_NAMES).unwrap()
    )
}

const ENCODER_JSON: &str = r#"{ "classes": ["Acme", "Quote, Inc."] }"#;

struct Fixture {
    _dir: TempDir,
    config: ServiceConfig,
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn fixture(model: &str, encoder: &str, stats: &str) -> Fixture {
    let dir = TempDir::new().unwrap();
    let mut config = ServiceConfig::default();
    config.artifacts.model_path = write(dir.path(), "model.json", model);
    config.artifacts.encoder_path = write(dir.path(), "encoder.json", encoder);
    config.artifacts.stats_path = write(dir.path(), "stats.csv", stats);
    Fixture { _dir: dir, config }
}

#[test]
fn loads_tree_model_and_predicts() {
    let fx = fixture(&tree_model_json(), ENCODER_JSON, STATS_CSV);
    let predictor = Predictor::load(&fx.config).unwrap();

    assert_eq!(predictor.store().len(), 2);
    assert!((predictor.store().global_mean_days() - 400.0).abs() < 1e-9);

    let scored = predictor
        .predict(&PredictionRequest::new("G", "Acme").with_critic_score(90.0))
        .unwrap();
    assert!((scored.predicted_years - 1.0).abs() < 1e-12);

    let unscored = predictor
        .predict(&PredictionRequest::new("G", "Acme"))
        .unwrap();
    assert!((unscored.predicted_years - 500.0 / 365.0).abs() < 1e-12);
}

#[test]
fn quoted_publisher_with_missing_average_is_usable() {
    let fx = fixture(&tree_model_json(), ENCODER_JSON, STATS_CSV);
    let predictor = Predictor::load(&fx.config).unwrap();

    let record = predictor.store().lookup("Quote, Inc.").unwrap();
    assert_eq!(record.sample_count, 2);
    assert_eq!(record.avg_critic_score, None);

    let result = predictor
        .predict(&PredictionRequest::new("G", "Quote, Inc."))
        .unwrap();
    assert_eq!(result.basis, PredictionBasis::Model);
    assert!(result.sentence.contains("(no Metacritic average on record)"));
}

#[test]
fn loads_linear_model() {
    let model = format!(
        r#"{{"booster":"gblinear","feature_names":{},"base_score":0,"bias":100,"weights":[0,0,0,0,0,0,0,1,0,0]}}"#,
        serde_json::to_string(&FEATURE_NAMES).unwrap()
    );
    let fx = fixture(&model, ENCODER_JSON, STATS_CSV);
    let predictor = Predictor::load(&fx.config).unwrap();
    let r = predictor
        .predict(&PredictionRequest::new("G", "Acme"))
        .unwrap();
    assert!((r.predicted_years - 830.0 / 365.0).abs() < 1e-12);
}

#[test]
fn missing_model_file_is_io_error() {
    let mut fx = fixture(&tree_model_json(), ENCODER_JSON, STATS_CSV);
    fx.config.artifacts.model_path = PathBuf::from("/definitely/not/here/model.json");
    assert!(matches!(
        Predictor::load(&fx.config),
        Err(ArtifactError::Io { .. })
    ));
}

#[test]
fn feature_schema_mismatch_rejected() {
    let model = r#"{"booster":"gblinear","feature_names":["a","b"],"weights":[0,0,0,0,0,0,0,0,0,0]}"#;
    let fx = fixture(model, ENCODER_JSON, STATS_CSV);
    assert!(matches!(
        Predictor::load(&fx.config),
        Err(ArtifactError::SchemaMismatch { .. })
    ));
}

#[test]
fn encoder_must_cover_every_publisher() {
    let fx = fixture(&tree_model_json(), r#"{"classes":["Acme"]}"#, STATS_CSV);
    match Predictor::load(&fx.config) {
        Err(ArtifactError::EncoderCoverage { missing }) => {
            assert_eq!(missing, vec!["Quote, Inc.".to_string()]);
        }
        other => panic!("expected coverage error, got {other:?}"),
    }
}

#[test]
fn stats_table_missing_column_rejected() {
    let fx = fixture(
        &tree_model_json(),
        ENCODER_JSON,
        "primary_publisher,games_count,avg_metacritic\nAcme,5,80\n",
    );
    assert!(matches!(
        Predictor::load(&fx.config),
        Err(ArtifactError::Stats(StatsError::MissingColumn(_)))
    ));
}

#[test]
fn empty_encoder_rejected() {
    let fx = fixture(&tree_model_json(), r#"{"classes":[]}"#, STATS_CSV);
    assert!(matches!(
        Predictor::load(&fx.config),
        Err(ArtifactError::InvalidEncoder(_))
    ));
}
