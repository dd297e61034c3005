//! Config Validation Tests
//!
//! Typo detection for unknown keys and range validation of loaded values,
//! exercised independently from artifact loading.

use std::io::Write;

use storefront_eta::config::validation::{
    known_config_keys, suggest_correction, validate_ranges, validate_unknown_keys,
};
use storefront_eta::config::{ConfigError, ServiceConfig};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_artifact_path_warns_with_suggestion() {
    let toml_str = r#"
[artifacts]
modle_path = "models/m.json"
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("modle_path"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("artifacts.model_path")
    );
}

#[test]
fn typo_in_narrative_section_warns() {
    let toml_str = r#"
[narrative]
emphasys = false
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].suggestion.as_deref(), Some("narrative.emphasis"));
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[server]
addr = "127.0.0.1:5000"
cors_origins = ["http://localhost:3000"]

[artifacts]
model_path = "models/m.json"
encoder_path = "models/e.json"
stats_path = "models/s.csv"

[prediction]
fallback_critic_score = 73.5
default_release_year = 2024
default_release_month = 1

[narrative]
storefront = "Epic Games Store"
dataset_label = "Epic Games"
emphasis = true
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
}

#[test]
fn unrelated_key_gets_no_suggestion() {
    let warnings = validate_unknown_keys("completely_unrelated_setting = 1\n");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].suggestion.is_none());
}

#[test]
fn suggestion_prefers_closest_key() {
    let known = known_config_keys();
    assert_eq!(
        suggest_correction("server.adr", &known).as_deref(),
        Some("server.addr")
    );
}

#[test]
fn unknown_keys_do_not_fail_loading() {
    let config = ServiceConfig::from_toml_str("[server]\nadr = \"x\"\n").unwrap();
    assert_eq!(config.server.addr, "0.0.0.0:5000");
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn defaults_pass_range_validation() {
    let (errors, _) = validate_ranges(&ServiceConfig::default());
    assert!(errors.is_empty(), "{errors:?}");
}

#[test]
fn out_of_range_month_is_fatal() {
    let err = ServiceConfig::from_toml_str("[prediction]\ndefault_release_month = 13\n")
        .unwrap_err();
    match err {
        ConfigError::Validation(errors) => {
            assert!(errors.iter().any(|e| e.contains("default_release_month")));
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn out_of_range_fallback_score_is_fatal() {
    let mut config = ServiceConfig::default();
    config.prediction.fallback_critic_score = 140.0;
    let (errors, _) = validate_ranges(&config);
    assert_eq!(errors.len(), 1);
}

#[test]
fn empty_artifact_path_is_fatal() {
    let err = ServiceConfig::from_toml_str("[artifacts]\nstats_path = \"\"\n").unwrap_err();
    assert!(err.to_string().contains("artifacts.stats_path"));
}

#[test]
fn unusual_release_year_only_warns() {
    let mut config = ServiceConfig::default();
    config.prediction.default_release_year = 1900;
    let (errors, warnings) = validate_ranges(&config);
    assert!(errors.is_empty());
    assert!(!warnings.is_empty());
}

// ============================================================================
// File loading
// ============================================================================

#[test]
fn load_from_file_applies_section_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[narrative]\nemphasis = false").unwrap();

    let config = ServiceConfig::load_from_file(file.path()).unwrap();
    assert!(!config.narrative.emphasis);
    assert_eq!(config.narrative.storefront, "Epic Games Store");
    assert_eq!(config.server.cors_origins, vec!["*".to_string()]);
}

#[test]
fn malformed_file_reports_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server\naddr = ").unwrap();

    match ServiceConfig::load_from_file(file.path()) {
        Err(ConfigError::Parse(path, _)) => assert_eq!(path, file.path()),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn config_round_trips_through_toml() {
    let text = ServiceConfig::default().to_toml().unwrap();
    let parsed = ServiceConfig::from_toml_str(&text).unwrap();
    assert_eq!(parsed.server.addr, ServiceConfig::default().server.addr);
}
