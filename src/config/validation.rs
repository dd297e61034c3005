//! Config validation: unknown-key detection with Levenshtein suggestions
//! and range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Unknown keys never break a config.

use std::collections::HashSet;

use super::ServiceConfig;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for ServiceConfig.
///
/// Any new field added to ServiceConfig must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [server]
        "server",
        "server.addr",
        "server.cors_origins",
        // [artifacts]
        "artifacts",
        "artifacts.model_path",
        "artifacts.encoder_path",
        "artifacts.stats_path",
        // [prediction]
        "prediction",
        "prediction.fallback_critic_score",
        "prediction.default_release_year",
        "prediction.default_release_month",
        // [narrative]
        "narrative",
        "narrative.storefront",
        "narrative.dataset_label",
        "narrative.emphasis",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, dist)| dist <= 3)
        // tie-break on the key so the suggestion is stable across runs
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

/// Validate value ranges on a parsed ServiceConfig.
///
/// Returns (errors, warnings). Errors are impossible values that must
/// prevent startup; warnings are suspicious but not fatal.
pub fn validate_ranges(config: &ServiceConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let p = &config.prediction;

    if !(1..=12).contains(&p.default_release_month) {
        errors.push(format!(
            "prediction.default_release_month = {} is outside 1-12",
            p.default_release_month
        ));
    }

    if !p.fallback_critic_score.is_finite() || !(0.0..=100.0).contains(&p.fallback_critic_score) {
        errors.push(format!(
            "prediction.fallback_critic_score = {:.1} is outside 0-100",
            p.fallback_critic_score
        ));
    }

    let a = &config.artifacts;
    for (name, path) in [
        ("artifacts.model_path", &a.model_path),
        ("artifacts.encoder_path", &a.encoder_path),
        ("artifacts.stats_path", &a.stats_path),
    ] {
        if path.as_os_str().is_empty() {
            errors.push(format!("{name} must not be empty"));
        }
    }

    if config.server.addr.trim().is_empty() {
        errors.push("server.addr must not be empty".to_string());
    }

    if config.narrative.storefront.trim().is_empty() {
        errors.push("narrative.storefront must not be empty".to_string());
    }

    // Release years outside the catalogue era are legal but almost always a typo
    if !(1970..=2100).contains(&p.default_release_year) {
        warnings.push(ValidationWarning {
            field: "prediction.default_release_year".to_string(),
            message: format!(
                "default_release_year = {} is outside the typical range (1970-2100)",
                p.default_release_year
            ),
            suggestion: None,
        });
    }

    if config.server.cors_origins.is_empty() {
        warnings.push(ValidationWarning {
            field: "server.cors_origins".to_string(),
            message: "cors_origins is empty; browsers on other origins will be refused"
                .to_string(),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("emphasis", "emphasis"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("emphasys", "emphasis"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [artifacts]
            model_path = "m.json"
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"artifacts".to_string()));
        assert!(keys.contains(&"artifacts.model_path".to_string()));
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let toml_str = r#"
[artifacts]
stat_path = "stats.csv"
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "artifacts.stat_path");
        assert_eq!(
            warnings[0].suggestion.as_deref(),
            Some("artifacts.stats_path")
        );
    }

    #[test]
    fn test_suggest_correction_no_match_for_garbage() {
        let known = known_config_keys();
        assert!(suggest_correction("completely_unrelated_garbage_key_xyz", &known).is_none());
    }

    #[test]
    fn test_defaults_are_clean() {
        let (errors, warnings) = validate_ranges(&ServiceConfig::default());
        assert!(errors.is_empty(), "{errors:?}");
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn test_fallback_score_out_of_range() {
        let mut config = ServiceConfig::default();
        config.prediction.fallback_critic_score = 140.0;
        let (errors, _) = validate_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("fallback_critic_score")));
    }

    #[test]
    fn test_unusual_year_only_warns() {
        let mut config = ServiceConfig::default();
        config.prediction.default_release_year = 1800;
        let (errors, warnings) = validate_ranges(&config);
        assert!(errors.is_empty());
        assert!(warnings.iter().any(|w| w.field.contains("default_release_year")));
    }
}
