//! Service Configuration - artifact locations, server and narrative settings
//!
//! Each struct implements `Default` with the values in [`super::defaults`],
//! so the service runs unchanged when no config file is present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "STOREFRONT_ETA_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "storefront_eta.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one deployment.
///
/// Load with `ServiceConfig::load()` which searches:
/// 1. `$STOREFRONT_ETA_CONFIG` env var
/// 2. `./storefront_eta.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Model, encoder and statistics table locations
    #[serde(default)]
    pub artifacts: ArtifactPaths,

    /// Fallback and request defaults
    #[serde(default)]
    pub prediction: PredictionSettings,

    /// Sentence wording
    #[serde(default)]
    pub narrative: NarrativeSettings,
}

/// Where a loaded config came from, for startup logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(p) => write!(f, "{}", p.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

impl ServiceConfig {
    /// Load configuration using the standard search order:
    /// 1. `$STOREFRONT_ETA_CONFIG` environment variable
    /// 2. `./storefront_eta.toml` in the current working directory
    /// 3. Built-in defaults
    ///
    /// A file that exists but cannot be read, parsed or validated is an
    /// error; the service must not start on a half-understood config.
    pub fn load() -> Result<(Self, ConfigSource), ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if !p.exists() {
                return Err(ConfigError::Missing(p));
            }
            let config = Self::load_from_file(&p)?;
            info!(path = %p.display(), "Loaded service config from {}", CONFIG_ENV_VAR);
            return Ok((config, ConfigSource::File(p)));
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            let config = Self::load_from_file(&local)?;
            info!("Loaded service config from ./{}", LOCAL_CONFIG_FILE);
            return Ok((config, ConfigSource::File(local)));
        }

        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Ok((Self::default(), ConfigSource::Defaults))
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document. Unknown keys only warn.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate value ranges. Any error here is fatal at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (errors, warnings) = super::validation::validate_ranges(self);
        for w in &warnings {
            warn!("{}", w);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),
    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:5000"
    #[serde(default = "default_server_addr")]
    pub addr: String,

    /// Allowed CORS origins; `"*"` allows any origin
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_server_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
            cors_origins: default_cors_origins(),
        }
    }
}

// ============================================================================
// Artifacts
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactPaths {
    /// Regression model (JSON booster dump)
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Publisher label encoder (JSON class list)
    #[serde(default = "default_encoder_path")]
    pub encoder_path: PathBuf,

    /// Publisher statistics table (CSV)
    #[serde(default = "default_stats_path")]
    pub stats_path: PathBuf,
}

fn default_model_path() -> PathBuf {
    PathBuf::from(defaults::MODEL_PATH)
}
fn default_encoder_path() -> PathBuf {
    PathBuf::from(defaults::ENCODER_PATH)
}
fn default_stats_path() -> PathBuf {
    PathBuf::from(defaults::STATS_PATH)
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            encoder_path: default_encoder_path(),
            stats_path: default_stats_path(),
        }
    }
}

// ============================================================================
// Prediction
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionSettings {
    /// Critic score assumed for a publisher with no history
    #[serde(default = "default_fallback_critic_score")]
    pub fallback_critic_score: f64,

    /// Release year applied when a request omits it
    #[serde(default = "default_release_year")]
    pub default_release_year: i32,

    /// Release month applied when a request omits it
    #[serde(default = "default_release_month")]
    pub default_release_month: u32,
}

fn default_fallback_critic_score() -> f64 {
    defaults::FALLBACK_CRITIC_SCORE
}
fn default_release_year() -> i32 {
    defaults::DEFAULT_RELEASE_YEAR
}
fn default_release_month() -> u32 {
    defaults::DEFAULT_RELEASE_MONTH
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            fallback_critic_score: default_fallback_critic_score(),
            default_release_year: default_release_year(),
            default_release_month: default_release_month(),
        }
    }
}

// ============================================================================
// Narrative
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeSettings {
    /// Storefront named in the sentence
    #[serde(default = "default_storefront")]
    pub storefront: String,

    /// Dataset named when a publisher has no history
    #[serde(default = "default_dataset_label")]
    pub dataset_label: String,

    /// Wrap the estimate and interval in `**` markers
    #[serde(default = "default_emphasis")]
    pub emphasis: bool,
}

fn default_storefront() -> String {
    defaults::STOREFRONT_NAME.to_string()
}
fn default_dataset_label() -> String {
    defaults::DATASET_LABEL.to_string()
}
fn default_emphasis() -> bool {
    true
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            storefront: default_storefront(),
            dataset_label: default_dataset_label(),
            emphasis: default_emphasis(),
        }
    }
}
