//! storefront-eta - storefront arrival prediction service
//!
//! # Usage
//!
//! ```bash
//! # Serve the HTTP API (default subcommand)
//! cargo run --release -- serve --addr 127.0.0.1:5000
//!
//! # One-off prediction printed as JSON
//! storefront-eta predict --game "Rocket Boots" --publisher "Acme" --critic-score 90
//!
//! # Validate config and artifacts without serving
//! storefront-eta check --dump-config
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_ETA_CONFIG`: Path to the TOML config file
//! - `STOREFRONT_ETA_ADDR`: Override the server bind address
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::info;

use storefront_eta::api::envelope::{ApiResponse, ResponseMeta};
use storefront_eta::api::{create_app, ApiState};
use storefront_eta::config::ConfigSource;
use storefront_eta::{PredictionRequest, Predictor, ServiceConfig};

/// Environment variable overriding `[server] addr`.
const ADDR_ENV_VAR: &str = "STOREFRONT_ETA_ADDR";

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "storefront-eta")]
#[command(about = "Predicts when a game will appear free on a digital storefront")]
#[command(version)]
struct CliArgs {
    /// Config file (default: $STOREFRONT_ETA_CONFIG, then ./storefront_eta.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Serve the HTTP API
    Serve {
        /// Override the server address (default from config: "0.0.0.0:5000")
        #[arg(short, long)]
        addr: Option<String>,
    },

    /// Predict a single game and print the result as JSON
    Predict {
        #[arg(long)]
        game: String,
        #[arg(long)]
        publisher: String,
        /// Critic (Metacritic) score of the game, if known
        #[arg(long)]
        critic_score: Option<f64>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },

    /// Load config and artifacts, report what was found, then exit
    Check {
        /// Also print the effective configuration as TOML
        #[arg(long)]
        dump_config: bool,
    },
}

// ============================================================================
// Startup
// ============================================================================

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

fn load_config(explicit: Option<PathBuf>) -> Result<ServiceConfig> {
    let (config, source) = match explicit {
        Some(path) => {
            let config = ServiceConfig::load_from_file(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            (config, ConfigSource::File(path))
        }
        None => ServiceConfig::load().context("Failed to load config")?,
    };
    info!(source = %source, "Configuration loaded");
    Ok(config)
}

fn load_predictor(config: &ServiceConfig) -> Result<Predictor> {
    Predictor::load(config).context("Failed to load prediction artifacts")
}

// ============================================================================
// Subcommands
// ============================================================================

async fn serve(config: ServiceConfig, addr_override: Option<String>) -> Result<()> {
    let addr = addr_override
        .or_else(|| std::env::var(ADDR_ENV_VAR).ok())
        .unwrap_or_else(|| config.server.addr.clone());

    let predictor = load_predictor(&config)?;
    let app = create_app(ApiState::new(predictor), &config.server);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!(addr = %addr, "HTTP server listening");

    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown");
        shutdown_token.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
        })
        .await
        .context("HTTP server error")?;

    info!("Shutdown complete");
    Ok(())
}

fn predict_once(
    config: &ServiceConfig,
    game: String,
    publisher: String,
    critic_score: Option<f64>,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<()> {
    let predictor = load_predictor(config)?;
    let defaults = predictor.prediction_settings();

    let mut request = PredictionRequest::new(game, publisher).with_release(
        year.unwrap_or(defaults.default_release_year),
        month.unwrap_or(defaults.default_release_month),
    );
    if let Some(score) = critic_score {
        request = request.with_critic_score(score);
    }
    let result = predictor.predict(&request)?;

    let body = ApiResponse {
        data: result,
        meta: ResponseMeta::default(),
    };
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn check(config: &ServiceConfig, dump_config: bool) -> Result<()> {
    if dump_config {
        let text = config.to_toml().context("Failed to serialize config")?;
        println!("{text}");
    }

    let predictor = load_predictor(config)?;
    let store = predictor.store();
    println!("model:      {}", config.artifacts.model_path.display());
    println!("encoder:    {}", config.artifacts.encoder_path.display());
    println!("statistics: {}", config.artifacts.stats_path.display());
    println!("publishers: {}", store.len());
    println!("global mean days to store: {:.1}", store.global_mean_days());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_json);

    let config = load_config(args.config)?;

    match args.command.unwrap_or(SubCommand::Serve { addr: None }) {
        SubCommand::Serve { addr } => serve(config, addr).await,
        SubCommand::Predict {
            game,
            publisher,
            critic_score,
            year,
            month,
        } => predict_once(&config, game, publisher, critic_score, year, month),
        SubCommand::Check { dump_config } => check(&config, dump_config),
    }
}
