//! Service Configuration Module
//!
//! Provides deployment configuration loaded from TOML files: artifact
//! locations, bind address, CORS origins, fallback values and sentence
//! wording.
//!
//! ## Loading Order
//!
//! 1. `STOREFRONT_ETA_CONFIG` environment variable (path to TOML file)
//! 2. `storefront_eta.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The loaded config is passed explicitly to the artifact loader and the
//! HTTP layer; nothing here is global.

mod service_config;
pub mod defaults;
pub mod validation;

pub use service_config::*;
