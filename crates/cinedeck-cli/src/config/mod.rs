//! Application configuration module.
//!
//! Manages the TOML config file holding API settings and the curated
//! favorites shown by the `favorites` subcommand.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{API_KEY_ENV, ApiConfig, AppConfig, resolve_api_key};
pub use paths::resolve_config_path;
