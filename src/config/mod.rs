//! Configuration Module - TOML-based Scraper Configuration
//!
//! Loads and validates configuration from `config.toml`. Only
//! non-secret settings live here; API credentials come exclusively
//! from environment variables (see `adapters::api::auth`).

pub mod loader;

use serde::Deserialize;

/// Top-level scraper configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before any sync loop is launched.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Process identity and logging.
    pub scraper: ScraperConfig,
    /// Account to synchronize.
    pub account: AccountConfig,
    /// Exchange API endpoint settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Repository sink settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

/// Process identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Human-readable process name.
    pub name: String,
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Account configuration (non-secret part).
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    /// Display key under which the repository stores this account.
    pub alias: String,
    /// Symbols to track, internal format (`BTCUSDT`).
    pub symbols: Vec<String>,
}

/// Exchange API endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// REST base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Repository sink configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
    /// Base directory for per-account data files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "https://openapi.blofin.com".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_data_dir() -> String {
    "data".to_string()
}
