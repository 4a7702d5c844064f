//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters, and
//! providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
    let path = Path::new(path);

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| "Failed to parse config.toml")?;

    validate_config(&config)?;

    info!(
        alias = %config.account.alias,
        symbols = config.account.symbols.len(),
        base_url = %config.api.base_url,
        "Configuration loaded successfully"
    );

    Ok(config)
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
    anyhow::ensure!(
        !config.account.alias.is_empty(),
        "account alias must not be empty"
    );
    anyhow::ensure!(
        config
            .account
            .alias
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
        "account alias '{}' must be alphanumeric (it names a data directory)",
        config.account.alias
    );

    anyhow::ensure!(
        !config.account.symbols.is_empty(),
        "at least one symbol must be configured"
    );
    for symbol in &config.account.symbols {
        anyhow::ensure!(
            !symbol.is_empty() && symbol.chars().all(|c| c.is_ascii_alphanumeric()),
            "symbol '{symbol}' must be in internal format (e.g. BTCUSDT)"
        );
    }

    anyhow::ensure!(
        !config.api.base_url.is_empty(),
        "API base URL must not be empty"
    );
    anyhow::ensure!(
        config.api.timeout_ms > 0,
        "API timeout must be positive, got {}",
        config.api.timeout_ms
    );

    anyhow::ensure!(
        !config.persistence.data_dir.is_empty(),
        "data directory must not be empty"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> Result<()> {
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        validate_config(&config)
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_minimal_valid_config() {
        let result = parse(
            r#"
            [scraper]
            name = "blofin-main"

            [account]
            alias = "main"
            symbols = ["BTCUSDT", "ETHUSDT"]
            "#,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_empty_symbols_rejected() {
        let result = parse(
            r#"
            [scraper]
            name = "blofin-main"

            [account]
            alias = "main"
            symbols = []
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_hyphenated_symbol_rejected() {
        // symbols are configured in internal format, not exchange format
        let result = parse(
            r#"
            [scraper]
            name = "blofin-main"

            [account]
            alias = "main"
            symbols = ["BTC-USDT"]
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_applied() {
        let config: AppConfig = toml::from_str(
            r#"
            [scraper]
            name = "blofin-main"

            [account]
            alias = "main"
            symbols = ["BTCUSDT"]
            "#,
        )
        .unwrap();
        assert_eq!(config.scraper.log_level, "info");
        assert_eq!(config.api.base_url, "https://openapi.blofin.com");
        assert_eq!(config.api.timeout_ms, 30_000);
        assert_eq!(config.persistence.data_dir, "data");
    }
}
