//! BloFin REST Client - Signed GET Requests
//!
//! Thin wrapper over reqwest for the read-only endpoints this scraper
//! uses. Every request carries the full BloFin auth header set and a
//! per-request timeout so a stalled exchange cannot wedge a sync loop.
//! No internal retries — retry policy belongs to the sync loops.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::auth::BlofinAuth;
use super::types::ApiResponse;
use crate::ports::exchange::ExchangeError;

/// Configuration for the REST client.
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    /// Base URL for the BloFin API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openapi.blofin.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Signed HTTP client for the BloFin REST API.
pub struct RestClient {
    /// Underlying HTTP client.
    http: Client,
    /// Authentication manager.
    auth: BlofinAuth,
    /// Client configuration.
    config: RestClientConfig,
}

impl RestClient {
    /// Create a new REST client.
    pub fn new(auth: BlofinAuth, config: RestClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(5)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, auth, config })
    }

    /// Execute a signed GET and decode the BloFin envelope.
    ///
    /// `query` pairs are appended to the path before signing — BloFin
    /// signs the full request path including the query string. A
    /// success envelope without a `data` payload is surfaced as
    /// `MalformedResponse` so the caller can treat it as fatal at
    /// startup.
    pub async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, ExchangeError> {
        let full_path = Self::path_with_query(path, query);
        let url = format!("{}{}", self.config.base_url, full_path);

        let headers = self.auth.auth_headers("GET", &full_path, "");

        debug!(path = %full_path, "GET");

        let response = self
            .http
            .get(&url)
            .header("ACCESS-KEY", &headers.api_key)
            .header("ACCESS-SIGN", &headers.signature)
            .header("ACCESS-TIMESTAMP", &headers.timestamp)
            .header("ACCESS-NONCE", &headers.nonce)
            .header("ACCESS-PASSPHRASE", &headers.passphrase)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ExchangeError::Auth(format!("HTTP {status}")));
        }

        let envelope: ApiResponse<T> = response.json().await?;

        if envelope.code != "0" {
            // 152xxx codes are credential problems
            if envelope.code.starts_with("152") {
                return Err(ExchangeError::Auth(envelope.msg));
            }
            return Err(ExchangeError::Api {
                code: envelope.code,
                msg: envelope.msg,
            });
        }

        envelope.data.ok_or_else(|| {
            ExchangeError::MalformedResponse(format!("missing data payload for {full_path}"))
        })
    }

    fn path_with_query(path: &str, query: &[(&str, &str)]) -> String {
        if query.is_empty() {
            return path.to_string();
        }
        let qs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{}?{}", path, qs.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_with_query() {
        assert_eq!(
            RestClient::path_with_query("/api/v1/market/tickers", &[("instId", "BTC-USDT")]),
            "/api/v1/market/tickers?instId=BTC-USDT"
        );
        assert_eq!(
            RestClient::path_with_query("/api/v1/account/positions", &[]),
            "/api/v1/account/positions"
        );
        assert_eq!(
            RestClient::path_with_query(
                "/api/v1/trade/orders-history",
                &[("limit", "100"), ("after", "123")]
            ),
            "/api/v1/trade/orders-history?limit=100&after=123"
        );
    }
}
