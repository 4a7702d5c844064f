//! BloFin Authentication — HMAC-SHA256 Request Signing
//!
//! Signs every REST request per the BloFin API specification.
//! Credentials come from environment variables (BLOFIN_API_KEY,
//! BLOFIN_API_SECRET, BLOFIN_PASSPHRASE).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use base64::Engine;

use crate::domain::model::Account;

/// Thread-safe nonce generator: timestamp_seed + atomic counter.
///
/// Guarantees unique nonces even for concurrent requests within the
/// same millisecond. Seed is set once at construction from the system
/// clock; counter increments atomically per request.
static NONCE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// BloFin API authentication handler.
///
/// Holds API key, secret, and passphrase and computes the
/// `ACCESS-SIGN` header for each request.
pub struct BlofinAuth {
    /// API key sent as ACCESS-KEY.
    api_key: String,
    /// API secret (never sent in headers, only the signature).
    api_secret: String,
    /// Passphrase sent as ACCESS-PASSPHRASE.
    passphrase: String,
    /// Timestamp seed set at construction for nonce generation.
    nonce_seed: u64,
}

/// Complete header set for one signed request.
#[derive(Debug)]
pub struct AuthHeaders {
    pub api_key: String,
    pub signature: String,
    pub timestamp: String,
    pub nonce: String,
    pub passphrase: String,
}

impl BlofinAuth {
    /// Build the auth handler from an account's credentials.
    pub fn new(account: &Account) -> Self {
        let nonce_seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        Self {
            api_key: account.api_key.clone(),
            api_secret: account.api_secret.clone(),
            passphrase: account.api_passphrase.clone(),
            nonce_seed,
        }
    }

    /// Load credentials from environment variables into an `Account`.
    ///
    /// Required env vars: BLOFIN_API_KEY, BLOFIN_API_SECRET,
    /// BLOFIN_PASSPHRASE. These MUST be set in `.env` (never
    /// committed to git).
    pub fn account_from_env(alias: &str) -> Result<Account> {
        let api_key = std::env::var("BLOFIN_API_KEY")
            .context("BLOFIN_API_KEY not set")?;
        let api_secret = std::env::var("BLOFIN_API_SECRET")
            .context("BLOFIN_API_SECRET not set")?;
        let api_passphrase = std::env::var("BLOFIN_PASSPHRASE")
            .context("BLOFIN_PASSPHRASE not set")?;

        Ok(Account {
            alias: alias.to_string(),
            api_key,
            api_secret,
            api_passphrase,
        })
    }

    /// Generate a unique nonce using timestamp_seed + atomic increment.
    pub fn generate_nonce(&self) -> u64 {
        let counter = NONCE_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.nonce_seed + counter
    }

    /// Current Unix timestamp in milliseconds (BloFin signs in ms).
    pub fn timestamp(&self) -> String {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis()
            .to_string()
    }

    /// Sign a request per the BloFin scheme.
    ///
    /// Prehash is `path + method + timestamp + nonce + body`; the
    /// HMAC-SHA256 digest is hex-encoded, then that hex string is
    /// base64-encoded. The secret is NEVER sent as a header — only
    /// the computed signature.
    pub fn sign(
        &self,
        timestamp: &str,
        nonce: &str,
        method: &str,
        path: &str,
        body: &str,
    ) -> String {
        let message = format!("{path}{method}{timestamp}{nonce}{body}");
        let mac = hmac_sha256::HMAC::mac(
            message.as_bytes(),
            self.api_secret.as_bytes(),
        );
        let hex: String = mac.iter().map(|b| format!("{b:02x}")).collect();
        base64::engine::general_purpose::STANDARD.encode(hex.as_bytes())
    }

    /// Build all authentication headers for one request.
    pub fn auth_headers(&self, method: &str, path: &str, body: &str) -> AuthHeaders {
        let timestamp = self.timestamp();
        let nonce = self.generate_nonce().to_string();
        let signature = self.sign(&timestamp, &nonce, method, path, body);
        AuthHeaders {
            api_key: self.api_key.clone(),
            signature,
            timestamp,
            nonce,
            passphrase: self.passphrase.clone(),
        }
    }
}
