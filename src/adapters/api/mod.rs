//! BloFin REST API Adapter
//!
//! Implements the `ExchangeGateway` port against the BloFin v1 REST
//! API. Handles authentication, request signing, envelope decoding,
//! and wire-to-row conversion.
//!
//! Sub-modules:
//! - `auth`: HMAC-SHA256 request signing, credentials from env
//! - `client`: signed GET client with per-request timeout
//! - `gateway`: `ExchangeGateway` implementation over the endpoints
//! - `types`: wire-format response types and lenient numeric parsing

pub mod auth;
pub mod client;
pub mod gateway;
pub mod types;

pub use auth::BlofinAuth;
pub use client::{RestClient, RestClientConfig};
pub use gateway::BlofinGateway;
