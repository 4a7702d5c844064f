//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the sync loops require from
//! the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `ExchangeGateway`: blocking-style REST reads of account and
//!   market state from the futures exchange
//! - `Repository`: ingestion sink for normalized records, keyed by
//!   account alias

pub mod exchange;
pub mod repository;
