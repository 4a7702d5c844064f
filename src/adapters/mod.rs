//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP client, file I/O). Each sub-module
//! groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `api`: BloFin REST API client, auth, and gateway
//! - `persistence`: JSONL snapshots and income logs

pub mod api;
pub mod persistence;
