//! Domain layer - Core data shapes and normalization rules.
//!
//! Pure value records and conversion functions shared by every sync
//! loop. No external dependencies allowed here (hexagonal architecture
//! inner ring). All types are serializable and testable in isolation.

pub mod model;
pub mod symbol;

// Re-export core types for convenience
pub use model::{
    Account, AssetBalance, Balance, Income, Order, OrderSide, Position,
    PositionSide, Tick,
};
pub use symbol::{to_exchange_format, to_internal_format};
