//! Repository Port - Normalized State Ingestion Interface
//!
//! Defines the sink the sync loops write into. Every operation is
//! keyed by account alias and must be idempotent: balances, positions,
//! orders, and ticks are full-replace snapshots; incomes are
//! append/merge records carrying their own idempotency key.
//!
//! The loops run on independent schedules, so implementations must
//! tolerate interleaved writes for the same account. Snapshot replace
//! must be atomic per account (a reader never sees half of an update).

use async_trait::async_trait;

use crate::domain::model::{Balance, Income, Order, Position, Tick};

/// Trait for persistence providers consuming scraper output.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Replace the stored balance snapshot for the account.
    async fn process_balances(&self, balance: &Balance, account: &str) -> anyhow::Result<()>;

    /// Replace the stored position list for the account. An empty
    /// slice clears the previous snapshot.
    async fn process_positions(&self, positions: &[Position], account: &str)
        -> anyhow::Result<()>;

    /// Replace the stored open-order list for the account. An empty
    /// slice clears the previous snapshot.
    async fn process_orders(&self, orders: &[Order], account: &str) -> anyhow::Result<()>;

    /// Append a batch of realized-PnL income records. Callers only
    /// invoke this with a non-empty batch.
    async fn process_incomes(&self, incomes: &[Income], account: &str) -> anyhow::Result<()>;

    /// Store the latest tick for one symbol.
    async fn process_tick(&self, tick: &Tick, account: &str) -> anyhow::Result<()>;

    /// Check if the repository is healthy (disk space, permissions).
    async fn is_healthy(&self) -> bool;
}
