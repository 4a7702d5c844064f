//! Use Cases Layer - The Sync Loops
//!
//! Five independent polling loops plus the supervisor that launches
//! them. Each loop fetches one endpoint category through the
//! `ExchangeGateway` port, normalizes the rows into domain records,
//! and hands them to the `Repository` port. Loops never terminate and
//! never propagate errors out of their own task; a failed cycle is
//! logged and retried after a backoff.
//!
//! Loops:
//! - `BalanceSync`: account balance + best-effort unrealized PnL
//! - `PositionSync`: open positions, refreshes the active-symbol set
//! - `OrderSync`: open-order snapshot
//! - `TradeSync`: filled-order history → realized-PnL incomes
//! - `TickSync`: latest tickers, one instance per configured symbol

pub mod active_symbols;
pub mod balance_sync;
pub mod order_sync;
pub mod position_sync;
pub mod supervisor;
pub mod tick_sync;
pub mod trade_sync;

use std::time::Duration;

pub use active_symbols::ActiveSymbolSet;
pub use balance_sync::BalanceSync;
pub use order_sync::OrderSync;
pub use position_sync::PositionSync;
pub use supervisor::SyncSupervisor;
pub use tick_sync::TickSync;
pub use trade_sync::TradeSync;

/// Account type passed to the balance endpoint.
pub const ACCOUNT_TYPE_FUTURES: &str = "futures";

/// Page size for order-history pagination.
pub const HISTORY_PAGE_LIMIT: u32 = 100;

/// Delay after a successful balance cycle.
pub const BALANCE_SYNC_INTERVAL: Duration = Duration::from_secs(100);

/// Delay after a successful position cycle.
pub const POSITION_SYNC_INTERVAL: Duration = Duration::from_secs(250);

/// Fixed open-order cadence, success or failure.
pub const ORDER_SYNC_INTERVAL: Duration = Duration::from_secs(120);

/// Fixed trade-history cadence, success or failure.
pub const TRADE_SYNC_INTERVAL: Duration = Duration::from_secs(120);

/// Delay after a successful tick cycle.
pub const TICK_SYNC_INTERVAL: Duration = Duration::from_secs(60);

/// Delay after a failed tick cycle.
pub const TICK_ERROR_BACKOFF: Duration = Duration::from_secs(120);

/// Delay after a failed balance or position cycle.
pub const ERROR_BACKOFF: Duration = Duration::from_secs(360);
