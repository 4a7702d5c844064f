//! Exchange Gateway Port - Futures REST Read Interface
//!
//! Defines the trait through which the sync loops read account and
//! market state. Rows arrive with numeric fields already parsed; the
//! wire-format quirks (string-typed numbers, response envelopes) stay
//! inside the adapter.

use async_trait::async_trait;
use thiserror::Error;

/// Failure modes of an exchange gateway call.
///
/// The distinction matters only once: the supervisor's startup check
/// treats `Auth` and `MalformedResponse` as fatal, while the sync
/// loops treat every variant as a per-cycle retry.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Credentials rejected by the exchange.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// The exchange returned a non-success business code.
    #[error("API error {code}: {msg}")]
    Api { code: String, msg: String },

    /// Response parsed but the expected data payload was missing.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Transport-level failure (DNS, TLS, timeout, decode).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// One asset row from the futures balance endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceRow {
    /// Asset code (e.g. "USDT", "BTC").
    pub currency: String,
    /// Total balance.
    pub balance: f64,
    /// Balance available for trading.
    pub available: f64,
}

/// One position row.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionRow {
    /// Exchange instrument id (`BTC-USDT`).
    pub inst_id: String,
    /// Signed position quantity; zero means no open position.
    pub positions: f64,
    /// "long" / "short" in hedge mode, "net" otherwise.
    pub position_side: String,
    /// Average entry price.
    pub average_price: f64,
    /// Unrealized PnL.
    pub unrealized_pnl: f64,
    /// Initial margin.
    pub initial_margin: f64,
    /// Mark price.
    pub mark_price: f64,
}

/// One active (unfilled) order row.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
    /// Exchange instrument id (`BTC-USDT`).
    pub inst_id: String,
    /// Limit price.
    pub price: f64,
    /// Order size in contracts.
    pub size: f64,
    /// "buy" / "sell".
    pub side: String,
    /// "long" / "short" / "net".
    pub position_side: String,
    /// Exchange order type (e.g. "limit").
    pub order_type: String,
}

/// One order-history row.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderHistoryRow {
    /// Exchange instrument id (`BTC-USDT`).
    pub inst_id: String,
    /// Terminal state; only "filled" rows yield income records.
    pub state: String,
    /// Realized PnL of the fill.
    pub pnl: f64,
    /// Fee, already signed by the exchange.
    pub fee: f64,
    /// Last-update timestamp in epoch milliseconds, if reported.
    pub update_time: Option<i64>,
    /// Exchange order id; doubles as the pagination cursor.
    pub order_id: String,
}

/// One ticker row for a single instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerRow {
    /// Last traded price.
    pub last: f64,
    /// Last traded quantity.
    pub last_size: f64,
    /// Exchange timestamp in epoch milliseconds, if reported.
    pub ts: Option<i64>,
}

/// Read-only REST gateway to the futures exchange.
///
/// Every call maps to one HTTP request and returns the parsed data
/// rows or an `ExchangeError`. Implementations must not retry
/// internally — retry policy belongs to the sync loops.
#[async_trait]
pub trait ExchangeGateway: Send + Sync + 'static {
    /// Fetch account balances for the given account type
    /// (e.g. "futures").
    async fn get_balance(&self, account_type: &str) -> Result<Vec<BalanceRow>, ExchangeError>;

    /// Fetch all positions, including zero-size rows.
    async fn get_positions(&self) -> Result<Vec<PositionRow>, ExchangeError>;

    /// Fetch all active (unfilled) orders.
    async fn get_active_orders(&self) -> Result<Vec<OrderRow>, ExchangeError>;

    /// Fetch order history, optionally only rows after the given
    /// order id. The cursor is taken by value: the call happens once
    /// per polling cycle, so the clone is irrelevant.
    async fn get_order_history(
        &self,
        limit: u32,
        after: Option<String>,
    ) -> Result<Vec<OrderHistoryRow>, ExchangeError>;

    /// Fetch the latest ticker rows for one instrument id.
    async fn get_tickers(&self, inst_id: &str) -> Result<Vec<TickerRow>, ExchangeError>;
}
