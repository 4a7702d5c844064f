//! BloFin API Response Types
//!
//! Wire-format structs for the BloFin REST v1 endpoints. BloFin, like
//! most OKX-lineage exchanges, serializes every numeric field as a
//! JSON string, so all numerics here are `String` (or optional) and
//! get parsed leniently at the adapter boundary — a missing or
//! unparsable field reads as 0, matching the upstream payload quirks.

use serde::Deserialize;

/// Standard BloFin response envelope.
///
/// `code == "0"` signals success; `data` may still be absent on some
/// error paths, which the client surfaces as a malformed response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// Business result code, "0" on success.
    pub code: String,
    /// Human-readable message accompanying non-zero codes.
    #[serde(default)]
    pub msg: String,
    /// Payload rows.
    pub data: Option<Vec<T>>,
}

/// One asset row from `/api/v1/account/balance`.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceDetail {
    /// Asset code.
    #[serde(default)]
    pub currency: String,
    /// Total balance.
    #[serde(default)]
    pub balance: Option<String>,
    /// Available balance.
    #[serde(default)]
    pub available: Option<String>,
}

/// One row from `/api/v1/account/positions`.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionDetail {
    /// Instrument id (`BTC-USDT`).
    #[serde(rename = "instId", default)]
    pub inst_id: String,
    /// Signed position quantity.
    #[serde(default)]
    pub positions: Option<String>,
    /// "long" / "short" / "net".
    #[serde(rename = "positionSide", default)]
    pub position_side: Option<String>,
    /// Average entry price.
    #[serde(rename = "averagePrice", default)]
    pub average_price: Option<String>,
    /// Unrealized PnL.
    #[serde(rename = "unrealizedPnl", default)]
    pub unrealized_pnl: Option<String>,
    /// Initial margin.
    #[serde(rename = "initialMargin", default)]
    pub initial_margin: Option<String>,
    /// Mark price.
    #[serde(rename = "markPrice", default)]
    pub mark_price: Option<String>,
}

/// One row from `/api/v1/trade/orders-pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetail {
    /// Instrument id (`BTC-USDT`).
    #[serde(rename = "instId", default)]
    pub inst_id: String,
    /// Limit price.
    #[serde(default)]
    pub price: Option<String>,
    /// Order size in contracts.
    #[serde(default)]
    pub size: Option<String>,
    /// "buy" / "sell".
    #[serde(default)]
    pub side: Option<String>,
    /// "long" / "short" / "net".
    #[serde(rename = "positionSide", default)]
    pub position_side: Option<String>,
    /// Order type, lowercase on the wire.
    #[serde(rename = "orderType", default)]
    pub order_type: Option<String>,
}

/// One row from `/api/v1/trade/orders-history`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderHistoryDetail {
    /// Instrument id (`BTC-USDT`).
    #[serde(rename = "instId", default)]
    pub inst_id: String,
    /// Order state ("filled", "canceled", ...).
    #[serde(default)]
    pub state: String,
    /// Realized PnL.
    #[serde(default)]
    pub pnl: Option<String>,
    /// Fee, already signed by the exchange.
    #[serde(default)]
    pub fee: Option<String>,
    /// Last update time, epoch ms.
    #[serde(rename = "updateTime", default)]
    pub update_time: Option<String>,
    /// Exchange order id.
    #[serde(rename = "orderId", default)]
    pub order_id: Option<String>,
}

/// One row from `/api/v1/market/tickers`.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerDetail {
    /// Last traded price.
    #[serde(default)]
    pub last: Option<String>,
    /// Last traded quantity.
    #[serde(rename = "lastSize", default)]
    pub last_size: Option<String>,
    /// Exchange timestamp, epoch ms.
    #[serde(default)]
    pub ts: Option<String>,
}

/// Parse a BloFin string-typed numeric field, defaulting to 0.0 for
/// missing, empty, or unparsable values.
pub fn parse_f64(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Parse a string-typed millisecond timestamp, `None` when absent or
/// unparsable so the caller can substitute local time.
pub fn parse_millis(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok())
}
