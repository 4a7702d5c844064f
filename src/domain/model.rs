//! Core scraper domain types.
//!
//! Value records produced by the sync loops and handed to the
//! repository sink. Every record is rebuilt from scratch each polling
//! cycle — there is no cross-cycle entity identity, so all types are
//! plain serializable data with no interior mutability.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::symbol::to_internal_format;

/// Fixed quote currency for the futures account.
pub const QUOTE_ASSET: &str = "USDT";

/// Income type tag for realized-PnL records.
pub const INCOME_TYPE_REALIZED_PNL: &str = "REALIZED_PNL";

/// Current Unix time in milliseconds, used wherever the exchange
/// omits a timestamp.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Static account configuration supplied by the environment.
#[derive(Debug, Clone)]
pub struct Account {
    /// Display key under which the repository stores this account.
    pub alias: String,
    /// BloFin API key.
    pub api_key: String,
    /// BloFin API secret (never logged, never persisted).
    pub api_secret: String,
    /// BloFin API passphrase.
    pub api_passphrase: String,
}

/// Balance of a single non-quote asset in the futures account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetBalance {
    /// Asset code (e.g. "BTC").
    pub asset: String,
    /// Balance amount in the asset's own unit.
    pub balance: f64,
    /// Per-asset unrealized profit. BloFin reports PnL only at the
    /// position level, so this is always 0.0 for non-quote assets.
    pub unrealized_profit: f64,
}

/// Account balance snapshot emitted once per balance-sync cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Total USDT balance (the quote-currency row only).
    pub total_balance: f64,
    /// Unrealized PnL summed across all open positions.
    ///
    /// Populated by a best-effort secondary positions fetch: when that
    /// fetch fails the value is 0.0, indistinguishable from a genuine
    /// zero. Consumers must not read absence into this field.
    pub total_unrealized_profit: f64,
    /// Non-quote asset rows.
    pub assets: Vec<AssetBalance>,
}

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    #[serde(rename = "LONG")]
    Long,
    #[serde(rename = "SHORT")]
    Short,
}

impl PositionSide {
    /// Resolve the side of a position row.
    ///
    /// An explicit `positionSide` of "long"/"short" (hedge mode) wins;
    /// in net mode the field reads "net" and the side is inferred from
    /// the sign of the quantity.
    pub fn resolve(position_side: &str, quantity: f64) -> Self {
        match position_side {
            "long" => Self::Long,
            "short" => Self::Short,
            _ => {
                if quantity > 0.0 {
                    Self::Long
                } else {
                    Self::Short
                }
            }
        }
    }
}

impl std::fmt::Display for PositionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
        }
    }
}

/// Open position snapshot row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Internal symbol (`BTCUSDT`).
    pub symbol: String,
    /// Average entry price.
    pub entry_price: f64,
    /// Position size as a non-negative magnitude; direction lives in
    /// `side`.
    pub position_size: f64,
    /// LONG or SHORT, resolved per `PositionSide::resolve`.
    pub side: PositionSide,
    /// Unrealized PnL of this position.
    pub unrealized_profit: f64,
    /// Initial margin allocated to this position.
    pub initial_margin: f64,
    /// Current mark price.
    pub mark_price: f64,
}

/// Side of an open order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
}

impl OrderSide {
    /// Parse the exchange's lowercase side field.
    pub fn from_exchange(side: &str) -> Option<Self> {
        match side.to_ascii_uppercase().as_str() {
            "BUY" => Some(Self::Buy),
            "SELL" => Some(Self::Sell),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Open (unfilled) order snapshot row.
///
/// Constructed atomically from one exchange row — never populated
/// field-by-field, so a partially-built order can never be observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Internal symbol (`BTCUSDT`).
    pub symbol: String,
    /// Limit price.
    pub price: f64,
    /// Order quantity in contracts.
    pub quantity: f64,
    /// BUY or SELL.
    pub side: OrderSide,
    /// Position side the order acts on. Explicit in hedge mode; in
    /// net mode inferred from the order side (BUY opens LONG).
    pub position_side: PositionSide,
    /// Order type, uppercased (e.g. "LIMIT", "MARKET").
    pub order_type: String,
}

/// Latest-trade tick for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Internal symbol (`BTCUSDT`).
    pub symbol: String,
    /// Last traded price.
    pub price: f64,
    /// Last traded quantity.
    pub qty: f64,
    /// Exchange timestamp in epoch milliseconds; falls back to local
    /// time when the exchange omits it.
    pub timestamp: i64,
}

/// Realized-PnL income record derived from a filled order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    /// Internal symbol (`BTCUSDT`).
    pub symbol: String,
    /// Settlement asset, always USDT on BloFin futures.
    pub asset: String,
    /// Income category, always "REALIZED_PNL" for this scraper.
    pub income_type: String,
    /// Realized PnL net of fees. The exchange reports fees already
    /// signed, so this is a plain `pnl + fee` sum.
    pub income: f64,
    /// Fill timestamp in epoch milliseconds.
    pub timestamp: i64,
    /// Exchange order id, used as the idempotency key downstream.
    pub transaction_id: String,
}

impl Income {
    /// Build a realized-PnL income from a filled order's fields.
    pub fn realized_pnl(inst_id: &str, pnl: f64, fee: f64, timestamp: i64, order_id: &str) -> Self {
        Self {
            symbol: to_internal_format(inst_id),
            asset: QUOTE_ASSET.to_string(),
            income_type: INCOME_TYPE_REALIZED_PNL.to_string(),
            income: pnl + fee,
            timestamp,
            transaction_id: order_id.to_string(),
        }
    }
}
