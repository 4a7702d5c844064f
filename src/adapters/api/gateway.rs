//! BloFin Gateway - ExchangeGateway Port Implementation
//!
//! Maps the BloFin v1 REST endpoints onto the `ExchangeGateway` port,
//! converting the string-typed wire rows into the parsed row structs
//! the sync loops consume.

use async_trait::async_trait;

use super::client::RestClient;
use super::types::{
    self, BalanceDetail, OrderDetail, OrderHistoryDetail, PositionDetail,
    TickerDetail,
};
use crate::ports::exchange::{
    BalanceRow, ExchangeError, ExchangeGateway, OrderHistoryRow, OrderRow,
    PositionRow, TickerRow,
};

const BALANCE_PATH: &str = "/api/v1/account/balance";
const POSITIONS_PATH: &str = "/api/v1/account/positions";
const PENDING_ORDERS_PATH: &str = "/api/v1/trade/orders-pending";
const ORDER_HISTORY_PATH: &str = "/api/v1/trade/orders-history";
const TICKERS_PATH: &str = "/api/v1/market/tickers";

/// `ExchangeGateway` implementation backed by the signed REST client.
pub struct BlofinGateway {
    client: RestClient,
}

impl BlofinGateway {
    /// Create a gateway over an authenticated REST client.
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ExchangeGateway for BlofinGateway {
    async fn get_balance(&self, account_type: &str) -> Result<Vec<BalanceRow>, ExchangeError> {
        let rows: Vec<BalanceDetail> = self
            .client
            .get_data(BALANCE_PATH, &[("accountType", account_type)])
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| BalanceRow {
                currency: row.currency,
                balance: types::parse_f64(row.balance.as_deref()),
                available: types::parse_f64(row.available.as_deref()),
            })
            .collect())
    }

    async fn get_positions(&self) -> Result<Vec<PositionRow>, ExchangeError> {
        let rows: Vec<PositionDetail> =
            self.client.get_data(POSITIONS_PATH, &[]).await?;

        Ok(rows
            .into_iter()
            .map(|row| PositionRow {
                inst_id: row.inst_id,
                positions: types::parse_f64(row.positions.as_deref()),
                position_side: row.position_side.unwrap_or_else(|| "net".to_string()),
                average_price: types::parse_f64(row.average_price.as_deref()),
                unrealized_pnl: types::parse_f64(row.unrealized_pnl.as_deref()),
                initial_margin: types::parse_f64(row.initial_margin.as_deref()),
                mark_price: types::parse_f64(row.mark_price.as_deref()),
            })
            .collect())
    }

    async fn get_active_orders(&self) -> Result<Vec<OrderRow>, ExchangeError> {
        let rows: Vec<OrderDetail> =
            self.client.get_data(PENDING_ORDERS_PATH, &[]).await?;

        Ok(rows
            .into_iter()
            .map(|row| OrderRow {
                inst_id: row.inst_id,
                price: types::parse_f64(row.price.as_deref()),
                size: types::parse_f64(row.size.as_deref()),
                side: row.side.unwrap_or_default(),
                position_side: row.position_side.unwrap_or_else(|| "net".to_string()),
                order_type: row.order_type.unwrap_or_else(|| "limit".to_string()),
            })
            .collect())
    }

    async fn get_order_history(
        &self,
        limit: u32,
        after: Option<String>,
    ) -> Result<Vec<OrderHistoryRow>, ExchangeError> {
        let limit = limit.to_string();
        let mut query: Vec<(&str, &str)> = vec![("limit", &limit)];
        if let Some(after) = after.as_deref() {
            query.push(("after", after));
        }

        let rows: Vec<OrderHistoryDetail> =
            self.client.get_data(ORDER_HISTORY_PATH, &query).await?;

        Ok(rows
            .into_iter()
            .map(|row| OrderHistoryRow {
                inst_id: row.inst_id,
                state: row.state,
                pnl: types::parse_f64(row.pnl.as_deref()),
                fee: types::parse_f64(row.fee.as_deref()),
                update_time: types::parse_millis(row.update_time.as_deref()),
                order_id: row.order_id.unwrap_or_default(),
            })
            .collect())
    }

    async fn get_tickers(&self, inst_id: &str) -> Result<Vec<TickerRow>, ExchangeError> {
        let rows: Vec<TickerDetail> = self
            .client
            .get_data(TICKERS_PATH, &[("instId", inst_id)])
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| TickerRow {
                last: types::parse_f64(row.last.as_deref()),
                last_size: types::parse_f64(row.last_size.as_deref()),
                ts: types::parse_millis(row.ts.as_deref()),
            })
            .collect())
    }
}
