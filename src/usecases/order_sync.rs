//! Open Order Sync Loop
//!
//! Polls the active (unfilled) orders and republishes the full list
//! each cycle. Fixed cadence: the sleep is the same whether the cycle
//! succeeded or failed.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::time::sleep;
use tracing::{info, warn};

use super::ORDER_SYNC_INTERVAL;
use crate::domain::model::{Order, OrderSide, PositionSide};
use crate::domain::symbol::to_internal_format;
use crate::ports::exchange::{ExchangeGateway, OrderRow};
use crate::ports::repository::Repository;

/// Long-running open-order synchronizer for one account.
pub struct OrderSync<G, R> {
    gateway: Arc<G>,
    repository: Arc<R>,
    alias: String,
}

impl<G: ExchangeGateway, R: Repository> OrderSync<G, R> {
    /// Create an order sync for the given account alias.
    pub fn new(gateway: Arc<G>, repository: Arc<R>, alias: String) -> Self {
        Self {
            gateway,
            repository,
            alias,
        }
    }

    /// Run forever on a fixed cadence.
    pub async fn run(self) {
        loop {
            if let Err(e) = self.sync_once().await {
                warn!(account = %self.alias, error = %e, "Failed to process orders");
            }
            sleep(ORDER_SYNC_INTERVAL).await;
        }
    }

    /// Execute one fetch-transform-emit cycle.
    pub async fn sync_once(&self) -> Result<()> {
        let rows = self
            .gateway
            .get_active_orders()
            .await
            .context("active orders fetch failed")?;

        let orders = build_orders(&rows);

        // full-replace snapshot, empty list included
        self.repository
            .process_orders(&orders, &self.alias)
            .await
            .context("orders emit failed")?;

        info!(account = %self.alias, count = orders.len(), "Synced orders");
        Ok(())
    }
}

/// Build one immutable `Order` per row.
///
/// An explicit long/short position side wins; in net mode the side the
/// order acts on is inferred from buy/sell. Rows whose side field is
/// unrecognized are dropped with a warning rather than guessed at.
fn build_orders(rows: &[OrderRow]) -> Vec<Order> {
    let mut orders = Vec::with_capacity(rows.len());

    for row in rows {
        let Some(side) = OrderSide::from_exchange(&row.side) else {
            warn!(inst_id = %row.inst_id, side = %row.side, "Skipping order with unknown side");
            continue;
        };

        let position_side = match row.position_side.as_str() {
            "long" => PositionSide::Long,
            "short" => PositionSide::Short,
            _ => match side {
                OrderSide::Buy => PositionSide::Long,
                OrderSide::Sell => PositionSide::Short,
            },
        };

        orders.push(Order {
            symbol: to_internal_format(&row.inst_id),
            price: row.price,
            quantity: row.size,
            side,
            position_side,
            order_type: row.order_type.to_uppercase(),
        });
    }

    orders
}
