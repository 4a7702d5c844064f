//! Trade / Income History Sync Loop
//!
//! Polls the order-history endpoint with an incremental "after"
//! cursor, turns every filled order with non-zero realized PnL into an
//! `Income` record, and appends the batch to the repository. The
//! cursor is process-lifetime state: it starts unset and advances to
//! the highest order id seen among the filled rows of each page, even
//! when none of them produced an income (zero-PnL fills must not stall
//! pagination).

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::time::sleep;
use tracing::{error, info};

use super::{HISTORY_PAGE_LIMIT, TRADE_SYNC_INTERVAL};
use crate::domain::model::{now_millis, Income};
use crate::ports::exchange::{ExchangeGateway, OrderHistoryRow};
use crate::ports::repository::Repository;

/// Terminal state that produces income records.
const STATE_FILLED: &str = "filled";

/// Long-running trade-history synchronizer for one account.
pub struct TradeSync<G, R> {
    gateway: Arc<G>,
    repository: Arc<R>,
    alias: String,
    /// Last successfully observed order id; `None` until the first
    /// page has been processed.
    cursor: Option<String>,
}

impl<G: ExchangeGateway, R: Repository> TradeSync<G, R> {
    /// Create a trade sync for the given account alias.
    pub fn new(gateway: Arc<G>, repository: Arc<R>, alias: String) -> Self {
        Self {
            gateway,
            repository,
            alias,
            cursor: None,
        }
    }

    /// Run forever on a fixed cadence. A failed cycle leaves the
    /// cursor unchanged, so the same page is safely retried.
    pub async fn run(mut self) {
        loop {
            if let Err(e) = self.sync_once().await {
                error!(account = %self.alias, error = %e, "Failed to process trades");
            }
            sleep(TRADE_SYNC_INTERVAL).await;
        }
    }

    /// Execute one fetch-transform-emit cycle.
    pub async fn sync_once(&mut self) -> Result<()> {
        let rows = self
            .gateway
            .get_order_history(HISTORY_PAGE_LIMIT, self.cursor.clone())
            .await
            .context("order history fetch failed")?;

        let (incomes, max_order_id) = collect_incomes(&rows);

        if !incomes.is_empty() {
            self.repository
                .process_incomes(&incomes, &self.alias)
                .await
                .context("incomes emit failed")?;
        }

        // cursor only advances after the page was fully processed
        if let Some(order_id) = max_order_id {
            self.cursor = Some(order_id);
        }

        info!(account = %self.alias, incomes = incomes.len(), "Synced trades");
        Ok(())
    }

    /// Current pagination cursor (exposed for tests).
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

/// Compare two exchange order ids.
///
/// BloFin ids are decimal strings, so (length, lexicographic) ordering
/// equals numeric ordering without parsing.
fn order_id_max<'a>(a: &'a str, b: &'a str) -> &'a str {
    if (b.len(), b) > (a.len(), a) { b } else { a }
}

/// Collect income records and the new cursor from one history page.
///
/// Only filled rows are considered at all; among them, every row with
/// non-zero PnL becomes an income whose amount nets the signed fee
/// into the realized PnL, and every row advances the cursor candidate
/// regardless of PnL.
fn collect_incomes(rows: &[OrderHistoryRow]) -> (Vec<Income>, Option<String>) {
    let mut incomes = Vec::new();
    let mut max_order_id: Option<&str> = None;

    for row in rows {
        if row.state != STATE_FILLED {
            continue;
        }

        if row.pnl != 0.0 {
            incomes.push(Income::realized_pnl(
                &row.inst_id,
                row.pnl,
                row.fee,
                row.update_time.unwrap_or_else(now_millis),
                &row.order_id,
            ));
        }

        if !row.order_id.is_empty() {
            max_order_id = Some(match max_order_id {
                Some(current) => order_id_max(current, row.order_id.as_str()),
                None => row.order_id.as_str(),
            });
        }
    }

    (incomes, max_order_id.map(str::to_string))
}
