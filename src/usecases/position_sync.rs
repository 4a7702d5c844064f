//! Position Sync Loop
//!
//! Polls all positions, materializes the non-zero ones into the
//! repository snapshot, and refreshes the shared active-symbol set
//! that drives tick polling.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::time::sleep;
use tracing::{error, info};

use super::{ActiveSymbolSet, ERROR_BACKOFF, POSITION_SYNC_INTERVAL};
use crate::domain::model::{Position, PositionSide};
use crate::domain::symbol::to_internal_format;
use crate::ports::exchange::{ExchangeGateway, PositionRow};
use crate::ports::repository::Repository;

/// Long-running position synchronizer for one account.
pub struct PositionSync<G, R> {
    gateway: Arc<G>,
    repository: Arc<R>,
    alias: String,
    /// Configured symbols in exchange format; the active set resets to
    /// these at the start of every cycle.
    base_symbols: Vec<String>,
    active_symbols: ActiveSymbolSet,
}

impl<G: ExchangeGateway, R: Repository> PositionSync<G, R> {
    /// Create a position sync writing into the shared symbol set.
    pub fn new(
        gateway: Arc<G>,
        repository: Arc<R>,
        alias: String,
        base_symbols: Vec<String>,
        active_symbols: ActiveSymbolSet,
    ) -> Self {
        Self {
            gateway,
            repository,
            alias,
            base_symbols,
            active_symbols,
        }
    }

    /// Run forever: one cycle, then sleep; back off longer on failure.
    pub async fn run(self) {
        loop {
            match self.sync_once().await {
                Ok(()) => sleep(POSITION_SYNC_INTERVAL).await,
                Err(e) => {
                    error!(account = %self.alias, error = %e, "Failed to process positions");
                    sleep(ERROR_BACKOFF).await;
                }
            }
        }
    }

    /// Execute one fetch-transform-emit cycle.
    ///
    /// The active set resets to the base symbols before the fetch, so
    /// a failed fetch leaves tick polling on the configured symbols
    /// until the next cycle.
    pub async fn sync_once(&self) -> Result<()> {
        self.active_symbols
            .replace(self.base_symbols.iter().cloned())
            .await;

        let rows = self
            .gateway
            .get_positions()
            .await
            .context("positions fetch failed")?;

        let (positions, active_inst_ids) = build_positions(&rows);
        for inst_id in active_inst_ids {
            self.active_symbols.insert(inst_id).await;
        }

        // full-replace snapshot, empty list included
        self.repository
            .process_positions(&positions, &self.alias)
            .await
            .context("positions emit failed")?;

        info!(account = %self.alias, count = positions.len(), "Synced positions");
        Ok(())
    }
}

/// Build position records from the raw rows.
///
/// Rows with zero quantity are dropped; the rest yield a `Position`
/// with a non-negative size plus their instrument id for the active
/// set.
fn build_positions(rows: &[PositionRow]) -> (Vec<Position>, Vec<String>) {
    let mut positions = Vec::new();
    let mut inst_ids = Vec::new();

    for row in rows {
        if row.positions == 0.0 {
            continue;
        }

        inst_ids.push(row.inst_id.clone());
        positions.push(Position {
            symbol: to_internal_format(&row.inst_id),
            entry_price: row.average_price,
            position_size: row.positions.abs(),
            side: PositionSide::resolve(&row.position_side, row.positions),
            unrealized_profit: row.unrealized_pnl,
            initial_margin: row.initial_margin,
            mark_price: row.mark_price,
        });
    }

    (positions, inst_ids)
}
