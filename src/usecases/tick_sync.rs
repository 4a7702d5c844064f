//! Tick Sync Loop - Latest Prices for Active Instruments
//!
//! One instance runs per configured symbol. Each cycle fetches the
//! latest ticker for the union of the shared active-symbol set and
//! this instance's own symbol. Symbol failures are isolated: one
//! instrument's failed fetch is logged at debug and never aborts the
//! rest of the cycle.

use std::sync::Arc;

use anyhow::Result;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::{ActiveSymbolSet, TICK_ERROR_BACKOFF, TICK_SYNC_INTERVAL};
use crate::domain::model::{now_millis, Tick};
use crate::domain::symbol::{to_exchange_format, to_internal_format};
use crate::ports::exchange::ExchangeGateway;
use crate::ports::repository::Repository;

/// Long-running ticker poller for one configured symbol (plus
/// whatever the active set currently holds).
pub struct TickSync<G, R> {
    gateway: Arc<G>,
    repository: Arc<R>,
    alias: String,
    /// This instance's own symbol in exchange format; always polled
    /// even when no position is open.
    exchange_symbol: String,
    active_symbols: ActiveSymbolSet,
}

impl<G: ExchangeGateway, R: Repository> TickSync<G, R> {
    /// Create a tick sync for one internal-format symbol.
    pub fn new(
        gateway: Arc<G>,
        repository: Arc<R>,
        alias: String,
        symbol: &str,
        active_symbols: ActiveSymbolSet,
    ) -> Self {
        Self {
            gateway,
            repository,
            alias,
            exchange_symbol: to_exchange_format(symbol),
            active_symbols,
        }
    }

    /// Run forever: one cycle, then sleep; shorter backoff than the
    /// account loops since ticks are the freshest data we serve.
    pub async fn run(self) {
        loop {
            match self.sync_once().await {
                Ok(()) => sleep(TICK_SYNC_INTERVAL).await,
                Err(e) => {
                    warn!(account = %self.alias, error = %e, "Failed to process ticks");
                    sleep(TICK_ERROR_BACKOFF).await;
                }
            }
        }
    }

    /// Execute one cycle over the current fetch set.
    pub async fn sync_once(&self) -> Result<()> {
        let mut symbols = self.active_symbols.snapshot().await;
        symbols.insert(self.exchange_symbol.clone());

        let mut synced = 0usize;
        for inst_id in &symbols {
            match self.sync_symbol(inst_id).await {
                Ok(()) => synced += 1,
                Err(e) => {
                    debug!(
                        account = %self.alias,
                        symbol = %inst_id,
                        error = %e,
                        "Failed to get ticker"
                    );
                }
            }
        }

        // a cycle where every instrument failed signals an outage
        anyhow::ensure!(
            synced > 0,
            "all {} ticker fetches failed",
            symbols.len()
        );

        info!(account = %self.alias, symbols = synced, "Processed ticks");
        Ok(())
    }

    /// Fetch and emit the latest tick for one instrument.
    async fn sync_symbol(&self, inst_id: &str) -> Result<()> {
        let rows = self.gateway.get_tickers(inst_id).await?;

        // the endpoint returns at most one row per instrument
        if let Some(row) = rows.first() {
            let tick = Tick {
                symbol: to_internal_format(inst_id),
                price: row.last,
                qty: row.last_size,
                timestamp: row.ts.unwrap_or_else(now_millis),
            };
            self.repository.process_tick(&tick, &self.alias).await?;
        }

        Ok(())
    }
}
