//! Sync Supervisor - Startup Validation and Loop Launch
//!
//! Owns the account, the configured symbol list, and the two port
//! handles. Verifies credentials with one synchronous balance fetch,
//! then launches every sync loop as an independent tokio task. Tasks
//! are fire-and-forget: they run for the process lifetime, are never
//! joined, and carry their own retry policy.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::info;

use super::{
    ActiveSymbolSet, BalanceSync, OrderSync, PositionSync, TickSync,
    TradeSync, ACCOUNT_TYPE_FUTURES,
};
use crate::domain::symbol::to_exchange_format;
use crate::ports::exchange::ExchangeGateway;
use crate::ports::repository::Repository;

/// Supervisor for one account's sync loops.
pub struct SyncSupervisor<G, R> {
    gateway: Arc<G>,
    repository: Arc<R>,
    alias: String,
    /// Configured symbols in internal format (`BTCUSDT`).
    symbols: Vec<String>,
    active_symbols: ActiveSymbolSet,
}

impl<G: ExchangeGateway, R: Repository> SyncSupervisor<G, R> {
    /// Create a supervisor for the given account alias and symbols.
    pub fn new(
        gateway: Arc<G>,
        repository: Arc<R>,
        alias: String,
        symbols: Vec<String>,
    ) -> Self {
        Self {
            gateway,
            repository,
            alias,
            symbols,
            active_symbols: ActiveSymbolSet::new(),
        }
    }

    /// One-time startup credential check.
    ///
    /// Performs a single balance fetch. Any failure — auth rejection,
    /// malformed payload, transport — is fatal and returned to the
    /// caller; credential problems are never retried.
    pub async fn verify_connection(&self) -> Result<()> {
        let rows = self
            .gateway
            .get_balance(ACCOUNT_TYPE_FUTURES)
            .await
            .with_context(|| format!("{}: REST login failed", self.alias))?;

        info!(account = %self.alias, assets = rows.len(), "REST login successful");
        Ok(())
    }

    /// Launch all sync loops and return their handles.
    ///
    /// One task per symbol for tick sync plus one each for balance,
    /// positions, trades, and orders. The supervisor does not observe
    /// liveness after launch; each loop is internally durable.
    pub fn spawn(&self) -> Vec<JoinHandle<()>> {
        info!(account = %self.alias, symbols = self.symbols.len(), "Starting sync loops");

        let mut handles = Vec::with_capacity(self.symbols.len() + 4);

        for symbol in &self.symbols {
            let tick_sync = TickSync::new(
                Arc::clone(&self.gateway),
                Arc::clone(&self.repository),
                self.alias.clone(),
                symbol,
                self.active_symbols.clone(),
            );
            handles.push(tokio::spawn(tick_sync.run()));
        }

        let balance_sync = BalanceSync::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.repository),
            self.alias.clone(),
        );
        handles.push(tokio::spawn(balance_sync.run()));

        let base_symbols = self
            .symbols
            .iter()
            .map(|s| to_exchange_format(s))
            .collect();
        let position_sync = PositionSync::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.repository),
            self.alias.clone(),
            base_symbols,
            self.active_symbols.clone(),
        );
        handles.push(tokio::spawn(position_sync.run()));

        let trade_sync = TradeSync::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.repository),
            self.alias.clone(),
        );
        handles.push(tokio::spawn(trade_sync.run()));

        let order_sync = OrderSync::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.repository),
            self.alias.clone(),
        );
        handles.push(tokio::spawn(order_sync.run()));

        info!(account = %self.alias, tasks = handles.len(), "Sync loops spawned");
        handles
    }

    /// Shared active-symbol set (exposed for tests).
    pub fn active_symbols(&self) -> &ActiveSymbolSet {
        &self.active_symbols
    }
}
