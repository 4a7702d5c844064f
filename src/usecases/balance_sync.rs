//! Account Balance Sync Loop
//!
//! Polls the futures balance endpoint, partitions the asset rows into
//! the USDT total and the non-quote holdings, enriches the snapshot
//! with the unrealized PnL summed from a secondary positions fetch,
//! and emits one `Balance` per cycle.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::time::sleep;
use tracing::{debug, error, info};

use super::{ACCOUNT_TYPE_FUTURES, BALANCE_SYNC_INTERVAL, ERROR_BACKOFF};
use crate::domain::model::{AssetBalance, Balance, QUOTE_ASSET};
use crate::ports::exchange::{BalanceRow, ExchangeGateway};
use crate::ports::repository::Repository;

/// Long-running balance synchronizer for one account.
pub struct BalanceSync<G, R> {
    gateway: Arc<G>,
    repository: Arc<R>,
    alias: String,
}

impl<G: ExchangeGateway, R: Repository> BalanceSync<G, R> {
    /// Create a balance sync for the given account alias.
    pub fn new(gateway: Arc<G>, repository: Arc<R>, alias: String) -> Self {
        Self {
            gateway,
            repository,
            alias,
        }
    }

    /// Run forever: one cycle, then sleep; back off longer on failure.
    pub async fn run(self) {
        loop {
            match self.sync_once().await {
                Ok(()) => sleep(BALANCE_SYNC_INTERVAL).await,
                Err(e) => {
                    error!(account = %self.alias, error = %e, "Failed to process balance");
                    sleep(ERROR_BACKOFF).await;
                }
            }
        }
    }

    /// Execute one fetch-transform-emit cycle.
    pub async fn sync_once(&self) -> Result<()> {
        let rows = self
            .gateway
            .get_balance(ACCOUNT_TYPE_FUTURES)
            .await
            .context("balance fetch failed")?;

        let total_upnl = self.fetch_unrealized_pnl().await;
        let balance = build_balance(&rows, total_upnl);

        self.repository
            .process_balances(&balance, &self.alias)
            .await
            .context("balance emit failed")?;

        info!(
            account = %self.alias,
            total = balance.total_balance,
            upnl = balance.total_unrealized_profit,
            "Synced balance"
        );
        Ok(())
    }

    /// Optional enrichment: sum unrealized PnL across all positions.
    ///
    /// Best-effort — a failed positions fetch must not fail the
    /// balance cycle, so the fallback is an explicit 0.0. A consumer
    /// cannot tell that fallback apart from a genuine zero; see
    /// `Balance::total_unrealized_profit`.
    async fn fetch_unrealized_pnl(&self) -> f64 {
        match self.gateway.get_positions().await {
            Ok(rows) => rows.iter().map(|row| row.unrealized_pnl).sum(),
            Err(e) => {
                debug!(account = %self.alias, error = %e, "Unrealized PnL fetch failed, using 0");
                0.0
            }
        }
    }
}

/// Partition balance rows: the quote-currency row becomes the total,
/// everything else becomes a non-quote asset entry with zero per-asset
/// PnL (BloFin does not attribute PnL per asset).
fn build_balance(rows: &[BalanceRow], total_unrealized_profit: f64) -> Balance {
    let mut total_balance = 0.0;
    let mut assets = Vec::new();

    for row in rows {
        if row.currency == QUOTE_ASSET {
            total_balance = row.balance;
        } else {
            assets.push(AssetBalance {
                asset: row.currency.clone(),
                balance: row.balance,
                unrealized_profit: 0.0,
            });
        }
    }

    Balance {
        total_balance,
        total_unrealized_profit,
        assets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(currency: &str, balance: f64) -> BalanceRow {
        BalanceRow {
            currency: currency.to_string(),
            balance,
            available: balance,
        }
    }

    #[test]
    fn test_quote_row_becomes_total() {
        let balance = build_balance(&[row("USDT", 100.0), row("BTC", 0.002)], 5.0);
        assert_eq!(balance.total_balance, 100.0);
        assert_eq!(balance.total_unrealized_profit, 5.0);
        assert_eq!(balance.assets.len(), 1);
        assert_eq!(balance.assets[0].asset, "BTC");
        assert_eq!(balance.assets[0].balance, 0.002);
        assert_eq!(balance.assets[0].unrealized_profit, 0.0);
    }

    #[test]
    fn test_no_quote_row_leaves_total_zero() {
        let balance = build_balance(&[row("ETH", 1.5)], 0.0);
        assert_eq!(balance.total_balance, 0.0);
        assert_eq!(balance.assets.len(), 1);
    }

    #[test]
    fn test_empty_rows() {
        let balance = build_balance(&[], 0.0);
        assert_eq!(balance.total_balance, 0.0);
        assert!(balance.assets.is_empty());
    }
}
