//! Persistence Adapter - JSONL-based Repository Sink
//!
//! Implements the Repository port with plain files: per-account
//! snapshot documents for balance, positions, orders, and latest
//! ticks, plus append-only JSONL files for income records.
//! No database dependency — lightweight and crash-recoverable.
//!
//! Layout under the data directory:
//!
//! ```text
//! <data_dir>/<alias>/balance.json
//! <data_dir>/<alias>/positions.json
//! <data_dir>/<alias>/orders.json
//! <data_dir>/<alias>/ticks/<SYMBOL>.json
//! <data_dir>/<alias>/incomes/YYYY-MM-DD.jsonl
//! ```
//!
//! Snapshots are written to a temporary file and then renamed, so a
//! concurrent reader always sees either the previous or the new
//! snapshot, never a partial replace. This is what makes the
//! full-replace contract of `process_positions`/`process_orders`
//! atomic per account.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::domain::model::{Balance, Income, Order, Position, Tick};
use crate::ports::repository::Repository;

/// File-backed repository: atomic JSON snapshots + JSONL income logs.
pub struct JsonlRepository {
    /// Base data directory; one subdirectory per account alias.
    root: PathBuf,
}

impl JsonlRepository {
    /// Create a repository rooted at the given data directory,
    /// creating it if needed.
    pub async fn new(data_dir: &str) -> Result<Self> {
        let root = PathBuf::from(data_dir);
        fs::create_dir_all(&root)
            .await
            .context("Failed to create data directory")?;
        Ok(Self { root })
    }

    fn account_dir(&self, account: &str) -> PathBuf {
        self.root.join(account)
    }

    /// Write a snapshot document atomically (tmp → rename).
    async fn write_snapshot<T: Serialize + ?Sized>(
        &self,
        dir: &Path,
        file_name: &str,
        value: &T,
    ) -> Result<()> {
        fs::create_dir_all(dir)
            .await
            .context("Failed to create account directory")?;

        let json = serde_json::to_string_pretty(value)
            .context("Failed to serialize snapshot")?;

        let final_path = dir.join(file_name);
        let tmp_path = dir.join(format!("{file_name}.tmp"));

        fs::write(&tmp_path, &json)
            .await
            .context("Failed to write tmp snapshot file")?;
        fs::rename(&tmp_path, &final_path)
            .await
            .context("Failed to rename snapshot file")?;

        debug!(path = %final_path.display(), "Snapshot written");
        Ok(())
    }
}

#[async_trait]
impl Repository for JsonlRepository {
    async fn process_balances(&self, balance: &Balance, account: &str) -> Result<()> {
        let dir = self.account_dir(account);
        self.write_snapshot(&dir, "balance.json", balance).await
    }

    async fn process_positions(&self, positions: &[Position], account: &str) -> Result<()> {
        let dir = self.account_dir(account);
        self.write_snapshot(&dir, "positions.json", positions).await
    }

    async fn process_orders(&self, orders: &[Order], account: &str) -> Result<()> {
        let dir = self.account_dir(account);
        self.write_snapshot(&dir, "orders.json", orders).await
    }

    async fn process_incomes(&self, incomes: &[Income], account: &str) -> Result<()> {
        let dir = self.account_dir(account).join("incomes");
        fs::create_dir_all(&dir)
            .await
            .context("Failed to create incomes directory")?;

        let date = Utc::now().format("%Y-%m-%d").to_string();
        let path = dir.join(format!("{date}.jsonl"));

        let mut buf = String::new();
        for income in incomes {
            buf.push_str(
                &serde_json::to_string(income).context("Failed to serialize income")?,
            );
            buf.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .context("Failed to open income log file")?;
        file.write_all(buf.as_bytes())
            .await
            .context("Failed to write income records")?;
        file.flush().await.context("Failed to flush income log")?;

        debug!(count = incomes.len(), path = %path.display(), "Incomes appended");
        Ok(())
    }

    async fn process_tick(&self, tick: &Tick, account: &str) -> Result<()> {
        let dir = self.account_dir(account).join("ticks");
        self.write_snapshot(&dir, &format!("{}.json", tick.symbol), tick)
            .await
    }

    async fn is_healthy(&self) -> bool {
        fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }
}
