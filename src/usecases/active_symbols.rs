//! Active Symbol Set - Cross-loop Shared State
//!
//! The one piece of state shared between loops: the set of exchange
//! instrument ids with a currently open position. `PositionSync`
//! rewrites it every cycle; every `TickSync` instance reads it to
//! decide which tickers to poll. Readers may observe a set that is at
//! most one position cycle stale, which is acceptable — ticks lag
//! position changes, they never block on them.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;

/// Cloneable handle to the shared set of active instrument ids
/// (exchange format, e.g. `BTC-USDT`).
#[derive(Clone, Default)]
pub struct ActiveSymbolSet {
    inner: Arc<RwLock<HashSet<String>>>,
}

impl ActiveSymbolSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole set with the given symbols.
    pub async fn replace<I>(&self, symbols: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut guard = self.inner.write().await;
        guard.clear();
        guard.extend(symbols);
    }

    /// Add one instrument id.
    pub async fn insert(&self, inst_id: String) {
        self.inner.write().await.insert(inst_id);
    }

    /// Clone the current contents.
    pub async fn snapshot(&self) -> HashSet<String> {
        self.inner.read().await.clone()
    }
}
