//! Integration Tests — One Sync Cycle per Loop
//!
//! Exercises each sync loop's cycle against mocked ports. Uses
//! mockall for trait mocking and tokio::test for async tests.

use std::sync::Arc;

use mockall::mock;

use blofin_scraper::domain::model::{Balance, Income, Order, Position, Tick};
use blofin_scraper::ports::exchange::{
    BalanceRow, ExchangeError, OrderHistoryRow, OrderRow, PositionRow, TickerRow,
};
use blofin_scraper::usecases::{
    ActiveSymbolSet, BalanceSync, OrderSync, PositionSync, SyncSupervisor,
    TickSync, TradeSync,
};

// ---- Mock Definitions ----

mock! {
    pub Gateway {}

    #[async_trait::async_trait]
    impl blofin_scraper::ports::exchange::ExchangeGateway for Gateway {
        async fn get_balance(
            &self,
            account_type: &str,
        ) -> Result<Vec<BalanceRow>, ExchangeError>;

        async fn get_positions(&self) -> Result<Vec<PositionRow>, ExchangeError>;

        async fn get_active_orders(&self) -> Result<Vec<OrderRow>, ExchangeError>;

        async fn get_order_history(
            &self,
            limit: u32,
            after: Option<String>,
        ) -> Result<Vec<OrderHistoryRow>, ExchangeError>;

        async fn get_tickers(&self, inst_id: &str) -> Result<Vec<TickerRow>, ExchangeError>;
    }
}

mock! {
    pub Repo {}

    #[async_trait::async_trait]
    impl blofin_scraper::ports::repository::Repository for Repo {
        async fn process_balances(&self, balance: &Balance, account: &str) -> anyhow::Result<()>;
        async fn process_positions(&self, positions: &[Position], account: &str) -> anyhow::Result<()>;
        async fn process_orders(&self, orders: &[Order], account: &str) -> anyhow::Result<()>;
        async fn process_incomes(&self, incomes: &[Income], account: &str) -> anyhow::Result<()>;
        async fn process_tick(&self, tick: &Tick, account: &str) -> anyhow::Result<()>;
        async fn is_healthy(&self) -> bool;
    }
}

fn api_error() -> ExchangeError {
    ExchangeError::Api {
        code: "500".to_string(),
        msg: "upstream down".to_string(),
    }
}

fn balance_row(currency: &str, balance: f64) -> BalanceRow {
    BalanceRow {
        currency: currency.to_string(),
        balance,
        available: balance,
    }
}

fn position_row(inst_id: &str, positions: f64, upnl: f64) -> PositionRow {
    PositionRow {
        inst_id: inst_id.to_string(),
        positions,
        position_side: "net".to_string(),
        average_price: 50_000.0,
        unrealized_pnl: upnl,
        initial_margin: 250.0,
        mark_price: 50_100.0,
    }
}

fn history_row(order_id: &str, state: &str, pnl: f64, fee: f64) -> OrderHistoryRow {
    OrderHistoryRow {
        inst_id: "BTC-USDT".to_string(),
        state: state.to_string(),
        pnl,
        fee,
        update_time: Some(1_700_000_000_000),
        order_id: order_id.to_string(),
    }
}

// ---- Balance Sync ----

#[tokio::test]
async fn balance_cycle_partitions_assets_and_sums_upnl() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_get_balance()
        .withf(|account_type| account_type == "futures")
        .times(1)
        .returning(|_| Ok(vec![balance_row("USDT", 100.0), balance_row("BTC", 0.002)]));
    gateway
        .expect_get_positions()
        .times(1)
        .returning(|| Ok(vec![position_row("BTC-USDT", 0.5, 3.0), position_row("ETH-USDT", 1.0, 2.0)]));

    let mut repo = MockRepo::new();
    repo.expect_process_balances()
        .withf(|balance: &Balance, account: &str| {
            account == "main"
                && balance.total_balance == 100.0
                && balance.total_unrealized_profit == 5.0
                && balance.assets.len() == 1
                && balance.assets[0].asset == "BTC"
                && balance.assets[0].balance == 0.002
                && balance.assets[0].unrealized_profit == 0.0
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let sync = BalanceSync::new(Arc::new(gateway), Arc::new(repo), "main".to_string());
    sync.sync_once().await.unwrap();
}

#[tokio::test]
async fn balance_cycle_survives_failed_upnl_enrichment() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_get_balance()
        .times(1)
        .returning(|_| Ok(vec![balance_row("USDT", 42.0)]));
    gateway
        .expect_get_positions()
        .times(1)
        .returning(|| Err(api_error()));

    let mut repo = MockRepo::new();
    repo.expect_process_balances()
        .withf(|balance: &Balance, _| {
            balance.total_balance == 42.0 && balance.total_unrealized_profit == 0.0
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let sync = BalanceSync::new(Arc::new(gateway), Arc::new(repo), "main".to_string());
    sync.sync_once().await.unwrap();
}

#[tokio::test]
async fn balance_cycle_fails_when_primary_fetch_fails() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_get_balance()
        .times(1)
        .returning(|_| Err(api_error()));

    let mut repo = MockRepo::new();
    repo.expect_process_balances().times(0);

    let sync = BalanceSync::new(Arc::new(gateway), Arc::new(repo), "main".to_string());
    assert!(sync.sync_once().await.is_err());
}

// ---- Position Sync ----

#[tokio::test]
async fn position_cycle_updates_snapshot_and_active_set() {
    let mut gateway = MockGateway::new();
    gateway.expect_get_positions().times(1).returning(|| {
        Ok(vec![
            position_row("ETH-USDT", -2.0, 1.0),
            position_row("SOL-USDT", 0.0, 0.0),
        ])
    });

    let mut repo = MockRepo::new();
    repo.expect_process_positions()
        .withf(|positions: &[Position], account: &str| {
            account == "main"
                && positions.len() == 1
                && positions[0].symbol == "ETHUSDT"
                && positions[0].position_size == 2.0
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let active = ActiveSymbolSet::new();
    // stale entry from a previous cycle must disappear
    active.insert("DOGE-USDT".to_string()).await;

    let sync = PositionSync::new(
        Arc::new(gateway),
        Arc::new(repo),
        "main".to_string(),
        vec!["BTC-USDT".to_string()],
        active.clone(),
    );
    sync.sync_once().await.unwrap();

    let snapshot = active.snapshot().await;
    assert!(snapshot.contains("BTC-USDT"), "base symbol retained");
    assert!(snapshot.contains("ETH-USDT"), "open position tracked");
    assert!(!snapshot.contains("SOL-USDT"), "zero-size position excluded");
    assert!(!snapshot.contains("DOGE-USDT"), "stale entry cleared");
}

#[tokio::test]
async fn position_cycle_emits_empty_snapshot() {
    let mut gateway = MockGateway::new();
    gateway.expect_get_positions().times(1).returning(|| Ok(vec![]));

    let mut repo = MockRepo::new();
    repo.expect_process_positions()
        .withf(|positions: &[Position], _| positions.is_empty())
        .times(1)
        .returning(|_, _| Ok(()));

    let sync = PositionSync::new(
        Arc::new(gateway),
        Arc::new(repo),
        "main".to_string(),
        vec!["BTC-USDT".to_string()],
        ActiveSymbolSet::new(),
    );
    sync.sync_once().await.unwrap();
}

// ---- Order Sync ----

#[tokio::test]
async fn order_cycle_is_idempotent_for_unchanged_response() {
    let rows = || {
        Ok(vec![OrderRow {
            inst_id: "BTC-USDT".to_string(),
            price: 49_500.0,
            size: 0.1,
            side: "buy".to_string(),
            position_side: "net".to_string(),
            order_type: "limit".to_string(),
        }])
    };

    let mut gateway = MockGateway::new();
    gateway.expect_get_active_orders().times(2).returning(rows);

    let mut repo = MockRepo::new();
    repo.expect_process_orders()
        .withf(|orders: &[Order], account: &str| {
            account == "main"
                && orders.len() == 1
                && orders[0].symbol == "BTCUSDT"
                && orders[0].order_type == "LIMIT"
        })
        .times(2)
        .returning(|_, _| Ok(()));

    let sync = OrderSync::new(Arc::new(gateway), Arc::new(repo), "main".to_string());
    sync.sync_once().await.unwrap();
    sync.sync_once().await.unwrap();
}

// ---- Trade Sync ----

#[tokio::test]
async fn trade_cycle_filters_fills_and_advances_cursor() {
    let mut gateway = MockGateway::new();
    let mut seq = mockall::Sequence::new();

    // first page: cursor unset
    gateway
        .expect_get_order_history()
        .withf(|limit, after| *limit == 100 && after.is_none())
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| {
            Ok(vec![
                history_row("10", "filled", 12.5, -0.3),
                history_row("11", "filled", 0.0, -0.2),
                history_row("999", "canceled", 7.0, 0.0),
            ])
        });
    // second page: cursor advanced past the zero-PnL fill
    gateway
        .expect_get_order_history()
        .withf(|_, after| after.as_deref() == Some("11"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(vec![]));

    let mut repo = MockRepo::new();
    repo.expect_process_incomes()
        .withf(|incomes: &[Income], account: &str| {
            account == "main"
                && incomes.len() == 1
                && incomes[0].transaction_id == "10"
                && (incomes[0].income - 12.2).abs() < 1e-12
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let mut sync = TradeSync::new(Arc::new(gateway), Arc::new(repo), "main".to_string());
    sync.sync_once().await.unwrap();
    assert_eq!(sync.cursor(), Some("11"));
    // empty page emits nothing and leaves the cursor in place
    sync.sync_once().await.unwrap();
    assert_eq!(sync.cursor(), Some("11"));
}

#[tokio::test]
async fn trade_cycle_failure_leaves_cursor_unchanged() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_get_order_history()
        .times(1)
        .returning(|_, _| Err(api_error()));

    let mut repo = MockRepo::new();
    repo.expect_process_incomes().times(0);

    let mut sync = TradeSync::new(Arc::new(gateway), Arc::new(repo), "main".to_string());
    assert!(sync.sync_once().await.is_err());
    assert_eq!(sync.cursor(), None);
}

// ---- Tick Sync ----

#[tokio::test]
async fn tick_cycle_isolates_per_symbol_failures() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_get_tickers()
        .withf(|inst_id| inst_id == "ETH-USDT")
        .times(1)
        .returning(|_| Err(api_error()));
    gateway
        .expect_get_tickers()
        .withf(|inst_id| inst_id == "BTC-USDT" || inst_id == "SOL-USDT")
        .times(2)
        .returning(|_| {
            Ok(vec![TickerRow {
                last: 101.5,
                last_size: 0.25,
                ts: Some(1_700_000_000_000),
            }])
        });

    let mut repo = MockRepo::new();
    repo.expect_process_tick()
        .withf(|tick: &Tick, account: &str| {
            account == "main"
                && (tick.symbol == "BTCUSDT" || tick.symbol == "SOLUSDT")
                && tick.price == 101.5
                && tick.timestamp == 1_700_000_000_000
        })
        .times(2)
        .returning(|_, _| Ok(()));

    let active = ActiveSymbolSet::new();
    active.insert("ETH-USDT".to_string()).await;
    active.insert("SOL-USDT".to_string()).await;

    // own symbol is configured in internal format
    let sync = TickSync::new(
        Arc::new(gateway),
        Arc::new(repo),
        "main".to_string(),
        "BTCUSDT",
        active,
    );
    sync.sync_once().await.unwrap();
}

#[tokio::test]
async fn tick_cycle_fails_when_every_symbol_fails() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_get_tickers()
        .times(2)
        .returning(|_| Err(api_error()));

    let mut repo = MockRepo::new();
    repo.expect_process_tick().times(0);

    let active = ActiveSymbolSet::new();
    active.insert("ETH-USDT".to_string()).await;

    let sync = TickSync::new(
        Arc::new(gateway),
        Arc::new(repo),
        "main".to_string(),
        "BTCUSDT",
        active,
    );
    assert!(sync.sync_once().await.is_err());
}

#[tokio::test]
async fn tick_with_missing_exchange_timestamp_uses_local_time() {
    let mut gateway = MockGateway::new();
    gateway.expect_get_tickers().times(1).returning(|_| {
        Ok(vec![TickerRow {
            last: 3000.0,
            last_size: 1.0,
            ts: None,
        }])
    });

    let before = blofin_scraper::domain::model::now_millis();
    let mut repo = MockRepo::new();
    repo.expect_process_tick()
        .withf(move |tick: &Tick, _| tick.timestamp >= before)
        .times(1)
        .returning(|_, _| Ok(()));

    let sync = TickSync::new(
        Arc::new(gateway),
        Arc::new(repo),
        "main".to_string(),
        "ETHUSDT",
        ActiveSymbolSet::new(),
    );
    sync.sync_once().await.unwrap();
}

// ---- Supervisor ----

#[tokio::test]
async fn startup_check_passes_on_valid_credentials() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_get_balance()
        .withf(|account_type| account_type == "futures")
        .times(1)
        .returning(|_| Ok(vec![balance_row("USDT", 1.0)]));

    let supervisor = SyncSupervisor::new(
        Arc::new(gateway),
        Arc::new(MockRepo::new()),
        "main".to_string(),
        vec!["BTCUSDT".to_string()],
    );
    assert!(supervisor.verify_connection().await.is_ok());
}

#[tokio::test]
async fn startup_check_fails_fast_on_auth_rejection() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_get_balance()
        .times(1)
        .returning(|_| Err(ExchangeError::Auth("invalid api key".to_string())));

    let supervisor = SyncSupervisor::new(
        Arc::new(gateway),
        Arc::new(MockRepo::new()),
        "main".to_string(),
        vec!["BTCUSDT".to_string()],
    );
    assert!(supervisor.verify_connection().await.is_err());
}
