//! BloFin Futures Scraper — Entry Point
//!
//! Initializes configuration, logging, the exchange gateway, and the
//! repository sink, then runs the sync loops until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Load credentials from env (BLOFIN_API_KEY, BLOFIN_API_SECRET,
//!    BLOFIN_PASSPHRASE)
//! 4. Create signed REST client + gateway
//! 5. Create JSONL repository under the configured data dir
//! 6. Supervisor: one-time credential check (fatal on failure)
//! 7. Spawn health server on :9090 (/live + /ready)
//! 8. Spawn all sync loops (fire-and-forget, never joined)
//! 9. Wait for SIGINT → exit (the loops die with the process)

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::watch;
use tracing::info;

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::api::{BlofinAuth, BlofinGateway, RestClient, RestClientConfig};
use adapters::persistence::JsonlRepository;
use ports::repository::Repository;
use usecases::SyncSupervisor;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config = config::loader::load_config("config.toml")
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.scraper.log_level)
                }),
        )
        .json()
        .init();

    info!(
        name = %config.scraper.name,
        version = env!("CARGO_PKG_VERSION"),
        alias = %config.account.alias,
        symbols = config.account.symbols.len(),
        "Starting BloFin futures scraper"
    );

    // ── 3. Load credentials from env vars ───────────────────
    let account = BlofinAuth::account_from_env(&config.account.alias)
        .context("Failed to load BloFin credentials from env")?;

    // ── 4. Create signed REST client + gateway ──────────────
    let rest_config = RestClientConfig {
        base_url: config.api.base_url.clone(),
        timeout: std::time::Duration::from_millis(config.api.timeout_ms),
    };
    let client = RestClient::new(BlofinAuth::new(&account), rest_config)
        .context("Failed to create REST client")?;
    let gateway = Arc::new(BlofinGateway::new(client));

    // ── 5. Create the repository sink ───────────────────────
    let repository = Arc::new(
        JsonlRepository::new(&config.persistence.data_dir)
            .await
            .context("Failed to create repository")?,
    );

    // ── 6. Startup credential check — fatal, never retried ──
    let supervisor = SyncSupervisor::new(
        Arc::clone(&gateway),
        Arc::clone(&repository),
        account.alias.clone(),
        config.account.symbols.clone(),
    );
    supervisor
        .verify_connection()
        .await
        .context("Startup credential check failed")?;

    // ── 7. Spawn health server on :9090 ─────────────────────
    let (health_tx, health_rx) = watch::channel(true);
    let health_repo = Arc::clone(&repository);
    let health_handle = tokio::spawn(serve_health(health_rx, health_repo));

    // ── 8. Spawn all sync loops ─────────────────────────────
    let _handles = supervisor.spawn();

    info!("All sync loops running");

    // ── 9. Wait for SIGINT ──────────────────────────────────
    signal::ctrl_c()
        .await
        .context("Failed to listen for SIGINT")?;
    info!("SIGINT received, shutting down");

    // Mark readiness false so orchestrators stop routing, then exit;
    // the sync tasks are fire-and-forget and die with the process.
    let _ = health_tx.send(false);
    health_handle.abort();

    info!("Shutdown complete");
    Ok(())
}

/// Serve health endpoints on :9090.
///
/// - `/live`  — Liveness probe: 200 if process is running
/// - `/ready` — Readiness probe: 503 during shutdown or when the
///   repository's data directory is unavailable
async fn serve_health(
    health_rx: watch::Receiver<bool>,
    repository: Arc<JsonlRepository>,
) -> Result<()> {
    use axum::{extract::State, http::StatusCode, routing::get, Router};

    #[derive(Clone)]
    struct HealthState {
        rx: watch::Receiver<bool>,
        repository: Arc<JsonlRepository>,
    }

    let state = HealthState {
        rx: health_rx,
        repository,
    };

    let app = Router::new()
        .route("/live", get(|| async { StatusCode::OK }))
        .route(
            "/ready",
            get(|State(state): State<HealthState>| async move {
                if *state.rx.borrow() && state.repository.is_healthy().await {
                    StatusCode::OK
                } else {
                    StatusCode::SERVICE_UNAVAILABLE
                }
            }),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:9090").await?;
    info!("Health server listening on :9090");
    axum::serve(listener, app).await?;
    Ok(())
}
