//! FundChain event indexer — entry point.
//!
//! Runs a background task that polls Soroban `getEvents` for FundChain
//! contract events and stores them in SQLite, and serves them to the
//! donor/admin/NGO dashboards over a small Axum REST API.

mod api;
mod config;
mod db;
mod errors;
mod events;
mod indexer;
mod rpc;
mod summary;

use std::sync::Arc;

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use indexer::IndexerState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controls verbosity.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Optional .env file.
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    let pool = db::init_pool(&config.database_url).await?;

    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let shutdown = CancellationToken::new();

    // ─── Background indexer ───────────────────────────────
    let indexer_state = Arc::new(IndexerState {
        pool: pool.clone(),
        config: config.clone(),
        client,
    });
    let indexer_task = tokio::spawn(indexer::run(indexer_state, shutdown.child_token()));

    // ─── REST API ─────────────────────────────────────────
    let app = api::router(Arc::new(api::ApiState { pool }));

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
            signal.cancel();
        })
        .await?;

    shutdown.cancel();
    indexer_task.await?;
    Ok(())
}
