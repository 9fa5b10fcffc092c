//! Background task that polls the Soroban RPC and writes decoded FundChain
//! events to the database.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::db;
use crate::errors::Result;
use crate::rpc;

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Poll until `shutdown` is cancelled.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!("Indexer starting — contract: {}", state.config.contract_id);

    let saved = db::load_cursor(&state.pool).await.unwrap_or_else(|e| {
        error!("Failed to load cursor, starting fresh: {e}");
        db::Cursor::default()
    });

    let mut current_ledger = resume_ledger(saved.last_ledger, state.config.start_ledger);
    let mut cursor = saved.last_cursor;

    info!("Resuming from ledger {current_ledger}");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            polled = poll_once(&state, current_ledger, cursor.as_deref()) => match polled {
                Ok((next_ledger, next_cursor)) => {
                    current_ledger = next_ledger;
                    cursor = next_cursor;
                }
                Err(e) => error!("Indexer poll error: {e}"),
            },
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)) => {}
        }
    }

    info!("Indexer stopped at ledger {current_ledger}");
}

/// One poll iteration. Returns `(next_start_ledger, next_cursor)`.
async fn poll_once(
    state: &IndexerState,
    start_ledger: u32,
    cursor: Option<&str>,
) -> Result<(u32, Option<String>)> {
    let config = &state.config;
    let page = rpc::fetch_events(
        &state.client,
        &config.rpc_url,
        &config.contract_id,
        start_ledger,
        cursor,
        config.events_per_page,
    )
    .await?;

    if !page.events.is_empty() {
        let decoded = rpc::decode_events(&page.events, &config.contract_id);
        let inserted = db::insert_events(&state.pool, &decoded).await?;
        info!(
            "Polled {} raw events → {} new records stored",
            page.events.len(),
            inserted
        );
    }

    let next_ledger = next_start_ledger(start_ledger, page.latest_ledger);
    db::save_cursor(&state.pool, next_ledger as i64, page.cursor.as_deref()).await?;

    Ok((next_ledger, page.cursor))
}

/// Ledger to resume from: the persisted cursor if one was saved, else the
/// configured start. Out-of-range values saturate instead of wrapping.
fn resume_ledger(saved_ledger: i64, start_ledger: u32) -> u32 {
    if saved_ledger > 0 {
        u32::try_from(saved_ledger).unwrap_or(u32::MAX)
    } else {
        start_ledger
    }
}

/// The scan start never moves backwards, even if the RPC reports an older
/// latest ledger (e.g. a lagging node behind a load balancer).
fn next_start_ledger(start_ledger: u32, latest_ledger: Option<u64>) -> u32 {
    latest_ledger
        .map(|l| u32::try_from(l).unwrap_or(u32::MAX).max(start_ledger))
        .unwrap_or(start_ledger)
}
