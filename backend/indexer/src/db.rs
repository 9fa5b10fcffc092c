//! Database layer — migrations, queries, and cursor management.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::Result;
use crate::events::{EventKind, EventRecord, FundChainEvent};

const EVENT_COLUMNS: &str = "id, event_id, event_type, campaign_id, actor, amount, ledger, \
                             timestamp, contract_id, tx_hash, created_at";

/// Open (creating if needed) the SQLite database and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    let options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied successfully");
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Cursor helpers
// ─────────────────────────────────────────────────────────

/// Saved polling position: the last ledger reached and the RPC paging cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    pub last_ledger: i64,
    pub last_cursor: Option<String>,
}

/// Read the persisted cursor; a fresh database yields the default.
pub async fn load_cursor(pool: &SqlitePool) -> Result<Cursor> {
    let row: Option<(i64, Option<String>)> =
        sqlx::query_as("SELECT last_ledger, last_cursor FROM indexer_cursor WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(row
        .map(|(last_ledger, last_cursor)| Cursor {
            last_ledger,
            last_cursor,
        })
        .unwrap_or_default())
}

pub async fn save_cursor(pool: &SqlitePool, last_ledger: i64, last_cursor: Option<&str>) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO indexer_cursor (id, last_ledger, last_cursor) VALUES (1, ?1, ?2)
        ON CONFLICT(id) DO UPDATE SET last_ledger = excluded.last_ledger,
                                      last_cursor = excluded.last_cursor
        "#,
    )
    .bind(last_ledger)
    .bind(last_cursor)
    .execute(pool)
    .await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Event writes
// ─────────────────────────────────────────────────────────

/// Persist a batch of decoded events in one transaction.
///
/// Events whose `event_id` is already stored are skipped, so replaying a
/// page after a restart is harmless. Returns the number of new rows.
pub async fn insert_events(pool: &SqlitePool, events: &[FundChainEvent]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;
    for ev in events {
        let rows_affected = sqlx::query(
            r#"
            INSERT OR IGNORE INTO events
                (event_id, event_type, campaign_id, actor, amount, ledger, timestamp,
                 contract_id, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&ev.event_id)
        .bind(&ev.event_type)
        .bind(&ev.campaign_id)
        .bind(&ev.actor)
        .bind(&ev.amount)
        .bind(ev.ledger)
        .bind(ev.timestamp)
        .bind(&ev.contract_id)
        .bind(&ev.tx_hash)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        count += rows_affected as usize;
    }
    tx.commit().await?;
    Ok(count)
}

// ─────────────────────────────────────────────────────────
// Event reads
// ─────────────────────────────────────────────────────────

/// All events for one campaign, in ledger order.
pub async fn get_events_for_campaign(pool: &SqlitePool, campaign_id: &str) -> Result<Vec<EventRecord>> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE campaign_id = ?1 ORDER BY ledger ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .bind(campaign_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// All events, in ledger order.
pub async fn get_all_events(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY ledger ASC, id ASC");
    let rows = sqlx::query_as::<_, EventRecord>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Every donation made by `donor`, across campaigns, in ledger order.
pub async fn get_donations_by_donor(pool: &SqlitePool, donor: &str) -> Result<Vec<EventRecord>> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE actor = ?1 AND event_type = ?2 \
         ORDER BY ledger ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .bind(donor)
        .bind(EventKind::DonationReceived.as_str())
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_pool() -> SqlitePool {
        // One connection: every `:memory:` connection is its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    fn event(event_id: &str, kind: EventKind, campaign: &str, actor: &str, amount: &str, ledger: i64) -> FundChainEvent {
        FundChainEvent {
            event_id: event_id.to_string(),
            event_type: kind.as_str().to_string(),
            campaign_id: Some(campaign.to_string()),
            actor: Some(actor.to_string()),
            amount: Some(amount.to_string()),
            ledger,
            timestamp: 1_700_000_000 + ledger,
            contract_id: "CFUND".to_string(),
            tx_hash: Some(format!("tx-{event_id}")),
        }
    }

    #[tokio::test]
    async fn cursor_defaults_then_persists() {
        let pool = memory_pool().await;
        assert_eq!(load_cursor(&pool).await.unwrap(), Cursor::default());

        save_cursor(&pool, 4_200, Some("page-2")).await.unwrap();
        let cursor = load_cursor(&pool).await.unwrap();
        assert_eq!(cursor.last_ledger, 4_200);
        assert_eq!(cursor.last_cursor.as_deref(), Some("page-2"));

        save_cursor(&pool, 4_300, None).await.unwrap();
        assert_eq!(load_cursor(&pool).await.unwrap().last_cursor, None);
    }

    #[tokio::test]
    async fn insert_is_idempotent() {
        let pool = memory_pool().await;
        let batch = vec![
            event("e1", EventKind::CampaignCreated, "0", "GOWNER", "1000", 10),
            event("e2", EventKind::DonationReceived, "0", "GDONOR", "250", 11),
        ];

        assert_eq!(insert_events(&pool, &batch).await.unwrap(), 2);
        assert_eq!(insert_events(&pool, &batch).await.unwrap(), 0);
        assert_eq!(get_all_events(&pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn queries_filter_by_campaign_and_donor() {
        let pool = memory_pool().await;
        let batch = vec![
            event("e1", EventKind::DonationReceived, "0", "GALICE", "100", 10),
            event("e2", EventKind::DonationReceived, "1", "GALICE", "50", 12),
            event("e3", EventKind::DonationReceived, "0", "GBOB", "70", 11),
            event("e4", EventKind::FundsWithdrawn, "0", "GALICE", "30", 13),
        ];
        insert_events(&pool, &batch).await.unwrap();

        let campaign0 = get_events_for_campaign(&pool, "0").await.unwrap();
        let ledgers: Vec<i64> = campaign0.iter().map(|e| e.ledger).collect();
        assert_eq!(ledgers, vec![10, 11, 13]);

        let alice = get_donations_by_donor(&pool, "GALICE").await.unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|e| e.kind() == EventKind::DonationReceived));
        assert_eq!(alice[1].amount_i128(), Some(50));
    }
}
