//! Soroban RPC client — polls `getEvents` and decodes FundChain events.
//!
//! Network errors, HTTP 429 and soft JSON-RPC errors are retried with
//! exponential back-off (2s doubling up to [`MAX_BACKOFF_SECS`]). Codes
//! -32600 and -32601 mean the request itself is wrong and are returned.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, FundChainEvent};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    /// Topic list, one JSON-encoded ScVal per entry
    pub topic: Vec<String>,
    /// Event data
    pub value: Value,
    pub contract_id: Option<String>,
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    pub ledger_closed_at: Option<String>,
}

/// One page of events returned by [`fetch_events`].
#[derive(Debug)]
pub struct EventsPage {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

/// Doubling delay, capped at [`MAX_BACKOFF_SECS`].
struct Backoff {
    secs: u64,
}

impl Backoff {
    fn new() -> Self {
        Self {
            secs: INITIAL_BACKOFF_SECS,
        }
    }

    async fn wait(&mut self) {
        tokio::time::sleep(Duration::from_secs(self.secs)).await;
        self.secs = (self.secs * 2).min(MAX_BACKOFF_SECS);
    }
}

// ─────────────────────────────────────────────────────────
// Fetching
// ─────────────────────────────────────────────────────────

/// Fetch a page of events for `contract_id`.
///
/// With a `cursor` the RPC resumes pagination; otherwise it scans from
/// `start_ledger` (inclusive).
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<EventsPage> {
    let body = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "getEvents",
        "params": build_params(contract_id, start_ledger, cursor, limit),
    });
    let mut backoff = Backoff::new();

    loop {
        let resp = match client.post(rpc_url).json(&body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("RPC request failed (retrying in {}s): {e}", backoff.secs);
                backoff.wait().await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate-limited by RPC (retrying in {}s)", backoff.secs);
            backoff.wait().await;
            continue;
        }

        let text = resp.text().await?;
        let parsed = parse_response(&text)?;
        if let Some(err) = parsed.error {
            if is_hard_error(err.code) {
                return Err(IndexerError::Rpc {
                    code: err.code,
                    message: err.message,
                });
            }
            warn!(
                "RPC soft error {} (retrying in {}s): {}",
                err.code, backoff.secs, err.message
            );
            backoff.wait().await;
            continue;
        }

        let result = parsed
            .result
            .ok_or_else(|| IndexerError::EventParse("Empty result from getEvents".to_string()))?;

        debug!(
            "Fetched {} events (latest_ledger={:?})",
            result.events.len(),
            result.latest_ledger
        );

        return Ok(EventsPage {
            events: result.events,
            cursor: result.cursor,
            latest_ledger: result.latest_ledger,
        });
    }
}

/// Decode a JSON-RPC envelope. Malformed bodies surface as `IndexerError::Json`.
fn parse_response(text: &str) -> Result<RpcResponse> {
    Ok(serde_json::from_str(text)?)
}

fn is_hard_error(code: i64) -> bool {
    code == -32600 || code == -32601
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        }
    });

    match cursor {
        Some(cur) => params["pagination"]["cursor"] = json!(cur),
        None => params["startLedger"] = json!(start_ledger),
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode raw RPC events into [`FundChainEvent`]s, dropping any without a topic.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<FundChainEvent> {
    raw.iter()
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<FundChainEvent> {
    let kind = EventKind::from_topic(&extract_scalar(raw.topic.first()?));

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    // Only campaign events carry the campaign id as their second topic.
    let campaign_id = if is_campaign_event(kind) {
        raw.topic.get(1).map(|t| extract_scalar(t))
    } else {
        None
    };

    let (actor, amount) = decode_data(&raw.value, kind);

    let event_id = raw.id.clone().unwrap_or_else(|| {
        format!(
            "{ledger}-{}-{}-{}",
            raw.tx_hash.as_deref().unwrap_or("-"),
            kind.as_str(),
            campaign_id.as_deref().unwrap_or("-")
        )
    });

    Some(FundChainEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        campaign_id,
        actor,
        amount,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

fn is_campaign_event(kind: EventKind) -> bool {
    matches!(
        kind,
        EventKind::CampaignCreated
            | EventKind::CampaignVerified
            | EventKind::DonationReceived
            | EventKind::CampaignClosed
            | EventKind::MilestoneCompleted
            | EventKind::FundsWithdrawn
    )
}

/// Pull `(actor, amount)` out of the event data for each kind.
fn decode_data(value: &Value, kind: EventKind) -> (Option<String>, Option<String>) {
    match kind {
        EventKind::CampaignCreated => (
            extract_field(value, &["owner"]),
            extract_field(value, &["target"]),
        ),
        EventKind::CampaignVerified => (extract_field(value, &["admin"]), None),
        EventKind::DonationReceived => (
            extract_field(value, &["donor"]),
            extract_field(value, &["amount"]),
        ),
        EventKind::CampaignClosed => (None, extract_field(value, &["raised"])),
        EventKind::MilestoneCompleted => (
            extract_field(value, &["admin"]),
            extract_field(value, &["amount"]),
        ),
        EventKind::FundsWithdrawn => (
            extract_field(value, &["owner"]),
            extract_field(value, &["amount"]),
        ),
        EventKind::AdminAdded | EventKind::AdminRemoved => {
            (extract_field(value, &["admin"]), None)
        }
        EventKind::ProtocolPaused | EventKind::ProtocolUnpaused => {
            let actor = value
                .as_str()
                .map(String::from)
                .or_else(|| extract_field(value, &["address"]));
            (actor, None)
        }
        EventKind::Unknown => (None, None),
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Unwrap a topic entry that may be `{"type":…,"value":…}` JSON or a bare string.
fn extract_scalar(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        match v.get("value") {
            Some(Value::String(s)) => return s.clone(),
            Some(Value::Number(n)) => return n.to_string(),
            _ => {}
        }
    }
    raw.to_string()
}

/// Parse an RFC 3339 timestamp into Unix seconds.
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
