//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::db;
use crate::errors::IndexerError;
use crate::events::EventRecord;
use crate::summary;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

/// Build the API router.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(get_all_events))
        .route("/campaigns/:id/events", get(get_campaign_events))
        .route("/campaigns/:id/summary", get(get_campaign_summary))
        .route("/donors/:address/donations", get(get_donor_donations))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CampaignEventsResponse {
    pub campaign_id: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct DonorDonationsResponse {
    pub donor: String,
    pub count: usize,
    pub donations: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for IndexerError {
    fn into_response(self) -> Response {
        let status = match &self {
            IndexerError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("API request failed: {self}");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, IndexerError>;

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /events`
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> ApiResult<AllEventsResponse> {
    let events = db::get_all_events(&state.pool).await?;
    Ok(Json(AllEventsResponse {
        count: events.len(),
        events,
    }))
}

/// `GET /campaigns/:id/events`
pub async fn get_campaign_events(
    State(state): State<Arc<ApiState>>,
    Path(campaign_id): Path<String>,
) -> ApiResult<CampaignEventsResponse> {
    let events = db::get_events_for_campaign(&state.pool, &campaign_id).await?;
    Ok(Json(CampaignEventsResponse {
        campaign_id,
        count: events.len(),
        events,
    }))
}

/// `GET /campaigns/:id/summary`
///
/// Raised/withdrawn totals, donor count and status rebuilt from events.
pub async fn get_campaign_summary(
    State(state): State<Arc<ApiState>>,
    Path(campaign_id): Path<String>,
) -> ApiResult<summary::CampaignSummary> {
    let events = db::get_events_for_campaign(&state.pool, &campaign_id).await?;
    summary::summarize(&campaign_id, &events)
        .map(Json)
        .ok_or_else(|| IndexerError::NotFound(format!("campaign {campaign_id}")))
}

/// `GET /donors/:address/donations`
pub async fn get_donor_donations(
    State(state): State<Arc<ApiState>>,
    Path(donor): Path<String>,
) -> ApiResult<DonorDonationsResponse> {
    let donations = db::get_donations_by_donor(&state.pool, &donor).await?;
    Ok(Json(DonorDonationsResponse {
        donor,
        count: donations.len(),
        donations,
    }))
}
