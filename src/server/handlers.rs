use crate::core::PricesResponse;
use crate::server::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

pub const PRICE_SOURCE_HEADER: &str = "x-price-source";

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: i64,
}

/// `GET /api/prices`. Always 200; upstream failures only change the
/// `x-price-source` header.
#[instrument(skip(state))]
pub async fn get_prices(State(state): State<AppState>) -> impl IntoResponse {
    let report = state.prices.current_prices().await;
    let origin = report.origin.as_str();
    let body: PricesResponse = report.into_body();

    (
        [
            ("cache-control", "no-store"),
            (PRICE_SOURCE_HEADER, origin),
        ],
        Json(body),
    )
}

/// `GET /health`. Never touches the upstream.
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.started_at);

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: state.started_at,
        uptime_seconds: uptime.num_seconds().max(0),
    })
}
