use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::handlers::meta;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` once the cache holds data, `starting` before the first refresh.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Start of the refresh pass that produced the current cache.
    pub cache_refreshed_at: Option<DateTime<Utc>>,
    /// Maturities with at least one cached sample.
    pub cached_maturities: usize,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.cache.snapshot();
    let refreshed_at = snapshot.refreshed_at();

    Json(HealthResponse {
        status: if refreshed_at.is_some() { "ok" } else { "starting" },
        version: env!("CARGO_PKG_VERSION"),
        cache_refreshed_at: refreshed_at,
        cached_maturities: snapshot
            .maturities()
            .into_iter()
            .filter(|m| !snapshot.get(*m).is_empty())
            .count(),
    })
}

/// Root-level routes (not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(meta::index))
        .route("/health", get(health_check))
        .route("/version", get(meta::version))
}
