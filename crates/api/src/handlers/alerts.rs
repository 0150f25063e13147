//! Handlers for the `/alerts` resource.
//!
//! A subscriber holds at most one threshold per maturity. Path segments are
//! validated here; nothing invalid reaches the threshold store.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use euribor_core::error::CoreError;
use euribor_core::maturity::Maturity;
use euribor_core::threshold::{Threshold, ThresholdKey};
use euribor_core::validation::{parse_limit, validate_subscriber};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Validate the `{subscriber}/{maturity}/{limit}` triple.
fn parse_threshold(subscriber: &str, maturity: &str, limit: &str) -> AppResult<Threshold> {
    validate_subscriber(subscriber)?;
    let maturity: Maturity = maturity.parse()?;
    let limit = parse_limit(limit)?;
    Ok(Threshold::new(ThresholdKey::new(subscriber, maturity), limit))
}

/// GET /api/v1/alerts/{subscriber}
///
/// All pending thresholds of one subscriber, shortest maturity first.
pub async fn list(
    State(state): State<AppState>,
    Path(subscriber): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Threshold>>>> {
    validate_subscriber(&subscriber)?;

    let mut thresholds = state.store.list(Some(&subscriber)).await?;
    thresholds.sort_by_key(|t| t.maturity());
    Ok(Json(DataResponse { data: thresholds }))
}

/// GET /api/v1/alerts/{subscriber}/{maturity}
pub async fn get_one(
    State(state): State<AppState>,
    Path((subscriber, maturity)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<Threshold>>> {
    validate_subscriber(&subscriber)?;
    let maturity: Maturity = maturity.parse()?;
    let key = ThresholdKey::new(subscriber, maturity);

    let limit = state
        .store
        .get(&key)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "Threshold",
            key: key.encode(),
        })?;
    Ok(Json(DataResponse {
        data: Threshold::new(key, limit),
    }))
}

/// PUT /api/v1/alerts/{subscriber}/{maturity}/{limit}
///
/// Add a threshold, replacing any previous limit for the same maturity.
pub async fn upsert(
    State(state): State<AppState>,
    Path((subscriber, maturity, limit)): Path<(String, String, String)>,
) -> AppResult<Json<DataResponse<Threshold>>> {
    let threshold = parse_threshold(&subscriber, &maturity, &limit)?;
    state.store.add(&threshold.key, threshold.limit).await?;

    tracing::info!(
        subscriber = threshold.subscriber(),
        maturity = %threshold.maturity(),
        limit = threshold.limit,
        "Threshold stored"
    );
    Ok(Json(DataResponse { data: threshold }))
}

/// DELETE /api/v1/alerts/{subscriber}/{maturity}/{limit}
///
/// Remove the subscriber's threshold for the maturity. Succeeds whether or
/// not one existed.
pub async fn remove(
    State(state): State<AppState>,
    Path((subscriber, maturity, limit)): Path<(String, String, String)>,
) -> AppResult<StatusCode> {
    let threshold = parse_threshold(&subscriber, &maturity, &limit)?;
    state.store.remove(&threshold.key).await?;

    tracing::info!(
        subscriber = threshold.subscriber(),
        maturity = %threshold.maturity(),
        "Threshold removed"
    );
    Ok(StatusCode::NO_CONTENT)
}
