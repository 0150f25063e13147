//! Handlers for the `/rates` resource.
//!
//! Every handler reads a single cache snapshot and never touches the rate
//! source. A maturity that was never loaded yields an empty array.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use euribor_core::maturity::Maturity;
use euribor_core::rate::Series;
use euribor_core::retention::Retention;
use euribor_core::validation::parse_history_year;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/rates/history/{year}/{maturity}
///
/// Samples of one calendar year, oldest first.
pub async fn history(
    State(state): State<AppState>,
    Path((year, maturity)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<Series>>> {
    let year = parse_history_year(&year, Utc::now().date_naive())?;
    let maturity: Maturity = maturity.parse()?;

    let series = state.cache.get(maturity).in_year(year);
    Ok(Json(DataResponse { data: series }))
}

/// GET /api/v1/rates/chart/{maturity}
///
/// The whole series as `[[epoch_millis, value], ...]` for charting.
pub async fn chart(
    State(state): State<AppState>,
    Path(maturity): Path<String>,
) -> AppResult<Json<DataResponse<Vec<(i64, f64)>>>> {
    let maturity: Maturity = maturity.parse()?;
    let points = state.cache.get(maturity).chart_points();
    Ok(Json(DataResponse { data: points }))
}

/// GET /api/v1/rates/window/{retention}/{maturity}
///
/// Samples inside a retention window ending at the latest sample.
pub async fn window(
    State(state): State<AppState>,
    Path((retention, maturity)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<Series>>> {
    let retention: Retention = retention.parse()?;
    let maturity: Maturity = maturity.parse()?;

    let series = state.cache.get(maturity).within(retention);
    Ok(Json(DataResponse { data: series }))
}
