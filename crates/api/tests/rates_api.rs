//! Integration tests for the `/api/v1/rates` endpoints.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, date, get};
use euribor_core::maturity::Maturity;
use euribor_db::MemoryThresholdStore;

fn app() -> Router {
    let cache = common::cache_with(vec![(
        Maturity::ThreeMonths,
        vec![
            (date(2016, 12, 30), -0.319),
            (date(2017, 1, 2), -0.32),
            (date(2017, 1, 3), -0.321),
            (date(2017, 1, 20), -0.327),
        ],
    )]);
    common::build_test_app(cache, Arc::new(MemoryThresholdStore::new()))
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[tokio::test]
async fn history_returns_samples_of_requested_year() {
    let response = get(app(), "/api/v1/rates/history/2017/3m").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["date"], "2017-01-02");
    assert_eq!(data[0]["value"], -0.32);
    assert_eq!(data[2]["date"], "2017-01-20");
}

#[tokio::test]
async fn history_of_uncached_maturity_is_empty() {
    let json = body_json(get(app(), "/api/v1/rates/history/2017/1w").await).await;
    assert_eq!(json["data"], serde_json::json!([]));
}

#[tokio::test]
async fn history_rejects_out_of_range_year() {
    let response = get(app(), "/api/v1/rates/history/2009/3m").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn history_rejects_non_numeric_year() {
    let response = get(app(), "/api/v1/rates/history/latest/3m").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_maturity_is_rejected() {
    let response = get(app(), "/api/v1/rates/history/2017/5y").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("5y"));
}

// ---------------------------------------------------------------------------
// Chart
// ---------------------------------------------------------------------------

#[tokio::test]
async fn chart_returns_millis_value_pairs() {
    let json = body_json(get(app(), "/api/v1/rates/chart/3m").await).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 4);
    // 2017-01-02T00:00:00Z
    assert_eq!(data[1], serde_json::json!([1_483_315_200_000_i64, -0.32]));
}

#[tokio::test]
async fn chart_of_uncached_maturity_is_empty() {
    let json = body_json(get(app(), "/api/v1/rates/chart/12m").await).await;
    assert_eq!(json["data"], serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// Retention window
// ---------------------------------------------------------------------------

#[tokio::test]
async fn window_is_measured_from_latest_sample() {
    let json = body_json(get(app(), "/api/v1/rates/window/last-month/3m").await).await;
    let data = json["data"].as_array().unwrap();
    // 2016-12-20 onwards: everything.
    assert_eq!(data.len(), 4);

    let json = body_json(get(app(), "/api/v1/rates/window/last-week/3m").await).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["date"], "2017-01-20");
}

#[tokio::test]
async fn window_rejects_unknown_retention() {
    let response = get(app(), "/api/v1/rates/window/forever/3m").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
