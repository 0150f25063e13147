#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use euribor_api::config::ServerConfig;
use euribor_api::router::build_app_router;
use euribor_api::state::AppState;
use euribor_cache::{CacheSnapshot, RateCache};
use euribor_core::maturity::Maturity;
use euribor_core::rate::{Rate, Series};
use euribor_core::types::Date;
use euribor_db::{MemoryThresholdStore, ThresholdStore};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        history_path: PathBuf::from("."),
        refresh_poll_secs: 60,
        database_url: None,
    }
}

/// Build the full application router over the given cache and store,
/// with the same middleware stack production uses.
pub fn build_test_app(cache: Arc<RateCache>, store: Arc<dyn ThresholdStore>) -> Router {
    build_app_router(AppState { cache, store }, &test_config())
}

/// App over an empty cache and an empty in-memory store.
pub fn empty_app() -> Router {
    build_test_app(Arc::new(RateCache::new()), Arc::new(MemoryThresholdStore::new()))
}

pub fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd_opt(y, m, d).unwrap()
}

/// A cache holding the given samples per maturity.
pub fn cache_with(series: Vec<(Maturity, Vec<(Date, f64)>)>) -> Arc<RateCache> {
    let map: HashMap<_, _> = series
        .into_iter()
        .map(|(m, samples)| {
            let rates = samples.into_iter().map(|(d, v)| Rate::new(d, v)).collect();
            (m, Arc::new(Series::from_samples(rates)))
        })
        .collect();
    let cache = Arc::new(RateCache::new());
    cache.replace(CacheSnapshot::new(map, Some(chrono::Utc::now())));
    cache
}

pub async fn send(app: Router, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
