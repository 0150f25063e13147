use std::sync::Arc;

use euribor_cache::RateCache;
use euribor_db::ThresholdStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything lives behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Latest rate snapshot, shared with the cache refresher.
    pub cache: Arc<RateCache>,
    /// Threshold persistence, shared with the alert monitor.
    pub store: Arc<dyn ThresholdStore>,
}
