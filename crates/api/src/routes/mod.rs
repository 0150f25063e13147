pub mod alerts;
pub mod health;
pub mod rates;

use axum::routing::get;
use axum::Router;

use crate::handlers::meta;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /maturities                                     supported maturity keys (GET)
/// /retentions                                     supported retention slugs (GET)
///
/// /rates/history/{year}/{maturity}                samples of one year (GET)
/// /rates/chart/{maturity}                         chart points (GET)
/// /rates/window/{retention}/{maturity}            samples in a window (GET)
///
/// /alerts/{subscriber}                            list thresholds (GET)
/// /alerts/{subscriber}/{maturity}                 one threshold (GET)
/// /alerts/{subscriber}/{maturity}/{limit}         add, remove (PUT, DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/maturities", get(meta::maturities))
        .route("/retentions", get(meta::retentions))
        .nest("/rates", rates::router())
        .nest("/alerts", alerts::router())
}
