//! Route definitions for the `/rates` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::rates;
use crate::state::AppState;

/// Routes mounted at `/rates`.
///
/// ```text
/// GET /history/{year}/{maturity}        -> history
/// GET /chart/{maturity}                 -> chart
/// GET /window/{retention}/{maturity}    -> window
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/history/{year}/{maturity}", get(rates::history))
        .route("/chart/{maturity}", get(rates::chart))
        .route("/window/{retention}/{maturity}", get(rates::window))
}
