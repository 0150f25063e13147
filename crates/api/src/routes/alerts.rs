//! Route definitions for the `/alerts` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::alerts;
use crate::state::AppState;

/// Routes mounted at `/alerts`.
///
/// ```text
/// GET    /{subscriber}                          -> list
/// GET    /{subscriber}/{maturity}               -> get_one
/// PUT    /{subscriber}/{maturity}/{limit}       -> upsert
/// DELETE /{subscriber}/{maturity}/{limit}       -> remove
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{subscriber}", get(alerts::list))
        .route("/{subscriber}/{maturity}", get(alerts::get_one))
        .route(
            "/{subscriber}/{maturity}/{limit}",
            put(alerts::upsert).delete(alerts::remove),
        )
}
