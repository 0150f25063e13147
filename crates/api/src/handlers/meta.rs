//! Root, version and lookup-table handlers.

use axum::Json;
use euribor_core::maturity::Maturity;
use euribor_core::retention::Retention;
use serde::Serialize;

use crate::response::DataResponse;

#[derive(Debug, Serialize)]
pub struct MaturityInfo {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
}

/// GET /
pub async fn index() -> &'static str {
    "Welcome to the Euribor rates service!"
}

/// GET /version
pub async fn version() -> Json<DataResponse<VersionInfo>> {
    Json(DataResponse {
        data: VersionInfo {
            version: env!("CARGO_PKG_VERSION"),
        },
    })
}

/// GET /api/v1/maturities
pub async fn maturities() -> Json<DataResponse<Vec<MaturityInfo>>> {
    let data = Maturity::ALL
        .iter()
        .map(|m| MaturityInfo {
            key: m.as_str(),
            label: m.label(),
        })
        .collect();
    Json(DataResponse { data })
}

/// GET /api/v1/retentions
pub async fn retentions() -> Json<DataResponse<Vec<&'static str>>> {
    let data = Retention::ALL.iter().map(|r| r.as_str()).collect();
    Json(DataResponse { data })
}
