//! Row type for the `thresholds` table.

use sqlx::FromRow;

/// A raw `thresholds` row. The key is decoded by the store so that one
/// corrupt row does not poison a whole listing.
#[derive(Debug, Clone, FromRow)]
pub struct ThresholdRow {
    pub key: String,
    pub limit_value: f64,
}
