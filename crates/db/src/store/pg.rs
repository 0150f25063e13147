//! PostgreSQL-backed [`ThresholdStore`].

use async_trait::async_trait;
use euribor_core::threshold::{Threshold, ThresholdKey};

use super::{decode_entries, list_prefix, StoreError, ThresholdStore};
use crate::repositories::ThresholdRepo;
use crate::DbPool;

/// Stores thresholds in the `thresholds` table.
#[derive(Clone)]
pub struct PgThresholdStore {
    pool: DbPool,
}

impl PgThresholdStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ThresholdStore for PgThresholdStore {
    async fn add(&self, key: &ThresholdKey, limit: f64) -> Result<(), StoreError> {
        ThresholdRepo::upsert(&self.pool, &key.encode(), limit).await?;
        Ok(())
    }

    async fn remove(&self, key: &ThresholdKey) -> Result<(), StoreError> {
        let existed = ThresholdRepo::delete(&self.pool, &key.encode()).await?;
        if !existed {
            tracing::debug!(key = %key.encode(), "Threshold already absent");
        }
        Ok(())
    }

    async fn get(&self, key: &ThresholdKey) -> Result<Option<f64>, StoreError> {
        Ok(ThresholdRepo::find_limit(&self.pool, &key.encode()).await?)
    }

    async fn list(&self, subscriber: Option<&str>) -> Result<Vec<Threshold>, StoreError> {
        let rows = ThresholdRepo::list_with_prefix(&self.pool, &list_prefix(subscriber)).await?;
        Ok(decode_entries(
            rows.into_iter().map(|r| (r.key, r.limit_value)),
            subscriber,
        ))
    }
}
