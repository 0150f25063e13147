//! In-process [`ThresholdStore`] for development and tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use euribor_core::threshold::{Threshold, ThresholdKey};
use tokio::sync::RwLock;

use super::{decode_entries, list_prefix, StoreError, ThresholdStore};

/// Keeps encoded keys and limits in a map, exactly as the database would.
/// Contents are lost on restart.
#[derive(Default)]
pub struct MemoryThresholdStore {
    entries: RwLock<BTreeMap<String, f64>>,
}

impl MemoryThresholdStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Store a raw key without validation. Lets tests plant entries that
    /// no longer decode.
    pub async fn insert_raw(&self, key: impl Into<String>, limit: f64) {
        self.entries.write().await.insert(key.into(), limit);
    }
}

#[async_trait]
impl ThresholdStore for MemoryThresholdStore {
    async fn add(&self, key: &ThresholdKey, limit: f64) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.encode(), limit);
        Ok(())
    }

    async fn remove(&self, key: &ThresholdKey) -> Result<(), StoreError> {
        self.entries.write().await.remove(&key.encode());
        Ok(())
    }

    async fn get(&self, key: &ThresholdKey) -> Result<Option<f64>, StoreError> {
        Ok(self.entries.read().await.get(&key.encode()).copied())
    }

    async fn list(&self, subscriber: Option<&str>) -> Result<Vec<Threshold>, StoreError> {
        let prefix = list_prefix(subscriber);
        let matching: Vec<(String, f64)> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|(k, _)| k.starts_with(&prefix))
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        Ok(decode_entries(matching, subscriber))
    }
}
