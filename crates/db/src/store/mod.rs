//! The [`ThresholdStore`] contract.
//!
//! Each operation is its own unit of atomicity; there are no cross-call
//! transactions. Concurrent removal of the same key by a subscriber and by
//! the alert monitor is resolved by [`ThresholdStore::remove`] being
//! idempotent.

use async_trait::async_trait;
use euribor_core::threshold::{Threshold, ThresholdKey, KEY_DELIMITER, KEY_PREFIX};

pub mod memory;
pub mod pg;

/// Error type for threshold persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not be reached or rejected the operation.
    #[error("Threshold store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

/// Durable key-value store of pending thresholds.
#[async_trait]
pub trait ThresholdStore: Send + Sync {
    /// Store `limit` under `key`, replacing any previous limit.
    async fn add(&self, key: &ThresholdKey, limit: f64) -> Result<(), StoreError>;

    /// Remove the threshold under `key`. Removing an absent key is `Ok`.
    async fn remove(&self, key: &ThresholdKey) -> Result<(), StoreError>;

    /// The limit stored under `key`, if any.
    async fn get(&self, key: &ThresholdKey) -> Result<Option<f64>, StoreError>;

    /// All thresholds, or only those of `subscriber`.
    ///
    /// Entries whose key does not decode are logged and skipped.
    async fn list(&self, subscriber: Option<&str>) -> Result<Vec<Threshold>, StoreError>;
}

/// Key prefix selecting every threshold of `subscriber`, or every
/// threshold at all.
pub(crate) fn list_prefix(subscriber: Option<&str>) -> String {
    match subscriber {
        Some(s) => format!("{KEY_PREFIX}{s}{KEY_DELIMITER}"),
        None => KEY_PREFIX.to_string(),
    }
}

/// Decode `(key, limit)` pairs, dropping (and logging) undecodable keys and
/// anything that does not belong to `subscriber`.
pub(crate) fn decode_entries<I>(entries: I, subscriber: Option<&str>) -> Vec<Threshold>
where
    I: IntoIterator<Item = (String, f64)>,
{
    entries
        .into_iter()
        .filter_map(|(key, limit)| match ThresholdKey::decode(&key) {
            Ok(decoded) => Some(Threshold::new(decoded, limit)),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Skipping undecodable threshold entry");
                None
            }
        })
        .filter(|th| subscriber.map_or(true, |s| th.subscriber() == s))
        .collect()
}
