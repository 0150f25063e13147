//! The shared rate cache.
//!
//! Readers clone an `Arc` to the current [`CacheSnapshot`] and work on that;
//! a refresh builds a complete new snapshot off to the side and swaps the
//! pointer. The lock is only held for the clone or the swap, never across
//! I/O, so a reader sees one whole refresh pass or the previous one.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use euribor_core::maturity::Maturity;
use euribor_core::rate::Series;
use euribor_core::types::Timestamp;

/// One complete, immutable view of every cached series.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    series: HashMap<Maturity, Arc<Series>>,
    refreshed_at: Option<Timestamp>,
}

impl CacheSnapshot {
    pub fn new(series: HashMap<Maturity, Arc<Series>>, refreshed_at: Option<Timestamp>) -> Self {
        Self {
            series,
            refreshed_at,
        }
    }

    /// The series for `maturity`, or an empty one if it was never loaded.
    pub fn get(&self, maturity: Maturity) -> Arc<Series> {
        self.series
            .get(&maturity)
            .cloned()
            .unwrap_or_else(|| Arc::new(Series::empty()))
    }

    /// When the pass that produced this snapshot started. `None` for the
    /// initial empty cache.
    pub fn refreshed_at(&self) -> Option<Timestamp> {
        self.refreshed_at
    }

    /// Maturities holding data, shortest first.
    pub fn maturities(&self) -> Vec<Maturity> {
        let mut keys: Vec<_> = self.series.keys().copied().collect();
        keys.sort();
        keys
    }

    /// Copy of the underlying map, used as the starting point of the next
    /// refresh pass so unreadable maturities keep their previous value.
    pub(crate) fn entries(&self) -> HashMap<Maturity, Arc<Series>> {
        self.series.clone()
    }
}

/// Holds the latest [`CacheSnapshot`]. Share via `Arc<RateCache>`.
#[derive(Debug, Default)]
pub struct RateCache {
    current: RwLock<Arc<CacheSnapshot>>,
}

impl RateCache {
    /// An empty cache; every `get` returns an empty series until the first
    /// refresh lands.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot. Hold on to it to read several maturities from
    /// the same refresh pass.
    pub fn snapshot(&self) -> Arc<CacheSnapshot> {
        // A poisoned lock still holds a complete snapshot pointer.
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Last known good series for `maturity`. Never blocks on I/O.
    pub fn get(&self, maturity: Maturity) -> Arc<Series> {
        self.snapshot().get(maturity)
    }

    /// Publish `next`, replacing the current snapshot wholesale.
    pub fn replace(&self, next: CacheSnapshot) {
        let next = Arc::new(next);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next;
    }
}
