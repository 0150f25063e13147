//! When the refresher looks for changes.
//!
//! [`CacheService`](crate::CacheService) only asks a trigger to wait; the
//! staleness check that follows is the same whatever woke it. A file-watch
//! trigger can replace [`IntervalTrigger`] without touching the service.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Interval, MissedTickBehavior};

/// Default period between staleness checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

#[async_trait]
pub trait RefreshTrigger: Send {
    /// Resolve when the source should be checked again.
    async fn tick(&mut self);
}

/// Fires on a fixed period, the first time immediately.
pub struct IntervalTrigger {
    interval: Interval,
}

impl IntervalTrigger {
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        // A slow refresh pass should not cause a burst of catch-up ticks.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

impl Default for IntervalTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

#[async_trait]
impl RefreshTrigger for IntervalTrigger {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}
