//! Alert monitor.
//!
//! [`MonitorService`] sleeps on the cache refresher's wake signal. Every
//! wake runs one pass: take a single cache snapshot, list all thresholds,
//! evaluate each against its maturity's series and notify the subscribers
//! whose limit was exceeded. A threshold is removed only after its alert
//! was delivered, so an undelivered alert is retried on the next pass.

use std::sync::Arc;

use euribor_cache::{RateCache, RefreshListener};
use euribor_db::{StoreError, ThresholdStore};
use tokio_util::sync::CancellationToken;

use crate::delivery::Notifier;

/// Counters for one evaluation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Pending thresholds that were evaluated.
    pub evaluated: usize,
    /// Thresholds whose trend condition held.
    pub triggered: usize,
    /// Alerts delivered.
    pub delivered: usize,
    /// Alerts whose delivery failed; the threshold stays pending.
    pub failed_deliveries: usize,
    /// Delivered alerts whose threshold could not be removed.
    pub failed_removals: usize,
}

// ---------------------------------------------------------------------------
// MonitorService
// ---------------------------------------------------------------------------

pub struct MonitorService {
    store: Arc<dyn ThresholdStore>,
    cache: Arc<RateCache>,
    notifier: Arc<dyn Notifier>,
}

impl MonitorService {
    pub fn new(
        store: Arc<dyn ThresholdStore>,
        cache: Arc<RateCache>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            cache,
            notifier,
        }
    }

    /// Run one pass per wake-up until `cancel` fires or the refresher is
    /// gone.
    pub async fn run(&self, mut listener: RefreshListener, cancel: CancellationToken) {
        tracing::info!(notifier = self.notifier.name(), "Alert monitor started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Alert monitor stopping");
                    break;
                }
                woke = listener.wait() => {
                    if !woke {
                        tracing::info!("Refresh signal closed, alert monitor stopping");
                        break;
                    }
                    match self.run_pass().await {
                        Ok(report) => tracing::info!(?report, "Alert pass completed"),
                        Err(e) => tracing::error!(error = %e, "Alert pass aborted"),
                    }
                }
            }
        }
    }

    /// Evaluate every pending threshold against one cache snapshot.
    ///
    /// A store failure while listing aborts the pass. Delivery and removal
    /// failures are logged per threshold and never stop the pass.
    pub async fn run_pass(&self) -> Result<PassReport, StoreError> {
        let snapshot = self.cache.snapshot();
        let thresholds = self.store.list(None).await?;
        let mut report = PassReport::default();

        for mut threshold in thresholds {
            if threshold.is_triggered() {
                continue;
            }
            report.evaluated += 1;

            let series = snapshot.get(threshold.maturity());
            if !threshold.evaluate(&series) {
                continue;
            }
            report.triggered += 1;

            let body = threshold.alert_body();
            if let Err(e) = self
                .notifier
                .send(threshold.subscriber(), threshold.alert_title(), &body)
                .await
            {
                tracing::warn!(
                    subscriber = threshold.subscriber(),
                    maturity = %threshold.maturity(),
                    error = %e,
                    "Alert delivery failed, threshold stays pending"
                );
                report.failed_deliveries += 1;
                continue;
            }
            report.delivered += 1;

            if let Err(e) = self.store.remove(&threshold.key).await {
                tracing::error!(
                    subscriber = threshold.subscriber(),
                    maturity = %threshold.maturity(),
                    error = %e,
                    "Failed to remove delivered threshold"
                );
                report.failed_removals += 1;
            }
        }

        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
