//! Background workers.
//!
//! The cache refresher and the alert monitor run as two spawned tasks
//! joined by a single-slot refresh signal. Both accept a shared
//! [`CancellationToken`] for graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use euribor_cache::{refresh_signal, CacheService, IntervalTrigger, RateCache, RatesSource};
use euribor_db::ThresholdStore;
use euribor_events::{MonitorService, Notifier};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// How long shutdown waits for each worker to finish.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Handles to the running workers.
pub struct Workers {
    cancel: CancellationToken,
    refresher: JoinHandle<()>,
    monitor: JoinHandle<()>,
}

/// Spawn the cache refresher and the alert monitor.
pub fn start(
    source: Arc<dyn RatesSource>,
    cache: Arc<RateCache>,
    store: Arc<dyn ThresholdStore>,
    notifier: Arc<dyn Notifier>,
    poll_interval: Duration,
) -> Workers {
    let cancel = CancellationToken::new();
    let (signal, listener) = refresh_signal();

    let service = CacheService::new(source, Arc::clone(&cache), signal);
    let refresher = tokio::spawn(
        service.run(IntervalTrigger::new(poll_interval), cancel.clone()),
    );

    let monitor_service = MonitorService::new(store, cache, notifier);
    let monitor_cancel = cancel.clone();
    let monitor = tokio::spawn(async move {
        monitor_service.run(listener, monitor_cancel).await;
    });

    tracing::info!(
        poll_secs = poll_interval.as_secs(),
        "Background workers started (cache refresher, alert monitor)"
    );

    Workers {
        cancel,
        refresher,
        monitor,
    }
}

impl Workers {
    /// Cancel both workers and wait briefly for them to stop.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = tokio::time::timeout(SHUTDOWN_GRACE, self.refresher).await;
        let _ = tokio::time::timeout(SHUTDOWN_GRACE, self.monitor).await;
        tracing::info!("Background workers stopped");
    }
}
