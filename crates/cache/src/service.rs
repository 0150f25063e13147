//! The refresh engine.
//!
//! [`CacheService`] keeps [`RateCache`] in step with a [`RatesSource`].
//! On each trigger tick it compares the newest modification time across
//! the source with the newest one observed by its last successful pass and
//! only reloads when the source is strictly newer. Both sides of that
//! comparison come from the source's own clock. A pass that loaded anything
//! publishes a new snapshot and wakes the alert monitor once.

use std::sync::Arc;

use chrono::Utc;
use euribor_core::maturity::Maturity;
use euribor_core::types::Timestamp;
use tokio_util::sync::CancellationToken;

use crate::cache::{CacheSnapshot, RateCache};
use crate::signal::RefreshSignal;
use crate::source::RatesSource;
use crate::trigger::RefreshTrigger;

/// What a single refresh pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Maturities whose series was replaced.
    pub refreshed: Vec<Maturity>,
    /// Maturities that kept their previous value because the read failed.
    pub failed: Vec<Maturity>,
}

impl RefreshReport {
    /// Whether the pass published a new snapshot.
    pub fn published(&self) -> bool {
        !self.refreshed.is_empty()
    }
}

pub struct CacheService {
    source: Arc<dyn RatesSource>,
    cache: Arc<RateCache>,
    signal: RefreshSignal,
    last_refresh: Option<Timestamp>,
    observed_version: Option<Timestamp>,
}

impl CacheService {
    pub fn new(source: Arc<dyn RatesSource>, cache: Arc<RateCache>, signal: RefreshSignal) -> Self {
        Self {
            source,
            cache,
            signal,
            last_refresh: None,
            observed_version: None,
        }
    }

    /// Start time of the last pass that published a snapshot.
    pub fn last_refresh(&self) -> Option<Timestamp> {
        self.last_refresh
    }

    /// Newest source modification time seen by the last published pass.
    pub fn observed_version(&self) -> Option<Timestamp> {
        self.observed_version
    }

    /// Run until `cancel` fires, checking for changes on every tick.
    pub async fn run<T: RefreshTrigger>(mut self, mut trigger: T, cancel: CancellationToken) {
        tracing::info!(
            maturities = self.source.maturities().len(),
            "Cache refresher started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Cache refresher stopping");
                    break;
                }
                _ = trigger.tick() => {
                    self.refresh_if_stale().await;
                }
            }
        }
    }

    /// Refresh when the source changed since the last successful pass.
    /// Returns the report of the pass, or `None` if nothing was stale.
    pub async fn refresh_if_stale(&mut self) -> Option<RefreshReport> {
        if !self.is_stale().await {
            tracing::debug!("Rate source unchanged, skipping refresh");
            return None;
        }
        Some(self.refresh().await)
    }

    /// Whether the source holds data newer than the cache.
    ///
    /// A cache that never completed a pass is always stale.
    pub async fn is_stale(&self) -> bool {
        if self.last_refresh.is_none() {
            return true;
        }
        match (self.newest_modification().await, self.observed_version) {
            (Some(modified), Some(observed)) => modified > observed,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Newest modification time across every maturity. Maturities whose
    /// time cannot be read are logged and ignored.
    async fn newest_modification(&self) -> Option<Timestamp> {
        let mut newest = None;
        for maturity in self.source.maturities() {
            match self.source.last_modified(maturity).await {
                Ok(modified) => newest = newest.max(modified),
                Err(e) => {
                    tracing::warn!(maturity = %maturity, error = %e, "Cannot read modification time");
                }
            }
        }
        newest
    }

    /// Reload every maturity and publish the result as one snapshot.
    ///
    /// A maturity that fails to load keeps its previous series. If nothing
    /// loads at all the cache is left untouched, no signal is sent and the
    /// next tick tries again.
    pub async fn refresh(&mut self) -> RefreshReport {
        let started = Utc::now();
        tracing::info!("Refreshing rate cache");

        // Taken before the reads so a write landing mid-pass stays newer.
        let mut observed = self.newest_modification().await;
        let mut entries = self.cache.snapshot().entries();
        let mut report = RefreshReport::default();

        for maturity in self.source.maturities() {
            match self.source.read_series(maturity).await {
                Ok(read) => {
                    tracing::debug!(maturity = %maturity, samples = read.series.len(), "Series loaded");
                    observed = observed.max(read.last_modified);
                    entries.insert(maturity, Arc::new(read.series));
                    report.refreshed.push(maturity);
                }
                Err(e) => {
                    tracing::warn!(maturity = %maturity, error = %e, "Keeping previous series");
                    report.failed.push(maturity);
                }
            }
        }

        if !report.published() {
            tracing::warn!(failed = report.failed.len(), "Rate cache refresh loaded nothing");
            return report;
        }

        self.cache.replace(CacheSnapshot::new(entries, Some(started)));
        self.last_refresh = Some(started);
        self.observed_version = observed;
        self.signal.notify();

        tracing::info!(
            refreshed = report.refreshed.len(),
            failed = report.failed.len(),
            "Rate cache refresh completed"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use euribor_core::rate::{Rate, Series};
    use euribor_core::types::Date;

    use super::*;
    use crate::csv_source::CsvRatesSource;
    use crate::signal::refresh_signal;
    use crate::source::{SeriesRead, SourceError};

    /// In-memory source whose contents and modification time tests control.
    #[derive(Default)]
    struct FakeSource {
        series: Mutex<HashMap<Maturity, Series>>,
        broken: Mutex<Vec<Maturity>>,
        modified: Mutex<Option<Timestamp>>,
        reads: Mutex<usize>,
    }

    impl FakeSource {
        fn set(&self, maturity: Maturity, values: &[f64]) {
            let start = Date::from_ymd_opt(2017, 1, 2).unwrap();
            let series = Series::from_samples(
                values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| Rate::new(start + chrono::Days::new(i as u64), *v))
                    .collect(),
            );
            self.series.lock().unwrap().insert(maturity, series);
        }

        fn touch(&self) {
            self.modify_at(Utc::now());
        }

        fn modify_at(&self, at: Timestamp) {
            *self.modified.lock().unwrap() = Some(at);
        }

        fn break_maturity(&self, maturity: Maturity) {
            self.broken.lock().unwrap().push(maturity);
        }

        fn reads(&self) -> usize {
            *self.reads.lock().unwrap()
        }
    }

    #[async_trait]
    impl RatesSource for FakeSource {
        fn maturities(&self) -> Vec<Maturity> {
            vec![Maturity::OneWeek, Maturity::ThreeMonths]
        }

        async fn last_modified(&self, _: Maturity) -> Result<Option<Timestamp>, SourceError> {
            Ok(*self.modified.lock().unwrap())
        }

        async fn read_series(&self, maturity: Maturity) -> Result<SeriesRead, SourceError> {
            *self.reads.lock().unwrap() += 1;
            if self.broken.lock().unwrap().contains(&maturity) {
                return Err(SourceError::Unavailable {
                    maturity,
                    source: std::io::Error::other("unreadable"),
                });
            }
            let series = self
                .series
                .lock()
                .unwrap()
                .get(&maturity)
                .cloned()
                .unwrap_or_default();
            Ok(SeriesRead {
                series,
                last_modified: *self.modified.lock().unwrap(),
            })
        }
    }

    fn service(source: &Arc<FakeSource>) -> (CacheService, Arc<RateCache>, crate::RefreshListener) {
        let cache = Arc::new(RateCache::new());
        let (signal, listener) = refresh_signal();
        let svc = CacheService::new(source.clone(), Arc::clone(&cache), signal);
        (svc, cache, listener)
    }

    #[tokio::test]
    async fn first_check_always_refreshes_and_signals() {
        let source = Arc::new(FakeSource::default());
        source.set(Maturity::ThreeMonths, &[0.1, 0.2]);
        source.touch();
        let (mut svc, cache, mut listener) = service(&source);

        let report = svc.refresh_if_stale().await.expect("first pass runs");
        assert_eq!(report.refreshed, vec![Maturity::OneWeek, Maturity::ThreeMonths]);
        assert_eq!(cache.get(Maturity::ThreeMonths).len(), 2);
        assert!(listener.try_take());
        assert!(svc.last_refresh().is_some());
    }

    #[tokio::test]
    async fn unchanged_source_is_not_reloaded() {
        let source = Arc::new(FakeSource::default());
        source.set(Maturity::OneWeek, &[0.1]);
        source.touch();
        let (mut svc, _cache, mut listener) = service(&source);

        svc.refresh_if_stale().await;
        listener.try_take();
        let reads = source.reads();

        assert!(svc.refresh_if_stale().await.is_none());
        assert_eq!(source.reads(), reads);
        assert!(!listener.try_take());
    }

    #[tokio::test]
    async fn newer_modification_triggers_reload() {
        let source = Arc::new(FakeSource::default());
        source.set(Maturity::OneWeek, &[0.1]);
        source.touch();
        let (mut svc, cache, _listener) = service(&source);
        svc.refresh_if_stale().await;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        source.set(Maturity::OneWeek, &[0.1, 0.2, 0.3]);
        source.touch();

        assert!(svc.is_stale().await);
        svc.refresh_if_stale().await.expect("stale source reloads");
        assert_eq!(cache.get(Maturity::OneWeek).len(), 3);
    }

    #[tokio::test]
    async fn source_clock_behind_wall_clock_still_reloads() {
        let source = Arc::new(FakeSource::default());
        source.set(Maturity::OneWeek, &[0.1]);
        source.modify_at(Utc::now() - chrono::Duration::seconds(10));
        let (mut svc, cache, _listener) = service(&source);
        svc.refresh_if_stale().await;
        let refreshed_at = svc.last_refresh().unwrap();

        source.set(Maturity::OneWeek, &[0.1, 0.2]);
        source.modify_at(refreshed_at - chrono::Duration::milliseconds(500));

        assert!(svc.is_stale().await);
        svc.refresh_if_stale().await.expect("newer source version reloads");
        assert_eq!(cache.get(Maturity::OneWeek).len(), 2);
        assert!(svc.refresh_if_stale().await.is_none());
    }

    #[tokio::test]
    async fn csv_file_with_lagging_mtime_is_reloaded() {
        use std::time::{Duration, SystemTime};

        let dir = tempfile::tempdir().unwrap();
        let csv = Arc::new(CsvRatesSource::new(dir.path()));
        let path = csv.file_path(Maturity::OneWeek);
        let write = |body: &str, age: Duration| {
            std::fs::write(&path, body).unwrap();
            let file = std::fs::File::options().write(true).open(&path).unwrap();
            file.set_modified(SystemTime::now() - age).unwrap();
        };

        write("2017-01-02,-0.37\n", Duration::from_secs(10));
        let cache = Arc::new(RateCache::new());
        let (signal, _listener) = refresh_signal();
        let mut svc = CacheService::new(csv.clone(), Arc::clone(&cache), signal);
        svc.refresh_if_stale().await.expect("first pass runs");
        assert_eq!(cache.get(Maturity::OneWeek).len(), 1);

        write("2017-01-02,-0.37\n2017-01-03,-0.38\n", Duration::from_secs(5));
        assert!(svc.observed_version().unwrap() < svc.last_refresh().unwrap());

        svc.refresh_if_stale().await.expect("rewritten file reloads");
        assert_eq!(cache.get(Maturity::OneWeek).len(), 2);
    }

    #[tokio::test]
    async fn failed_maturity_keeps_previous_series() {
        let source = Arc::new(FakeSource::default());
        source.set(Maturity::OneWeek, &[0.1, 0.2]);
        source.set(Maturity::ThreeMonths, &[0.5]);
        let (mut svc, cache, _listener) = service(&source);
        svc.refresh().await;

        source.set(Maturity::OneWeek, &[9.9]);
        source.set(Maturity::ThreeMonths, &[0.5, 0.6]);
        source.break_maturity(Maturity::OneWeek);
        let report = svc.refresh().await;

        assert_eq!(report.failed, vec![Maturity::OneWeek]);
        assert_eq!(report.refreshed, vec![Maturity::ThreeMonths]);
        assert_eq!(cache.get(Maturity::OneWeek).len(), 2);
        assert_eq!(cache.get(Maturity::ThreeMonths).len(), 2);
    }

    #[tokio::test]
    async fn total_failure_leaves_cache_and_signal_untouched() {
        let source = Arc::new(FakeSource::default());
        source.break_maturity(Maturity::OneWeek);
        source.break_maturity(Maturity::ThreeMonths);
        let (mut svc, cache, mut listener) = service(&source);

        let report = svc.refresh().await;
        assert!(!report.published());
        assert!(cache.snapshot().refreshed_at().is_none());
        assert!(!listener.try_take());
        assert!(svc.is_stale().await, "next tick retries");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn readers_never_observe_mixed_passes() {
        let source = Arc::new(FakeSource::default());
        let (mut svc, cache, _listener) = service(&source);

        let reader_cache = Arc::clone(&cache);
        let reader = tokio::spawn(async move {
            for _ in 0..2_000 {
                let snap = reader_cache.snapshot();
                let short = snap.get(Maturity::OneWeek).last().map(|r| r.value);
                let long = snap.get(Maturity::ThreeMonths).last().map(|r| r.value);
                assert_eq!(short, long, "snapshot mixes refresh passes");
                tokio::task::yield_now().await;
            }
        });

        for pass in 0..200 {
            let value = f64::from(pass);
            source.set(Maturity::OneWeek, &[value]);
            source.set(Maturity::ThreeMonths, &[value]);
            svc.refresh().await;
        }

        reader.await.expect("reader saw only complete snapshots");
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_on_cancel() {
        let source = Arc::new(FakeSource::default());
        source.set(Maturity::OneWeek, &[0.1]);
        source.touch();
        let (svc, cache, mut listener) = service(&source);
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(svc.run(
            crate::trigger::IntervalTrigger::new(std::time::Duration::from_secs(60)),
            cancel.clone(),
        ));

        assert!(listener.wait().await);
        assert_eq!(cache.get(Maturity::OneWeek).len(), 1);

        cancel.cancel();
        handle.await.unwrap();
    }
}
