//! In-memory rate cache and its refresh engine.
//!
//! - [`RatesSource`]: where series come from; [`CsvRatesSource`] reads the
//!   published history files.
//! - [`RateCache`]: the latest complete [`CacheSnapshot`], swapped
//!   atomically on every refresh.
//! - [`CacheService`]: reloads the cache when the source changes and wakes
//!   the alert monitor through a [`RefreshSignal`].
//! - [`RefreshTrigger`]: decides when the service looks for changes.

pub mod cache;
pub mod csv_source;
pub mod service;
pub mod signal;
pub mod source;
pub mod trigger;

pub use cache::{CacheSnapshot, RateCache};
pub use csv_source::CsvRatesSource;
pub use service::{CacheService, RefreshReport};
pub use signal::{refresh_signal, RefreshListener, RefreshSignal, SignalDelivery};
pub use source::{RatesSource, SeriesRead, SourceError};
pub use trigger::{IntervalTrigger, RefreshTrigger, DEFAULT_POLL_INTERVAL};
