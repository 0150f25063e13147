//! Domain model for the Euribor rates service.
//!
//! Everything in this crate is pure: no I/O, no clocks other than the
//! `today` values callers pass in.
//!
//! - [`maturity`]: the fixed set of tenors the dataset carries.
//! - [`rate`]: [`Rate`](rate::Rate) samples and ordered [`Series`](rate::Series).
//! - [`retention`]: look-back windows served to the charting front-end.
//! - [`threshold`]: subscriber thresholds, persistence keys and the
//!   sustained-trend evaluation.
//! - [`validation`]: boundary checks applied before anything reaches the
//!   cache or the store.

pub mod error;
pub mod maturity;
pub mod rate;
pub mod retention;
pub mod threshold;
pub mod types;
pub mod validation;
