//! Subscriber rate thresholds.
//!
//! A [`Threshold`] asks for one alert when a maturity's rate sustains a
//! trend at or above a limit. The trend filter lives in [`trend_exceeded`];
//! the persistence key format lives in [`ThresholdKey`].

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::CoreError;
use crate::maturity::Maturity;
use crate::rate::{Rate, Series};
use crate::types::{Date, DATE_FORMAT};

/// Number of trailing samples that must all sit at or above the limit.
pub const TREND_WINDOW: usize = 5;

/// Prefix shared by every persisted threshold key.
pub const KEY_PREFIX: &str = "rates_";

/// Separates subscriber identity from maturity inside a key.
/// Subscriber identities may not contain it.
pub const KEY_DELIMITER: char = ';';

/// Title of every alert notification.
pub const ALERT_TITLE: &str = "Automatic Euribor alert";

/// Returns the date of the most recent sample when the last
/// [`TREND_WINDOW`] samples all have `value >= limit`.
///
/// Shorter series never trigger: there is no trend to speak of yet.
pub fn trend_exceeded(limit: f64, rates: &[Rate]) -> Option<Date> {
    if rates.len() < TREND_WINDOW {
        return None;
    }
    let tail = &rates[rates.len() - TREND_WINDOW..];
    if tail.iter().all(|r| r.value >= limit) {
        tail.last().map(|r| r.date)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// ThresholdKey
// ---------------------------------------------------------------------------

/// Natural key of a threshold: one per subscriber and maturity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThresholdKey {
    pub subscriber: String,
    pub maturity: Maturity,
}

impl ThresholdKey {
    pub fn new(subscriber: impl Into<String>, maturity: Maturity) -> Self {
        Self {
            subscriber: subscriber.into(),
            maturity,
        }
    }

    /// Persistence form: `rates_<subscriber>;<maturity>`.
    pub fn encode(&self) -> String {
        format!(
            "{KEY_PREFIX}{}{KEY_DELIMITER}{}",
            self.subscriber, self.maturity
        )
    }

    /// Parse a persisted key back into its components.
    pub fn decode(key: &str) -> Result<Self, CoreError> {
        let rest = key
            .strip_prefix(KEY_PREFIX)
            .ok_or_else(|| CoreError::Validation(format!("key '{key}' lacks prefix")))?;

        let mut parts = rest.split(KEY_DELIMITER);
        let (subscriber, maturity) = match (parts.next(), parts.next(), parts.next()) {
            (Some(s), Some(m), None) if !s.is_empty() => (s, m),
            _ => {
                return Err(CoreError::Validation(format!(
                    "subscriber and maturity not found in key '{key}'"
                )))
            }
        };

        Ok(Self {
            subscriber: subscriber.to_string(),
            maturity: maturity.parse()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Threshold
// ---------------------------------------------------------------------------

/// Lifecycle of a threshold while it is held in memory.
///
/// Removal is the terminal step and happens in the store, so it has no
/// variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdState {
    Pending,
    Triggered { date: Date },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    pub key: ThresholdKey,
    pub limit: f64,
    state: ThresholdState,
}

impl Threshold {
    /// A freshly added, pending threshold.
    pub fn new(key: ThresholdKey, limit: f64) -> Self {
        Self {
            key,
            limit,
            state: ThresholdState::Pending,
        }
    }

    pub fn subscriber(&self) -> &str {
        &self.key.subscriber
    }

    pub fn maturity(&self) -> Maturity {
        self.key.maturity
    }

    pub fn state(&self) -> ThresholdState {
        self.state
    }

    pub fn is_triggered(&self) -> bool {
        matches!(self.state, ThresholdState::Triggered { .. })
    }

    pub fn trigger_date(&self) -> Option<Date> {
        match self.state {
            ThresholdState::Triggered { date } => Some(date),
            ThresholdState::Pending => None,
        }
    }

    /// Evaluate against `series`, moving Pending to Triggered on a hit.
    ///
    /// Returns `true` only for the transition itself; an already triggered
    /// threshold is never re-evaluated.
    pub fn evaluate(&mut self, series: &Series) -> bool {
        if self.is_triggered() {
            return false;
        }
        match trend_exceeded(self.limit, series.as_slice()) {
            Some(date) => {
                self.state = ThresholdState::Triggered { date };
                true
            }
            None => false,
        }
    }

    pub fn alert_title(&self) -> &'static str {
        ALERT_TITLE
    }

    /// Notification text. Falls back to `"unknown date"` for a pending
    /// threshold, which callers only hit by mistake.
    pub fn alert_body(&self) -> String {
        let at = self
            .trigger_date()
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "unknown date".to_string());
        format!(
            "Your defined limit '{:.3}' for Euribor rate {} has been exceeded at {}",
            self.limit,
            self.maturity(),
            at
        )
    }
}

impl Serialize for Threshold {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Threshold", 5)?;
        s.serialize_field("subscriber", &self.key.subscriber)?;
        s.serialize_field("maturity", &self.key.maturity)?;
        s.serialize_field("limit", &self.limit)?;
        s.serialize_field("triggered", &self.is_triggered())?;
        s.serialize_field("trigger_date", &self.trigger_date())?;
        s.end()
    }
}
