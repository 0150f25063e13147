//! Rate samples and ordered series.

use chrono::{Datelike, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::types::Date;

/// Significant digits kept in the charting array.
const CHART_SIGNIFICANT_DIGITS: i32 = 4;

/// A single published rate. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    /// Publication date (serialized as `YYYY-MM-DD`).
    pub date: Date,
    /// Rate in percent.
    pub value: f64,
}

impl Rate {
    pub fn new(date: Date, value: f64) -> Self {
        Self { date, value }
    }

    /// Midnight UTC of the sample date, in epoch milliseconds.
    pub fn epoch_millis(&self) -> i64 {
        self.date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
    }
}

/// Samples of one maturity in strictly increasing date order.
///
/// The ordering invariant is established by [`Series::from_samples`]; there
/// is no way to mutate a series afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series {
    rates: Vec<Rate>,
}

impl Series {
    /// An empty series, served for maturities that were never loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a series from samples in any order.
    ///
    /// Samples are sorted by date. When two samples share a date the one
    /// appearing later in `samples` wins.
    pub fn from_samples(mut samples: Vec<Rate>) -> Self {
        // Stable sort keeps input order among equal dates.
        samples.sort_by_key(|r| r.date);

        let mut rates: Vec<Rate> = Vec::with_capacity(samples.len());
        for rate in samples {
            match rates.last_mut() {
                Some(last) if last.date == rate.date => *last = rate,
                _ => rates.push(rate),
            }
        }
        Self { rates }
    }

    pub fn as_slice(&self) -> &[Rate] {
        &self.rates
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Most recent sample, if any.
    pub fn last(&self) -> Option<&Rate> {
        self.rates.last()
    }

    /// Samples published in the given calendar year.
    pub fn in_year(&self, year: i32) -> Series {
        self.filtered(|r| r.date.year() == year)
    }

    /// Samples dated on or after `start`.
    pub fn since(&self, start: Date) -> Series {
        self.filtered(|r| r.date >= start)
    }

    /// Charting array: `[epoch_millis, value]` pairs with values rounded to
    /// four significant digits.
    pub fn chart_points(&self) -> Vec<(i64, f64)> {
        self.rates
            .iter()
            .map(|r| {
                (
                    r.epoch_millis(),
                    round_significant(r.value, CHART_SIGNIFICANT_DIGITS),
                )
            })
            .collect()
    }

    fn filtered(&self, keep: impl Fn(&Rate) -> bool) -> Series {
        Series {
            rates: self.rates.iter().copied().filter(|r| keep(r)).collect(),
        }
    }
}

/// Round `value` to `digits` significant digits.
pub fn round_significant(value: f64, digits: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(digits - 1 - magnitude);
    (value * factor).round() / factor
}
