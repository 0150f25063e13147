//! Look-back windows for the charting front-end.
//!
//! A retention names a period ending at the most recent sample of a series
//! (not at "today", so a stale dataset still yields a populated window).

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months};
use serde::Serialize;

use crate::error::CoreError;
use crate::rate::Series;
use crate::types::Date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Retention {
    LastWeek,
    LastMonth,
    LastQuarter,
    LastSixMonths,
    LastYear,
    LastTwoYears,
    LastSixYears,
}

impl Retention {
    pub const ALL: [Retention; 7] = [
        Retention::LastWeek,
        Retention::LastMonth,
        Retention::LastQuarter,
        Retention::LastSixMonths,
        Retention::LastYear,
        Retention::LastTwoYears,
        Retention::LastSixYears,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Retention::LastWeek => "last-week",
            Retention::LastMonth => "last-month",
            Retention::LastQuarter => "last-quarter",
            Retention::LastSixMonths => "last-six-months",
            Retention::LastYear => "last-year",
            Retention::LastTwoYears => "last-two-years",
            Retention::LastSixYears => "last-six-years",
        }
    }

    /// First date included in the window ending at `latest`.
    ///
    /// Saturates at the earliest representable date.
    pub fn window_start(self, latest: Date) -> Date {
        let start = match self {
            Retention::LastWeek => latest.checked_sub_days(Days::new(7)),
            Retention::LastMonth => latest.checked_sub_months(Months::new(1)),
            Retention::LastQuarter => latest.checked_sub_months(Months::new(3)),
            Retention::LastSixMonths => latest.checked_sub_months(Months::new(6)),
            Retention::LastYear => latest.checked_sub_months(Months::new(12)),
            Retention::LastTwoYears => latest.checked_sub_months(Months::new(24)),
            Retention::LastSixYears => latest.checked_sub_months(Months::new(72)),
        };
        start.unwrap_or(Date::MIN)
    }
}

impl fmt::Display for Retention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Retention {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Retention::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown retention '{s}'")))
    }
}

impl Series {
    /// Samples inside `retention`, measured back from the last sample.
    pub fn within(&self, retention: Retention) -> Series {
        match self.last() {
            Some(last) => self.since(retention.window_start(last.date)),
            None => Series::empty(),
        }
    }
}
