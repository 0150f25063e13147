//! Euribor tenors.
//!
//! The dataset publishes one series per tenor. The set is closed, so it is
//! modelled as an enum and every string key entering the system goes
//! through [`Maturity::from_str`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A rate tenor, ordered from shortest to longest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Maturity {
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "2w")]
    TwoWeeks,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "2m")]
    TwoMonths,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "9m")]
    NineMonths,
    #[serde(rename = "12m")]
    TwelveMonths,
}

impl Maturity {
    /// Every supported tenor, shortest first.
    pub const ALL: [Maturity; 8] = [
        Maturity::OneWeek,
        Maturity::TwoWeeks,
        Maturity::OneMonth,
        Maturity::TwoMonths,
        Maturity::ThreeMonths,
        Maturity::SixMonths,
        Maturity::NineMonths,
        Maturity::TwelveMonths,
    ];

    /// The short key used in URLs, file names and persistence keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Maturity::OneWeek => "1w",
            Maturity::TwoWeeks => "2w",
            Maturity::OneMonth => "1m",
            Maturity::TwoMonths => "2m",
            Maturity::ThreeMonths => "3m",
            Maturity::SixMonths => "6m",
            Maturity::NineMonths => "9m",
            Maturity::TwelveMonths => "12m",
        }
    }

    /// Human-readable label, e.g. `"3 months"`.
    pub fn label(self) -> &'static str {
        match self {
            Maturity::OneWeek => "1 week",
            Maturity::TwoWeeks => "2 weeks",
            Maturity::OneMonth => "1 month",
            Maturity::TwoMonths => "2 months",
            Maturity::ThreeMonths => "3 months",
            Maturity::SixMonths => "6 months",
            Maturity::NineMonths => "9 months",
            Maturity::TwelveMonths => "12 months",
        }
    }
}

impl fmt::Display for Maturity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Maturity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Maturity::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown maturity '{s}'")))
    }
}
