//! Boundary validation helpers.
//!
//! Applied by the HTTP layer before a request reaches the cache or the
//! threshold store. Every failure is a `CoreError::Validation`.

use chrono::Datelike;

use crate::error::CoreError;
use crate::threshold::KEY_DELIMITER;
use crate::types::Date;

/// Longest accepted subscriber identity, in bytes.
pub const MAX_SUBSCRIBER_LEN: usize = 254;

/// First year covered by the history files.
pub const FIRST_HISTORY_YEAR: i32 = 2010;

/// Validate an opaque subscriber identity (email address or user token).
///
/// Only the properties the persistence key relies on are checked.
pub fn validate_subscriber(subscriber: &str) -> Result<(), CoreError> {
    if subscriber.trim().is_empty() {
        return Err(CoreError::Validation("subscriber must not be empty".into()));
    }
    if subscriber.len() > MAX_SUBSCRIBER_LEN {
        return Err(CoreError::Validation(format!(
            "subscriber must be at most {MAX_SUBSCRIBER_LEN} bytes"
        )));
    }
    if subscriber.contains(KEY_DELIMITER) {
        return Err(CoreError::Validation(format!(
            "subscriber must not contain '{KEY_DELIMITER}'"
        )));
    }
    if subscriber
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(CoreError::Validation(
            "subscriber must not contain whitespace or control characters".into(),
        ));
    }
    Ok(())
}

/// Parse an alert limit. NaN and infinities are rejected.
pub fn parse_limit(raw: &str) -> Result<f64, CoreError> {
    let limit: f64 = raw
        .trim()
        .parse()
        .map_err(|_| CoreError::Validation(format!("invalid alert limit '{raw}'")))?;
    if !limit.is_finite() {
        return Err(CoreError::Validation(format!("invalid alert limit '{raw}'")));
    }
    Ok(limit)
}

/// Parse a history year and check it against [`validate_history_year`].
pub fn parse_history_year(raw: &str, today: Date) -> Result<i32, CoreError> {
    let year: i32 = raw
        .trim()
        .parse()
        .map_err(|_| CoreError::Validation(format!("invalid year '{raw}'")))?;
    validate_history_year(year, today)?;
    Ok(year)
}

/// Validate a year requested from the history endpoint.
pub fn validate_history_year(year: i32, today: Date) -> Result<(), CoreError> {
    if !(FIRST_HISTORY_YEAR..=today.year()).contains(&year) {
        return Err(CoreError::Validation(format!(
            "year {year} is out of range {FIRST_HISTORY_YEAR}..={}",
            today.year()
        )));
    }
    Ok(())
}
