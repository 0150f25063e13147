/// Rate samples are day-precision calendar dates.
pub type Date = chrono::NaiveDate;

/// All wall-clock timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Date format used on the wire and in the history files.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
