//! History files on disk.
//!
//! One file per maturity, named `euribor-rates-<maturity>.csv`. Each record
//! is `YYYY-MM-DD,<value>`; `#` starts a comment line and there is no
//! header row.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use euribor_core::maturity::Maturity;
use euribor_core::rate::{Rate, Series};
use euribor_core::types::{Date, Timestamp, DATE_FORMAT};

use crate::source::{RatesSource, SeriesRead, SourceError};

/// Reads rate series from a directory of CSV files.
#[derive(Debug, Clone)]
pub struct CsvRatesSource {
    dir: PathBuf,
}

impl CsvRatesSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the history file for `maturity`.
    pub fn file_path(&self, maturity: Maturity) -> PathBuf {
        self.dir.join(format!("euribor-rates-{maturity}.csv"))
    }
}

#[async_trait]
impl RatesSource for CsvRatesSource {
    fn maturities(&self) -> Vec<Maturity> {
        Maturity::ALL.to_vec()
    }

    async fn last_modified(&self, maturity: Maturity) -> Result<Option<Timestamp>, SourceError> {
        match modified_at(&self.file_path(maturity)).await {
            Ok(ts) => Ok(Some(ts)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SourceError::Unavailable { maturity, source }),
        }
    }

    async fn read_series(&self, maturity: Maturity) -> Result<SeriesRead, SourceError> {
        let path = self.file_path(maturity);
        let unavailable = |source| SourceError::Unavailable { maturity, source };

        let last_modified = modified_at(&path).await.map_err(unavailable)?;
        let bytes = tokio::fs::read(&path).await.map_err(unavailable)?;
        let series = Series::from_samples(parse_records(&bytes, &path));

        tracing::debug!(
            maturity = %maturity,
            path = %path.display(),
            samples = series.len(),
            "Read rate history file"
        );

        Ok(SeriesRead {
            series,
            last_modified: Some(last_modified),
        })
    }
}

async fn modified_at(path: &Path) -> std::io::Result<Timestamp> {
    let modified = tokio::fs::metadata(path).await?.modified()?;
    Ok(DateTime::<Utc>::from(modified))
}

/// Parse every well-formed record. Malformed rows are logged and skipped
/// so one bad line never hides the rest of the file.
pub fn parse_records(bytes: &[u8], path: &Path) -> Vec<Rate> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut rates = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable row");
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        match parse_record(&record) {
            Ok(rate) => rates.push(rate),
            Err(reason) => {
                tracing::warn!(path = %path.display(), line, reason, "Skipping malformed sample");
            }
        }
    }
    rates
}

fn parse_record(record: &csv::StringRecord) -> Result<Rate, &'static str> {
    if record.len() != 2 {
        return Err("expected exactly two fields");
    }
    let date = Date::parse_from_str(&record[0], DATE_FORMAT).map_err(|_| "invalid date")?;
    let value: f64 = record[1].parse().map_err(|_| "invalid value")?;
    if !value.is_finite() {
        return Err("non-finite value");
    }
    Ok(Rate::new(date, value))
}
