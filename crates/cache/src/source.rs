//! The [`RatesSource`] contract.

use async_trait::async_trait;
use euribor_core::maturity::Maturity;
use euribor_core::rate::Series;
use euribor_core::types::Timestamp;

/// Error type for source reads.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The data behind one maturity could not be read at all.
    #[error("Rates for {maturity} unavailable: {source}")]
    Unavailable {
        maturity: Maturity,
        #[source]
        source: std::io::Error,
    },
}

/// A full series together with the modification time it was read at.
#[derive(Debug, Clone)]
pub struct SeriesRead {
    pub series: Series,
    pub last_modified: Option<Timestamp>,
}

/// Source of truth for rate series.
#[async_trait]
pub trait RatesSource: Send + Sync {
    /// The maturities this source publishes, shortest first.
    fn maturities(&self) -> Vec<Maturity>;

    /// When the data for `maturity` last changed. `None` when the source
    /// has no data for it yet.
    async fn last_modified(&self, maturity: Maturity) -> Result<Option<Timestamp>, SourceError>;

    /// Read the complete series for `maturity`.
    async fn read_series(&self, maturity: Maturity) -> Result<SeriesRead, SourceError>;
}
