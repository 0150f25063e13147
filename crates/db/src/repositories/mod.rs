//! Query helpers, one unit struct per table.

pub mod threshold_repo;

pub use threshold_repo::ThresholdRepo;
