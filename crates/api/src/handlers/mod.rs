pub mod alerts;
pub mod meta;
pub mod rates;
