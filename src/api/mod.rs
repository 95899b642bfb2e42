pub mod client;
pub mod models;
pub mod source;

pub use client::{FetchError, StatsClient};
pub use models::{CorrelationEntry, Correlations, Match, Odd};
pub use source::StatsSource;
