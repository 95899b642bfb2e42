use async_trait::async_trait;

use super::client::FetchError;
use super::models::{Correlations, Match};

/// Read-only source of precomputed betting statistics.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Most recent matches, newest first, at most `limit` of them.
    async fn list_matches(&self, limit: u32) -> Result<Vec<Match>, FetchError>;

    /// Win count and average winning odd per market outcome.
    async fn correlations(&self) -> Result<Correlations, FetchError>;

    /// Single match with its odds.
    async fn get_match(&self, id: i64) -> Result<Match, FetchError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
