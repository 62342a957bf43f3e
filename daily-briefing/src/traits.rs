use crate::types::{Result, Source};
use async_trait::async_trait;

/// Transport used to pull the raw body of one feed.
///
/// Failures are per-source: the aggregator logs them and carries on with the
/// remaining sources.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Fetch the raw response body for `source`.
    async fn fetch(&self, source: &Source) -> Result<String>;

    /// Human-readable name for log lines.
    fn client_name(&self) -> String {
        "feed-client".to_string()
    }
}
