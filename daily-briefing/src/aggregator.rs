use crate::parser::FeedParser;
use crate::traits::FeedClient;
use crate::types::{AggregatorError, Category, RawArticle, Result, Source};
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one source in a fan-out, tagged success or failure.
pub struct SourceOutcome<'a> {
    pub source: &'a Source,
    pub result: Result<Vec<RawArticle>>,
}

/// Fans out fetch + extract over every source of a category and merges the successes.
pub struct RssAggregator<C: FeedClient> {
    client: Arc<C>,
    parser: FeedParser,
}

impl<C: FeedClient> RssAggregator<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            parser: FeedParser::new(),
        }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Fetch all sources concurrently and wait for every outcome.
    ///
    /// Articles are concatenated in source-list order, then feed order.
    /// Failed sources are logged and contribute nothing.
    pub async fn collect(&self, category: Category, sources: &[Source]) -> Result<Vec<RawArticle>> {
        if sources.is_empty() {
            return Err(AggregatorError::NoSources { category });
        }

        info!("Fetching {} sources for {}", sources.len(), category);

        let outcomes = join_all(sources.iter().map(|source| self.fetch_source(source))).await;

        let total = outcomes.len();
        let mut succeeded = 0;
        let mut articles = Vec::new();

        for outcome in outcomes {
            match outcome.result {
                Ok(mut items) => {
                    succeeded += 1;
                    articles.append(&mut items);
                }
                Err(e) => {
                    warn!(
                        "Failed to fetch {} via {}: {}",
                        outcome.source.name,
                        self.client.client_name(),
                        e
                    );
                }
            }
        }

        info!(
            "Collected {} articles for {} from {}/{} sources",
            articles.len(),
            category,
            succeeded,
            total
        );

        Ok(articles)
    }

    async fn fetch_source<'a>(&self, source: &'a Source) -> SourceOutcome<'a> {
        let result = self.client.fetch(source).await.map(|body| {
            let fetched_at = Utc::now();
            if !FeedParser::is_valid_feed_content(&body) {
                debug!("Response from {} does not look like a feed", source.name);
            }
            self.parser.parse_items(&body, source, fetched_at)
        });

        SourceOutcome { source, result }
    }
}
