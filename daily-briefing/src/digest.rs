use crate::aggregator::RssAggregator;
use crate::config::BriefingConfig;
use crate::fetcher::Fetcher;
use crate::processing::processor_for;
use crate::sources::SourceCatalog;
use crate::state::NewsCache;
use crate::traits::FeedClient;
use crate::types::{Category, FormattedArticle, NewsResponse, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Entry point for callers: category in, bounded digest out.
///
/// The cache is injected so a process can share one instance and tests can
/// use isolated ones.
pub struct BriefingService<C: FeedClient> {
    aggregator: RssAggregator<C>,
    catalog: SourceCatalog,
    cache: Arc<NewsCache>,
}

impl BriefingService<Fetcher> {
    /// HTTP-backed service over the compiled-in sources.
    pub fn from_config(config: &BriefingConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = Fetcher::new(config.fetch.clone())?;
        let cache = NewsCache::new(config.cache_ttl());
        Ok(Self::new(
            Arc::new(fetcher),
            SourceCatalog::default(),
            Arc::new(cache),
        ))
    }
}

impl<C: FeedClient> BriefingService<C> {
    pub fn new(client: Arc<C>, catalog: SourceCatalog, cache: Arc<NewsCache>) -> Self {
        Self {
            aggregator: RssAggregator::new(client),
            catalog,
            cache,
        }
    }

    pub fn cache(&self) -> &NewsCache {
        &self.cache
    }

    /// Cached digest for `category`, refreshed through the pipeline when expired.
    pub async fn get_news(&self, category: Category) -> Result<NewsResponse> {
        self.cache
            .get_or_refresh(category, || self.run_pipeline(category))
            .await
    }

    /// Like `get_news`, validating a caller-supplied category name first.
    pub async fn get_news_for(&self, category: &str) -> Result<NewsResponse> {
        let category: Category = category.parse()?;
        self.get_news(category).await
    }

    /// Uncached fetch → extract → rank → format run.
    pub async fn run_pipeline(&self, category: Category) -> Result<Vec<FormattedArticle>> {
        let sources = self.catalog.sources_for(category);
        let articles = self.aggregator.collect(category, sources).await?;

        let digest = processor_for(category).process(&articles, Utc::now());
        info!(
            "Built {} digest with {} of {} articles",
            category,
            digest.len(),
            articles.len()
        );

        Ok(digest)
    }
}
