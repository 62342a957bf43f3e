use crate::rss_utils::url::ensure_feed_url;
use crate::traits::FeedClient;
use crate::types::{AggregatorError, FetchConfig, Result, Source};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// reqwest-backed feed client. One GET per source, bounded by the configured timeout.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    pub async fn fetch_feed(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        ensure_feed_url(url)?;

        debug!("Fetching feed: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(AggregatorError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(content_length) = response.content_length() {
            let size_mb = content_length as usize / (1024 * 1024);
            if size_mb > self.config.max_feed_size_mb {
                return Err(AggregatorError::FeedTooLarge { size_mb });
            }
        }

        let content = response.text().await?;
        info!(
            "Fetched feed: {} ({} bytes in {}ms)",
            url,
            content.len(),
            start_time.elapsed().as_millis()
        );

        Ok(content)
    }
}

#[async_trait]
impl FeedClient for Fetcher {
    async fn fetch(&self, source: &Source) -> Result<String> {
        self.fetch_feed(&source.url).await
    }

    fn client_name(&self) -> String {
        format!("http ({})", self.config.user_agent)
    }
}
