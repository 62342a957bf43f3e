use crate::rss_utils::time::{format_duration, is_within};
use crate::types::{AggregatorError, Category, FormattedArticle, NewsResponse, Result};
use chrono::{DateTime, Duration, Utc};
use std::future::Future;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

/// Last successful digest of one category.
#[derive(Debug, Clone, Default)]
pub struct CacheEntry {
    pub data: Option<Vec<FormattedArticle>>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Lifecycle of a category's cached digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Fresh,
    /// Expired but still served when a refresh fails.
    Stale,
}

impl CacheEntry {
    fn state(&self, ttl: Duration, now: DateTime<Utc>) -> CacheState {
        match (&self.data, self.timestamp) {
            (Some(_), Some(ts)) if is_within(ts, ttl, now) => CacheState::Fresh,
            (Some(_), _) => CacheState::Stale,
            (None, _) => CacheState::Empty,
        }
    }

    fn fresh_data(&self, ttl: Duration, now: DateTime<Utc>) -> Option<Vec<FormattedArticle>> {
        match self.state(ttl, now) {
            CacheState::Fresh => self.data.clone(),
            _ => None,
        }
    }
}

struct CacheSlot {
    entry: RwLock<CacheEntry>,
    /// Held while a refresh runs so concurrent requests share its result.
    refresh: Mutex<()>,
}

impl CacheSlot {
    fn new() -> Self {
        Self {
            entry: RwLock::new(CacheEntry::default()),
            refresh: Mutex::new(()),
        }
    }
}

/// Per-category digest cache with stale-on-error fallback.
///
/// Construct one per process and share it; nothing here is global.
pub struct NewsCache {
    ttl: Duration,
    world: CacheSlot,
    legal_tech: CacheSlot,
}

impl NewsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            world: CacheSlot::new(),
            legal_tech: CacheSlot::new(),
        }
    }

    fn slot(&self, category: Category) -> &CacheSlot {
        match category {
            Category::World => &self.world,
            Category::LegalTech => &self.legal_tech,
        }
    }

    pub async fn state(&self, category: Category) -> CacheState {
        self.slot(category).entry.read().await.state(self.ttl, Utc::now())
    }

    pub async fn snapshot(&self, category: Category) -> CacheEntry {
        self.slot(category).entry.read().await.clone()
    }

    /// Serve fresh cached data, or run `refresh` and cache its result.
    ///
    /// When `refresh` fails, previously cached data is returned marked stale.
    /// Only a category that has never been cached surfaces the failure.
    pub async fn get_or_refresh<F, Fut>(&self, category: Category, refresh: F) -> Result<NewsResponse>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<FormattedArticle>>>,
    {
        let slot = self.slot(category);

        if let Some(data) = slot.entry.read().await.fresh_data(self.ttl, Utc::now()) {
            debug!("Serving cached {} digest", category);
            return Ok(NewsResponse::cached(data));
        }

        let _refresh_guard = slot.refresh.lock().await;

        // another request may have refreshed while we waited
        if let Some(data) = slot.entry.read().await.fresh_data(self.ttl, Utc::now()) {
            debug!("Serving {} digest refreshed by a concurrent request", category);
            return Ok(NewsResponse::cached(data));
        }

        let started_at = Utc::now();
        match refresh().await {
            Ok(articles) => {
                let mut entry = slot.entry.write().await;
                entry.data = Some(articles.clone());
                entry.timestamp = Some(started_at);
                info!("Cached {} articles for {}", articles.len(), category);
                Ok(NewsResponse::fresh(articles))
            }
            Err(e) => {
                error!("Refreshing {} digest failed: {}", category, e);

                let entry = slot.entry.read().await;
                match (&entry.data, entry.timestamp) {
                    (Some(data), timestamp) => {
                        let age = timestamp
                            .map(|ts| format_duration(Utc::now().signed_duration_since(ts)))
                            .unwrap_or_else(|| "unknown".to_string());
                        warn!("Serving stale {} digest (age {})", category, age);
                        Ok(NewsResponse::stale(data.clone()))
                    }
                    (None, _) => Err(AggregatorError::Unavailable {
                        category,
                        details: e.to_string(),
                    }),
                }
            }
        }
    }
}
