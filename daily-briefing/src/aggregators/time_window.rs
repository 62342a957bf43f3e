use crate::types::RawArticle;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// A trailing recency window ending at `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    hours: i64,
}

/// First window tried by the world digest.
pub const PRIMARY_WINDOW: TimeWindow = TimeWindow::hours(4);

/// Used when the primary window holds too few articles.
pub const WIDE_WINDOW: TimeWindow = TimeWindow::hours(12);

/// Below this many articles the primary window is widened.
pub const MIN_RECENT_ARTICLES: usize = 5;

impl TimeWindow {
    pub const fn hours(hours: i64) -> Self {
        Self { hours }
    }

    pub fn duration(&self) -> Duration {
        Duration::hours(self.hours)
    }

    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration()
    }

    pub fn contains(&self, article: &RawArticle, now: DateTime<Utc>) -> bool {
        article.pub_date >= self.cutoff(now)
    }

    pub fn filter(&self, articles: &[RawArticle], now: DateTime<Utc>) -> Vec<RawArticle> {
        articles
            .iter()
            .filter(|article| self.contains(article, now))
            .cloned()
            .collect()
    }
}

/// Articles from the primary window, or from the wide window when the primary
/// one holds fewer than `MIN_RECENT_ARTICLES`. The wide window is applied to the
/// full input, not to the primary result.
pub fn recent_with_fallback(articles: &[RawArticle], now: DateTime<Utc>) -> Vec<RawArticle> {
    let recent = PRIMARY_WINDOW.filter(articles, now);
    if recent.len() >= MIN_RECENT_ARTICLES {
        return recent;
    }

    let widened = WIDE_WINDOW.filter(articles, now);
    debug!(
        "Only {} articles in the last {}h, widening to {}h ({} articles)",
        recent.len(),
        PRIMARY_WINDOW.hours,
        WIDE_WINDOW.hours,
        widened.len()
    );
    widened
}
