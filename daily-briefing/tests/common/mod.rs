#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use daily_briefing::{AggregatorError, FeedClient, RawArticle, Result, Source};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Network-free feed client serving canned bodies keyed by source name.
pub struct StubFeedClient {
    bodies: HashMap<String, String>,
    failures: HashMap<String, u16>,
    delays_ms: HashMap<String, u64>,
    calls: AtomicUsize,
}

impl StubFeedClient {
    pub fn new() -> Self {
        Self {
            bodies: HashMap::new(),
            failures: HashMap::new(),
            delays_ms: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_feed(mut self, source: &str, body: impl Into<String>) -> Self {
        self.bodies.insert(source.to_string(), body.into());
        self
    }

    pub fn with_failure(mut self, source: &str, status: u16) -> Self {
        self.failures.insert(source.to_string(), status);
        self
    }

    pub fn with_delay(mut self, source: &str, delay_ms: u64) -> Self {
        self.delays_ms.insert(source.to_string(), delay_ms);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedClient for StubFeedClient {
    async fn fetch(&self, source: &Source) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays_ms.get(&source.name) {
            tokio::time::sleep(std::time::Duration::from_millis(*delay)).await;
        }
        if let Some(status) = self.failures.get(&source.name) {
            return Err(AggregatorError::HttpStatus {
                status: *status,
                url: source.url.clone(),
            });
        }

        self.bodies
            .get(&source.name)
            .cloned()
            .ok_or_else(|| AggregatorError::HttpStatus {
                status: 404,
                url: source.url.clone(),
            })
    }

    fn client_name(&self) -> String {
        "stub".to_string()
    }
}

pub fn source(name: &str, priority: u32) -> Source {
    Source::new(name, format!("https://{}.example.com/rss", name.to_lowercase().replace(' ', "-")), priority)
}

/// Minimal RSS 2.0 document with one item per `(title, link, pub_date)`.
pub fn rss_feed(items: &[(&str, &str, DateTime<Utc>)]) -> String {
    let body: String = items
        .iter()
        .map(|(title, link, pub_date)| {
            format!(
                "<item><title>{}</title><link>{}</link><description>About {}</description><pubDate>{}</pubDate></item>",
                title,
                link,
                title,
                pub_date.to_rfc2822()
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>Test</title>{}</channel></rss>"#,
        body
    )
}

/// Article `age_minutes` old relative to `now`.
pub fn article(title: &str, source: &str, priority: u32, age_minutes: i64, now: DateTime<Utc>) -> RawArticle {
    RawArticle {
        title: title.to_string(),
        url: format!("https://news.example.com/{}", title.to_lowercase().replace(' ', "-")),
        summary: format!("Summary of {}", title),
        source: source.to_string(),
        source_priority: priority,
        image_url: None,
        pub_date: now - Duration::minutes(age_minutes),
        comparison_key: title.to_lowercase(),
    }
}
