use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Digest categories served by the briefing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    World,
    LegalTech,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::World, Category::LegalTech];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::World => "world",
            Category::LegalTech => "legal-tech",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AggregatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "world" => Ok(Category::World),
            "legal-tech" => Ok(Category::LegalTech),
            other => Err(AggregatorError::InvalidCategory(other.to_string())),
        }
    }
}

/// A configured origin feed. Priority 1 is the most trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub url: String,
    pub priority: u32,
}

impl Source {
    pub fn new(name: impl Into<String>, url: impl Into<String>, priority: u32) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            // priority is a divisor in scoring
            priority: priority.max(1),
        }
    }
}

/// One feed item after extraction and normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawArticle {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub source: String,
    pub source_priority: u32,
    pub image_url: Option<String>,
    pub pub_date: DateTime<Utc>,
    /// Lower-cased raw title. Used for grouping and dedup only.
    pub comparison_key: String,
}

impl RawArticle {
    /// Trust tie-break shared by both category pipelines. Always in (0, 1].
    pub fn trust_bonus(&self) -> f64 {
        1.0 / f64::from(self.source_priority.max(1))
    }
}

/// An article plus the pipeline-specific ranking metadata.
#[derive(Debug, Clone)]
pub struct ScoredArticle {
    pub article: RawArticle,
    pub score: f64,
    /// Distinct sources corroborating the story (world pipeline only).
    pub source_count: Option<usize>,
}

/// The only article shape handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedArticle {
    pub title: String,
    pub summary: String,
    pub source: String,
    pub url: String,
    pub image_url: Option<String>,
}

pub const EMPTY_SUMMARY_FALLBACK: &str = "No summary available.";

impl From<&RawArticle> for FormattedArticle {
    fn from(article: &RawArticle) -> Self {
        let summary = if article.summary.is_empty() {
            EMPTY_SUMMARY_FALLBACK.to_string()
        } else {
            article.summary.clone()
        };

        Self {
            title: article.title.clone(),
            summary,
            source: article.source.clone(),
            url: article.url.clone(),
            image_url: article.image_url.clone(),
        }
    }
}

impl From<ScoredArticle> for FormattedArticle {
    fn from(scored: ScoredArticle) -> Self {
        (&scored.article).into()
    }
}

/// Result of a `get_news` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsResponse {
    pub articles: Vec<FormattedArticle>,
    pub cached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale: Option<bool>,
}

impl NewsResponse {
    pub fn fresh(articles: Vec<FormattedArticle>) -> Self {
        Self { articles, cached: false, stale: None }
    }

    pub fn cached(articles: Vec<FormattedArticle>) -> Self {
        Self { articles, cached: true, stale: None }
    }

    pub fn stale(articles: Vec<FormattedArticle>) -> Self {
        Self { articles, cached: true, stale: Some(true) }
    }

    pub fn is_stale(&self) -> bool {
        self.stale.unwrap_or(false)
    }

    /// JSON wire form: camelCase fields, `stale` omitted unless set.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "DailyBriefing/1.0".to_string(),
            timeout_seconds: 10,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported feed URL scheme: {url}")]
    UnsupportedScheme { url: String },

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("No sources configured for category {category}")]
    NoSources { category: Category },

    #[error("Invalid category '{0}'. Use 'world' or 'legal-tech'")]
    InvalidCategory(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch news for {category}: {details}")]
    Unavailable { category: Category, details: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
