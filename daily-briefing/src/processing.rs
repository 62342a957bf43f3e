use crate::aggregators::{group_similar_stories, recent_with_fallback};
use crate::rss_utils::text::char_prefix;
use crate::sources::LEGAL_TECH_KEYWORDS;
use crate::types::{Category, FormattedArticle, RawArticle, ScoredArticle};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::debug;

/// Articles returned per digest.
pub const DIGEST_SIZE: usize = 5;

/// Points per distinct corroborating source in the world digest.
pub const CORROBORATION_WEIGHT: f64 = 10.0;

/// Points per legal-tech keyword found in an article.
pub const KEYWORD_WEIGHT: f64 = 10.0;

/// Legal-tech articles sharing this many leading comparison-key characters are duplicates.
pub const DEDUP_PREFIX_CHARS: usize = 50;

/// Turns the merged articles of a category into its ordered digest.
pub trait CategoryProcessor: Send + Sync {
    fn category(&self) -> Category;

    /// Full ranking, best first, before the digest cut.
    fn rank(&self, articles: &[RawArticle], now: DateTime<Utc>) -> Vec<ScoredArticle>;

    fn process(&self, articles: &[RawArticle], now: DateTime<Utc>) -> Vec<FormattedArticle> {
        let ranked = self.rank(articles, now);
        debug!(
            "Ranked {} candidates for {} from {} articles",
            ranked.len(),
            self.category(),
            articles.len()
        );

        ranked
            .into_iter()
            .take(DIGEST_SIZE)
            .map(FormattedArticle::from)
            .collect()
    }
}

/// Recency-windowed, cross-source grouping pipeline.
pub struct WorldProcessor;

impl CategoryProcessor for WorldProcessor {
    fn category(&self) -> Category {
        Category::World
    }

    fn rank(&self, articles: &[RawArticle], now: DateTime<Utc>) -> Vec<ScoredArticle> {
        let recent = recent_with_fallback(articles, now);
        let groups = group_similar_stories(&recent);

        let mut scored: Vec<ScoredArticle> = groups
            .iter()
            .map(|group| {
                let source_count = group.source_count();
                let representative = group.representative();
                ScoredArticle {
                    score: source_count as f64 * CORROBORATION_WEIGHT + representative.trust_bonus(),
                    article: representative.clone(),
                    source_count: Some(source_count),
                }
            })
            .collect();

        sort_by_score_then_recency(&mut scored);
        scored
    }
}

/// Keyword-relevance pipeline with prefix dedup.
pub struct LegalTechProcessor {
    keywords: &'static [&'static str],
}

impl LegalTechProcessor {
    pub const fn new(keywords: &'static [&'static str]) -> Self {
        Self { keywords }
    }

    /// `KEYWORD_WEIGHT` for each keyword contained in the lower-cased title and summary.
    /// Repeats of one keyword count once.
    pub fn keyword_score(&self, article: &RawArticle) -> f64 {
        let text = format!("{} {}", article.title, article.summary).to_lowercase();
        let hits = self
            .keywords
            .iter()
            .filter(|keyword| text.contains(*keyword))
            .count();
        hits as f64 * KEYWORD_WEIGHT
    }
}

impl Default for LegalTechProcessor {
    fn default() -> Self {
        Self::new(LEGAL_TECH_KEYWORDS)
    }
}

impl CategoryProcessor for LegalTechProcessor {
    fn category(&self) -> Category {
        Category::LegalTech
    }

    fn rank(&self, articles: &[RawArticle], _now: DateTime<Utc>) -> Vec<ScoredArticle> {
        let mut scored: Vec<ScoredArticle> = articles
            .iter()
            .map(|article| ScoredArticle {
                score: self.keyword_score(article) + article.trust_bonus(),
                article: article.clone(),
                source_count: None,
            })
            .collect();

        sort_by_score_then_recency(&mut scored);
        dedup_by_title_prefix(scored)
    }
}

static WORLD_PROCESSOR: WorldProcessor = WorldProcessor;
static LEGAL_TECH_PROCESSOR: LegalTechProcessor = LegalTechProcessor::new(LEGAL_TECH_KEYWORDS);

pub fn processor_for(category: Category) -> &'static dyn CategoryProcessor {
    match category {
        Category::World => &WORLD_PROCESSOR,
        Category::LegalTech => &LEGAL_TECH_PROCESSOR,
    }
}

/// Descending score, ties broken by newer `pub_date`. Stable for full ties.
pub fn sort_by_score_then_recency(scored: &mut [ScoredArticle]) {
    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.article.pub_date.cmp(&a.article.pub_date))
    });
}

/// Keep the first article for each comparison-key prefix. Input must already be ranked.
pub fn dedup_by_title_prefix(ranked: Vec<ScoredArticle>) -> Vec<ScoredArticle> {
    let mut seen = HashSet::new();
    let before = ranked.len();

    let unique: Vec<ScoredArticle> = ranked
        .into_iter()
        .filter(|scored| {
            let prefix = char_prefix(&scored.article.comparison_key, DEDUP_PREFIX_CHARS).to_string();
            seen.insert(prefix)
        })
        .collect();

    if unique.len() < before {
        debug!("Removed {} near-duplicate headlines", before - unique.len());
    }

    unique
}
