pub mod types;
pub mod traits;
pub mod config;
pub mod fetcher;
pub mod parser;
pub mod rss_utils;
pub mod aggregator;
pub mod aggregators;
pub mod processing;
pub mod sources;
pub mod state;
pub mod digest;

pub use types::*;
pub use traits::FeedClient;
pub use config::BriefingConfig;
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use aggregator::RssAggregator;
pub use aggregators::{group_similar_stories, is_similar, StoryGroup};
pub use processing::{processor_for, CategoryProcessor, LegalTechProcessor, WorldProcessor};
pub use sources::SourceCatalog;
pub use state::{CacheEntry, CacheState, NewsCache};
pub use digest::BriefingService;
