use crate::types::Source;

/// Wire services and national outlets ranked for the world digest.
pub fn default_sources() -> Vec<Source> {
    vec![
        Source::new("Reuters", "https://feeds.reuters.com/reuters/topNews", 1),
        Source::new("AP News", "https://rsshub.app/apnews/topics/apf-topnews", 1),
        Source::new("BBC", "https://feeds.bbci.co.uk/news/world/rss.xml", 1),
        Source::new("NYTimes", "https://rss.nytimes.com/services/xml/rss/nyt/World.xml", 1),
        Source::new("NPR", "https://feeds.npr.org/1001/rss.xml", 2),
    ]
}
