use crate::types::Source;

/// Each keyword contained in an article's title + summary adds to its relevance.
pub const LEGAL_TECH_KEYWORDS: &[&str] = &[
    "legal tech",
    "legaltech",
    "legal ai",
    "law firm technology",
    "legal software",
    "contract ai",
    "ediscovery",
    "legal automation",
    "courtroom",
    "legal analytics",
    "document review",
    "legal ops",
    "legal operations",
    "ai lawyer",
    "legal startup",
];

pub fn default_sources() -> Vec<Source> {
    vec![
        Source::new("Law.com", "https://feeds.law.com/LawComNews", 1),
        Source::new("Artificial Lawyer", "https://www.artificiallawyer.com/feed/", 1),
        Source::new("Above the Law", "https://abovethelaw.com/feed/", 2),
        Source::new("LawSites", "https://www.lawnext.com/feed", 1),
    ]
}
