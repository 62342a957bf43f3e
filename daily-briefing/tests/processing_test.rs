mod common;

use chrono::{TimeZone, Utc};
use common::{article, init_tracing};
use daily_briefing::aggregators::recent_with_fallback;
use daily_briefing::processing::{DEDUP_PREFIX_CHARS, DIGEST_SIZE};
use daily_briefing::{
    group_similar_stories, is_similar, processor_for, Category, CategoryProcessor, FormattedArticle,
    LegalTechProcessor, RawArticle, WorldProcessor, EMPTY_SUMMARY_FALLBACK,
};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
}

fn titles(articles: &[FormattedArticle]) -> Vec<&str> {
    articles.iter().map(|a| a.title.as_str()).collect()
}

const UNRELATED_TITLES: [&str; 7] = [
    "Volcano erupts near Iceland",
    "Markets slide after earnings",
    "Election results delayed again",
    "Wildfire spreads across valley",
    "Central bank holds rates",
    "Football transfer window closes",
    "Scientists discover distant planet",
];

#[test]
fn similarity_uses_long_token_overlap() {
    assert!(is_similar(
        "senate passes budget bill today",
        "budget bill passes senate vote"
    ));
    assert!(!is_similar("senate passes budget bill", "storm hits coastal towns"));

    // tokens of three characters or fewer never count
    assert!(!is_similar("the war is on", "the war is on"));
    assert!(!is_similar("", "anything here"));
}

#[test]
fn grouping_is_greedy_and_not_transitive() {
    let now = now();
    let articles = vec![
        article("alpha bravo charlie delta", "One", 1, 10, now),
        article("charlie delta echo foxtrot", "Two", 1, 10, now),
        article("echo foxtrot golf hotel", "Three", 1, 10, now),
    ];

    let groups = group_similar_stories(&articles);
    assert_eq!(groups.len(), 2);

    let first: Vec<&str> = groups[0].members().map(|a| a.source.as_str()).collect();
    let second: Vec<&str> = groups[1].members().map(|a| a.source.as_str()).collect();
    assert_eq!(first, vec!["One", "Two"]);
    assert_eq!(second, vec!["Three"]);
}

#[test]
fn group_counts_distinct_sources_and_prefers_trusted_representative() {
    let now = now();
    let articles = vec![
        article("Senate passes budget bill today", "NPR", 2, 10, now),
        article("Budget bill passes senate vote", "Reuters", 1, 12, now),
        article("Senate budget bill passes late", "NPR", 2, 15, now),
    ];

    let groups = group_similar_stories(&articles);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].source_count(), 2);
    assert_eq!(groups[0].representative().source, "Reuters");
}

#[test]
fn corroborated_story_ranks_first() {
    init_tracing();
    let now = now();
    let articles = vec![
        article("Senate passes budget bill today", "Reuters", 1, 30, now),
        article("Local team wins championship final", "AP News", 1, 5, now),
        article("Budget bill passes senate vote", "BBC", 1, 20, now),
        article("Storm hits coastal towns overnight", "NYTimes", 1, 1, now),
        article("Senate budget bill passes narrowly", "NPR", 2, 10, now),
    ];

    let ranked = WorldProcessor.rank(&articles, now);
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].article.title, "Senate passes budget bill today");
    assert_eq!(ranked[0].source_count, Some(3));
    assert!((ranked[0].score - 31.0).abs() < f64::EPSILON);

    // equal scores fall back to the newer article
    assert_eq!(ranked[1].article.title, "Storm hits coastal towns overnight");
    assert_eq!(ranked[2].article.title, "Local team wins championship final");

    let digest = WorldProcessor.process(&articles, now);
    assert_eq!(
        titles(&digest),
        vec![
            "Senate passes budget bill today",
            "Storm hits coastal towns overnight",
            "Local team wins championship final",
        ]
    );
}

#[test]
fn priority_breaks_ties_between_single_source_stories() {
    let now = now();
    let articles = vec![
        article(UNRELATED_TITLES[0], "NPR", 2, 1, now),
        article(UNRELATED_TITLES[1], "Reuters", 1, 100, now),
    ];

    let ranked = WorldProcessor.rank(&articles, now);
    assert_eq!(ranked[0].article.source, "Reuters");
    assert!((ranked[0].score - 11.0).abs() < f64::EPSILON);
    assert!((ranked[1].score - 10.5).abs() < f64::EPSILON);
}

#[test]
fn sparse_primary_window_widens_to_twelve_hours() {
    let now = now();
    let mut articles: Vec<RawArticle> = UNRELATED_TITLES[..3]
        .iter()
        .map(|title| article(title, "Reuters", 1, 60, now))
        .collect();
    articles.extend(
        UNRELATED_TITLES[3..6]
            .iter()
            .map(|title| article(title, "BBC", 1, 6 * 60, now)),
    );
    articles.push(article(UNRELATED_TITLES[6], "NPR", 2, 20 * 60, now));

    let recent = recent_with_fallback(&articles, now);
    assert_eq!(recent.len(), 6);
    assert!(recent.iter().all(|a| a.title != UNRELATED_TITLES[6]));

    let digest = WorldProcessor.process(&articles, now);
    assert_eq!(digest.len(), DIGEST_SIZE);
}

#[test]
fn full_primary_window_is_not_widened() {
    let now = now();
    let mut articles: Vec<RawArticle> = UNRELATED_TITLES[..5]
        .iter()
        .map(|title| article(title, "Reuters", 1, 3 * 60, now))
        .collect();
    articles.push(article(UNRELATED_TITLES[5], "BBC", 1, 8 * 60, now));

    let recent = recent_with_fallback(&articles, now);
    assert_eq!(recent.len(), 5);
    assert!(recent.iter().all(|a| a.source == "Reuters"));
}

#[test]
fn world_digest_of_old_news_is_empty() {
    let now = now();
    let articles = vec![article(UNRELATED_TITLES[0], "Reuters", 1, 13 * 60, now)];
    assert!(WorldProcessor.process(&articles, now).is_empty());
    assert!(WorldProcessor.process(&[], now).is_empty());
}

#[test]
fn keywords_outweigh_source_priority() {
    let now = now();
    let processor = LegalTechProcessor::default();
    let articles = vec![
        article("Firm announces new partners", "Law.com", 1, 10, now),
        article("Legal AI startup raises funds", "Above the Law", 2, 10, now),
        article("Courtroom document review goes digital", "LawSites", 1, 10, now),
    ];

    assert!((processor.keyword_score(&articles[0]) - 0.0).abs() < f64::EPSILON);
    assert!((processor.keyword_score(&articles[1]) - 10.0).abs() < f64::EPSILON);
    assert!((processor.keyword_score(&articles[2]) - 20.0).abs() < f64::EPSILON);

    let ranked = processor.rank(&articles, now);
    let order: Vec<&str> = ranked.iter().map(|s| s.article.source.as_str()).collect();
    assert_eq!(order, vec!["LawSites", "Above the Law", "Law.com"]);
    assert!((ranked[1].score - 10.5).abs() < f64::EPSILON);
    assert!(ranked.iter().all(|s| s.source_count.is_none()));
}

#[test]
fn two_keyword_article_beats_trusted_keyword_free_one() {
    let now = now();
    let articles = vec![
        article("Quarterly earnings at large firm", "Law.com", 1, 1, now),
        article("Legal AI meets ediscovery", "Above the Law", 2, 600, now),
    ];

    let digest = LegalTechProcessor::default().process(&articles, now);
    assert_eq!(digest[0].title, "Legal AI meets ediscovery");
}

#[test]
fn keyword_matching_is_case_insensitive_and_counts_each_keyword_once() {
    let processor = LegalTechProcessor::default();
    let mut item = article("LEGALTECH news: legaltech, LegalTech", "Law.com", 1, 0, now());
    item.summary = String::new();
    assert!((processor.keyword_score(&item) - 10.0).abs() < f64::EPSILON);
}

#[test]
fn near_duplicate_headlines_keep_the_higher_ranked_one() {
    let now = now();
    let kept = "Legal AI adoption surges across Am Law 100 firms this year, survey finds";
    let dropped = "Legal AI adoption surges across Am Law 100 firms this year according to report";
    assert_eq!(
        kept.to_lowercase().chars().take(DEDUP_PREFIX_CHARS).collect::<String>(),
        dropped.to_lowercase().chars().take(DEDUP_PREFIX_CHARS).collect::<String>()
    );

    let articles = vec![
        article(dropped, "Above the Law", 2, 5, now),
        article(kept, "Law.com", 1, 30, now),
        article("Contract AI vendor expands", "LawSites", 2, 10, now),
    ];

    let digest = processor_for(Category::LegalTech).process(&articles, now);
    assert_eq!(digest.len(), 2);
    assert_eq!(digest[0].title, kept);
    assert_eq!(digest[1].title, "Contract AI vendor expands");
}

#[test]
fn legal_tech_ties_prefer_newer_articles() {
    let now = now();
    let articles = vec![
        article("Older courtroom story", "Law.com", 1, 90, now),
        article("Newer courtroom story", "LawSites", 1, 5, now),
    ];

    let digest = LegalTechProcessor::default().process(&articles, now);
    assert_eq!(titles(&digest), vec!["Newer courtroom story", "Older courtroom story"]);
}

#[test]
fn digest_is_capped_and_formatted() {
    let now = now();
    let mut articles: Vec<RawArticle> = UNRELATED_TITLES
        .iter()
        .map(|title| article(title, "Reuters", 1, 10, now))
        .collect();
    articles[0].summary = String::new();
    articles[0].image_url = Some("https://img.example.com/volcano.jpg".to_string());

    let digest = processor_for(Category::World).process(&articles, now);
    assert_eq!(digest.len(), DIGEST_SIZE);

    let volcano = digest
        .iter()
        .find(|a| a.title == UNRELATED_TITLES[0])
        .expect("volcano story in digest");
    assert_eq!(volcano.summary, EMPTY_SUMMARY_FALLBACK);
    assert_eq!(volcano.source, "Reuters");

    let json = serde_json::to_value(volcano).unwrap();
    assert_eq!(json["imageUrl"], "https://img.example.com/volcano.jpg");
    assert_eq!(json["url"], volcano.url.as_str());
    assert_eq!(json.as_object().unwrap().len(), 5);
}

#[test]
fn processors_are_selected_by_category() {
    assert_eq!(processor_for(Category::World).category(), Category::World);
    assert_eq!(processor_for(Category::LegalTech).category(), Category::LegalTech);
}
