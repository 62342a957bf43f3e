use crate::types::RawArticle;
use std::collections::HashSet;

/// Minimum share of the smaller token set that must overlap.
pub const SIMILARITY_THRESHOLD: f64 = 0.5;

/// Tokens of this many characters or fewer are ignored.
const SHORT_TOKEN_CHARS: usize = 3;

/// Articles judged to report the same event.
#[derive(Debug, Clone)]
pub struct StoryGroup<'a> {
    seed: &'a RawArticle,
    others: Vec<&'a RawArticle>,
}

impl<'a> StoryGroup<'a> {
    fn new(seed: &'a RawArticle) -> Self {
        Self {
            seed,
            others: Vec::new(),
        }
    }

    pub fn members(&self) -> impl Iterator<Item = &'a RawArticle> + '_ {
        std::iter::once(self.seed).chain(self.others.iter().copied())
    }

    /// Number of distinct sources in the group.
    pub fn source_count(&self) -> usize {
        self.members()
            .map(|article| article.source.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Article from the most trusted source; earlier members win ties.
    pub fn representative(&self) -> &'a RawArticle {
        self.others.iter().fold(self.seed, |best, &article| {
            if article.source_priority < best.source_priority {
                article
            } else {
                best
            }
        })
    }
}

fn significant_tokens(key: &str) -> HashSet<&str> {
    key.split_whitespace()
        .filter(|token| token.chars().count() > SHORT_TOKEN_CHARS)
        .collect()
}

fn token_sets_similar(a: &HashSet<&str>, b: &HashSet<&str>) -> bool {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return false;
    }
    let overlap = a.intersection(b).count();
    overlap as f64 / smaller as f64 >= SIMILARITY_THRESHOLD
}

/// Token-overlap similarity of two comparison keys.
pub fn is_similar(a: &str, b: &str) -> bool {
    token_sets_similar(&significant_tokens(a), &significant_tokens(b))
}

/// Greedy single-pass clustering in input order.
///
/// Each unvisited article seeds a group and absorbs every later unvisited
/// article similar to the seed. Membership is not transitive: an article
/// similar only to a non-seed member starts or joins another group.
pub fn group_similar_stories(articles: &[RawArticle]) -> Vec<StoryGroup<'_>> {
    let tokens: Vec<HashSet<&str>> = articles
        .iter()
        .map(|article| significant_tokens(&article.comparison_key))
        .collect();

    let mut visited = vec![false; articles.len()];
    let mut groups = Vec::new();

    for (i, seed) in articles.iter().enumerate() {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        let mut group = StoryGroup::new(seed);
        for (j, candidate) in articles.iter().enumerate().skip(i + 1) {
            if !visited[j] && token_sets_similar(&tokens[i], &tokens[j]) {
                visited[j] = true;
                group.others.push(candidate);
            }
        }

        groups.push(group);
    }

    groups
}
