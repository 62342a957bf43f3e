//! Text, time and URL helpers shared by the extractor and the pipelines

/// Plain-text normalization of feed markup
pub mod text {
    use once_cell::sync::Lazy;
    use regex::Regex;

    /// Tag-shaped spans only, so decoded comparisons such as `< 5%` or `<$1bn` survive.
    static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[A-Za-z!?][^>]*>").unwrap());

    /// Closed set of entities decoded by `normalize_text`. Anything else is left as-is.
    const ENTITIES: &[(&str, &str)] = &[
        ("&amp;", "&"),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&#8217;", "'"),
        ("&#8216;", "'"),
        ("&#8220;", "\""),
        ("&#8221;", "\""),
        ("&#8211;", "\u{2013}"),
        ("&#8212;", "\u{2014}"),
        ("&#8230;", "..."),
        ("&rsquo;", "'"),
        ("&lsquo;", "'"),
        ("&rdquo;", "\""),
        ("&ldquo;", "\""),
        ("&ndash;", "\u{2013}"),
        ("&mdash;", "\u{2014}"),
        ("&hellip;", "..."),
        ("&nbsp;", " "),
    ];

    /// Strip tags, decode the known entities, collapse whitespace.
    ///
    /// The pass is repeated until nothing changes, so decoded `&lt;b&gt;` is
    /// stripped too and `normalize_text(normalize_text(x)) == normalize_text(x)`.
    pub fn normalize_text(input: &str) -> String {
        let mut current = normalize_pass(input);
        loop {
            // every pass that changes the text shortens it or only rewrites whitespace
            let next = normalize_pass(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn normalize_pass(input: &str) -> String {
        let stripped = TAG_RE.replace_all(input, "");
        let decoded = decode_entities(&stripped);
        collapse_whitespace(&decoded)
    }

    /// Decode only the entities in the fixed table, left to right.
    pub fn decode_entities(input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(pos) = rest.find('&') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            match ENTITIES.iter().find(|(entity, _)| tail.starts_with(entity)) {
                Some((entity, replacement)) => {
                    out.push_str(replacement);
                    rest = &tail[entity.len()..];
                }
                None => {
                    out.push('&');
                    rest = &tail[1..];
                }
            }
        }

        out.push_str(rest);
        out
    }

    pub fn collapse_whitespace(input: &str) -> String {
        input.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Truncate to at most `max_chars` characters, never splitting a character.
    pub fn truncate_chars(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => text[..byte_idx].trim_end().to_string(),
            None => text.to_string(),
        }
    }

    /// First `max_chars` characters, used as a dedup prefix.
    pub fn char_prefix(text: &str, max_chars: usize) -> &str {
        match text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => &text[..byte_idx],
            None => text,
        }
    }
}

/// Time utilities for publication dates and cache ages
pub mod time {
    use chrono::{DateTime, Duration, Utc};

    /// Parse an item date. RFC 2822 is what RSS uses; RFC 3339 covers Atom and `dc:date`.
    pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        DateTime::parse_from_rfc2822(trimmed)
            .or_else(|_| DateTime::parse_from_rfc3339(trimmed))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// True while `timestamp` is younger than `ttl` at `now`.
    pub fn is_within(timestamp: DateTime<Utc>, ttl: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(timestamp) < ttl
    }

    /// Format duration in human-readable form
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.num_seconds();

        if total_seconds < 60 {
            format!("{}s", total_seconds)
        } else if total_seconds < 3600 {
            format!("{}m", total_seconds / 60)
        } else if total_seconds < 86400 {
            format!("{}h", total_seconds / 3600)
        } else {
            format!("{}d", total_seconds / 86400)
        }
    }
}

/// URL utilities for RSS feeds
pub mod url {
    use crate::types::{AggregatorError, Result};
    use url::Url;

    /// Parse a feed URL and require an http(s) scheme.
    pub fn ensure_feed_url(url_str: &str) -> Result<Url> {
        let url = Url::parse(url_str)?;
        if url.scheme() == "http" || url.scheme() == "https" {
            Ok(url)
        } else {
            Err(AggregatorError::UnsupportedScheme {
                url: url_str.to_string(),
            })
        }
    }

    /// Validate RSS feed URL format
    pub fn is_valid_rss_url(url_str: &str) -> bool {
        ensure_feed_url(url_str).is_ok()
    }
}
