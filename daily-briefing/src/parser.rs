use crate::rss_utils::text::{decode_entities, normalize_text, truncate_chars};
use crate::rss_utils::time::parse_pub_date;
use crate::types::{RawArticle, Source};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use tracing::{debug, info};

/// Summaries are cut to this many characters after normalization.
pub const SUMMARY_MAX_CHARS: usize = 200;

static IMG_SRC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<img[^>]*src=["']([^"']+)["']"#).unwrap());

/// Item sub-fields the extractor collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Guid,
    Description,
    PubDate,
}

impl Field {
    fn from_tag(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Field::Title),
            "link" => Some(Field::Link),
            "guid" | "id" => Some(Field::Guid),
            "description" | "summary" => Some(Field::Description),
            "pubdate" | "published" | "updated" | "dc:date" => Some(Field::PubDate),
            _ => None,
        }
    }
}

/// Raw values of one item before normalization. First non-empty occurrence wins.
#[derive(Debug, Default)]
struct ItemFields {
    title: Option<String>,
    link: Option<String>,
    guid: Option<String>,
    description: Option<String>,
    pub_date: Option<String>,
    media_content: Option<String>,
    enclosure_image: Option<String>,
    media_thumbnail: Option<String>,
}

impl ItemFields {
    fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::Guid => &mut self.guid,
            Field::Description => &mut self.description,
            Field::PubDate => &mut self.pub_date,
        };
        set_first(slot, Some(value));
    }

    fn image_url(&self) -> Option<String> {
        self.media_content
            .clone()
            .or_else(|| self.enclosure_image.clone())
            .or_else(|| self.media_thumbnail.clone())
            .or_else(|| self.description.as_deref().and_then(embedded_image))
    }
}

/// A field element whose content is being collected.
struct OpenField {
    field: Field,
    tag: String,
    buffer: String,
}

/// Event-driven state of the tolerant scan.
#[derive(Default)]
struct ItemScanner {
    current: Option<ItemFields>,
    open: Option<OpenField>,
    items: Vec<ItemFields>,
}

impl ItemScanner {
    fn on_start(&mut self, e: &BytesStart, empty: bool) {
        let name = tag_name(e.name().as_ref());

        if name == "item" || name == "entry" {
            if !empty {
                // an unclosed previous item ends where the next one starts
                self.finish_item();
                self.current = Some(ItemFields::default());
            }
            return;
        }

        let Some(item) = self.current.as_mut() else {
            return;
        };

        if let Some(open) = self.open.as_mut() {
            // markup nested in a field is kept raw for the normalizer and the <img> lookup
            open.buffer.push('<');
            open.buffer.push_str(&String::from_utf8_lossy(e));
            if empty {
                open.buffer.push('/');
            }
            open.buffer.push('>');
            return;
        }

        match name.as_str() {
            "media:content" => set_first(&mut item.media_content, attribute(e, "url")),
            "media:thumbnail" => set_first(&mut item.media_thumbnail, attribute(e, "url")),
            "enclosure" => {
                let is_image = attribute(e, "type")
                    .map(|t| t.to_ascii_lowercase().starts_with("image"))
                    .unwrap_or(false);
                if is_image {
                    set_first(&mut item.enclosure_image, attribute(e, "url"));
                }
            }
            _ => {}
        }

        if let Some(field) = Field::from_tag(&name) {
            if field == Field::Link {
                set_first(&mut item.link, attribute(e, "href"));
            }
            if !empty {
                self.open = Some(OpenField {
                    field,
                    tag: name,
                    buffer: String::new(),
                });
            }
        }
    }

    fn on_end(&mut self, name: &str) {
        if name == "item" || name == "entry" {
            self.finish_item();
            return;
        }

        let closes_field = match self.open.as_mut() {
            Some(open) if open.tag == name => true,
            Some(open) => {
                open.buffer.push_str("</");
                open.buffer.push_str(name);
                open.buffer.push('>');
                false
            }
            None => false,
        };

        if closes_field {
            self.close_field();
        }
    }

    fn on_text(&mut self, text: &str) {
        if let Some(open) = self.open.as_mut() {
            open.buffer.push_str(text);
        }
    }

    fn close_field(&mut self) {
        if let Some(open) = self.open.take() {
            if let Some(item) = self.current.as_mut() {
                item.set(open.field, open.buffer);
            }
        }
    }

    fn finish_item(&mut self) {
        self.close_field();
        if let Some(item) = self.current.take() {
            self.items.push(item);
        }
    }
}

/// Tolerant RSS/Atom item extractor.
///
/// Never fails: malformed or truncated markup degrades field by field, and
/// items lacking a title or a link/guid are skipped.
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_items(
        &self,
        content: &str,
        source: &Source,
        fetched_at: DateTime<Utc>,
    ) -> Vec<RawArticle> {
        debug!("Parsing feed content from {} ({} bytes)", source.name, content.len());

        let items = scan_items(content);
        let found = items.len();

        let articles: Vec<RawArticle> = items
            .into_iter()
            .filter_map(|fields| build_article(fields, source, fetched_at))
            .collect();

        info!(
            "Parsed {} articles from {} ({} items found)",
            articles.len(),
            source.name,
            found
        );

        articles
    }

    pub fn is_valid_feed_content(content: &str) -> bool {
        // Basic validation to check if content might be a valid RSS/Atom feed
        let content_lower = content.to_lowercase();

        content_lower.contains("<rss")
            || content_lower.contains("<feed")
            || content_lower.contains("<channel")
            || content_lower.contains("<item")
    }
}

impl Default for FeedParser {
    fn default() -> Self {
        Self::new()
    }
}

fn scan_items(content: &str) -> Vec<ItemFields> {
    // ASCII lower-casing keeps byte offsets aligned with `content`
    let lowered = content.to_ascii_lowercase();
    let mut scanner = ItemScanner::default();
    let mut offset = 0;

    while let Some(failed_at) = scan_events(&content[offset..], &mut scanner) {
        let error_offset = offset + failed_at;
        scanner.finish_item();

        match next_item_start(lowered.as_bytes(), error_offset + 1) {
            Some(next) => {
                debug!(
                    "Resuming scan at byte {} after malformed markup at byte {}",
                    next, error_offset
                );
                offset = next;
            }
            None => break,
        }
    }

    // a trailing item cut off by the end of input is kept
    scanner.finish_item();
    scanner.items
}

/// Feed events into `scanner` until end of input (`None`) or the first
/// syntax error, whose byte offset within `slice` is returned.
fn scan_events(slice: &str, scanner: &mut ItemScanner) -> Option<usize> {
    let mut reader = Reader::from_str(slice);
    {
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        config.check_comments = false;
    }

    loop {
        let position = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(e)) => scanner.on_start(&e, false),
            Ok(Event::Empty(e)) => scanner.on_start(&e, true),
            Ok(Event::End(e)) => scanner.on_end(&tag_name(e.name().as_ref())),
            Ok(Event::Text(e)) => scanner.on_text(&String::from_utf8_lossy(&e)),
            Ok(Event::CData(e)) => scanner.on_text(&String::from_utf8_lossy(&e)),
            Ok(Event::Eof) => return None,
            Ok(_) => {}
            Err(e) => {
                debug!("Malformed markup at byte {}: {}", position, e);
                return Some(usize::try_from(position).unwrap_or(slice.len()));
            }
        }
    }
}

/// Byte offset of the first `<item` or `<entry` start tag at or after `from`.
fn next_item_start(lowered: &[u8], from: usize) -> Option<usize> {
    (from..lowered.len()).find(|&i| opens_item(&lowered[i..]))
}

fn opens_item(tail: &[u8]) -> bool {
    ["<item", "<entry"].iter().any(|tag| {
        tail.starts_with(tag.as_bytes())
            && match tail.get(tag.len()) {
                Some(&c) => c == b'>' || c == b'/' || c.is_ascii_whitespace(),
                None => false,
            }
    })
}

fn build_article(fields: ItemFields, source: &Source, fetched_at: DateTime<Utc>) -> Option<RawArticle> {
    let raw_title = fields.title.clone().unwrap_or_default();
    let title = normalize_text(&raw_title);

    let url = non_empty(fields.link.as_deref())
        .or_else(|| non_empty(fields.guid.as_deref()))
        .map(xml_unescape);

    let url = match (title.is_empty(), url) {
        (false, Some(url)) => url,
        (_, url) => {
            debug!(
                "Dropping item from {} (title: {:?}, link: {:?})",
                source.name, raw_title, url
            );
            return None;
        }
    };

    let summary = fields
        .description
        .as_deref()
        .map(|d| truncate_chars(&normalize_text(d), SUMMARY_MAX_CHARS))
        .unwrap_or_default();

    let pub_date = fields
        .pub_date
        .as_deref()
        .and_then(parse_pub_date)
        .unwrap_or(fetched_at);

    Some(RawArticle {
        title,
        url,
        summary,
        source: source.name.clone(),
        source_priority: source.priority,
        image_url: fields.image_url(),
        pub_date,
        comparison_key: raw_title.trim().to_lowercase(),
    })
}

/// `<img src>` inside a description, whether the markup is raw (CDATA) or entity-escaped.
fn embedded_image(description: &str) -> Option<String> {
    let first_src = |text: &str| {
        IMG_SRC_RE
            .captures(text)
            .and_then(|c| c.get(1).map(|m| xml_unescape(m.as_str())))
    };

    first_src(description).or_else(|| first_src(&decode_entities(description)))
}

fn attribute(e: &BytesStart, key: &str) -> Option<String> {
    let mut attributes = e.attributes();
    attributes.with_checks(false);

    attributes
        .flatten()
        .find(|attr| attr.key.as_ref().eq_ignore_ascii_case(key.as_bytes()))
        .map(|attr| xml_unescape(&String::from_utf8_lossy(&attr.value)))
        .filter(|value| !value.is_empty())
}

fn set_first(slot: &mut Option<String>, value: Option<String>) {
    let occupied = slot.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false);
    if !occupied {
        if let Some(value) = value {
            *slot = Some(value);
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn xml_unescape(raw: &str) -> String {
    let trimmed = raw.trim();
    unescape(trimmed)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| trimmed.to_string())
}

fn tag_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}
