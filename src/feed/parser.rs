//! Tolerant RSS item scanner.
//!
//! Real-world feeds are malformed often enough that a strict XML parse turns
//! "one bad entity" into "no articles at all". This scanner works by tag-pair
//! matching instead: it segments the document on literal `<item>`/`</item>`
//! delimiters and pattern-searches each block for the three fields it needs.
//! Anything it cannot find degrades to a default; anything it cannot scan
//! degrades to fewer items. Parsing never returns an error.

use chrono::{DateTime, NaiveDate, Utc};

/// Placeholder used when an item block carries no `<title>`.
///
/// Downstream consumers display this literal; it is part of the contract, not
/// a cosmetic choice.
const MISSING_TITLE: &str = "No title";

/// Sentinel assigned when an item block carries no `<link>`. Items holding it
/// are dropped before the sequence is returned — `link` is the unique key
/// downstream, so an item without one is unusable.
const MISSING_LINK: &str = "#";

/// One article reference parsed out of a feed document.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FeedItem {
    pub title: String,
    /// Article URL, used as the item's identity downstream. Never empty and
    /// never the `"#"` sentinel in items returned by [`parse_feed`].
    pub link: String,
    /// Free-form date text from `<pubDate>`; empty when the feed omitted it.
    pub published_at: String,
}

/// Parse a feed document into an ordered sequence of items, newest first.
///
/// Infallible by design: malformed input yields fewer items (or none), never
/// an error. Items without a resolvable link are dropped. Ties and items
/// whose date text cannot be parsed keep their original feed order (the sort
/// is stable and undated items all share one key).
pub fn parse_feed(xml: &str) -> Vec<FeedItem> {
    let mut items: Vec<FeedItem> = scan_items(xml)
        .into_iter()
        .filter(|item| item.link != MISSING_LINK && !item.link.is_empty())
        .collect();

    // Undated items key as "now" so they cannot throw or push well-dated
    // items out of order; captured once so they all tie with each other.
    let now = Utc::now();
    items.sort_by_key(|item| {
        std::cmp::Reverse(parse_pub_date(&item.published_at).unwrap_or(now))
    });
    items
}

/// Segment the document into item blocks.
///
/// Delimiters are matched case-sensitively and non-greedily: the first
/// `</item>` after an `<item>` ends the block. Nested or unbalanced
/// delimiters get no special handling — a trailing unclosed `<item>` is
/// simply not a block.
fn scan_items(xml: &str) -> Vec<FeedItem> {
    const OPEN: &str = "<item>";
    const CLOSE: &str = "</item>";

    let mut items = Vec::new();
    let mut rest = xml;
    while let Some(start) = rest.find(OPEN) {
        let body = &rest[start + OPEN.len()..];
        let Some(end) = body.find(CLOSE) else { break };
        items.push(parse_item(&body[..end]));
        rest = &body[end + CLOSE.len()..];
    }
    items
}

/// Extract the three fields from one item block. Each field is independently
/// optional; absence maps to its documented default.
fn parse_item(block: &str) -> FeedItem {
    let title = tag_text(block, "title")
        .map(strip_cdata)
        .filter(|t| !t.is_empty())
        .unwrap_or(MISSING_TITLE);
    let link = tag_text(block, "link").map(str::trim).unwrap_or(MISSING_LINK);
    let published_at = tag_text(block, "pubDate").map(str::trim).unwrap_or("");

    FeedItem {
        title: title.to_string(),
        link: link.to_string(),
        published_at: published_at.to_string(),
    }
}

/// Inner text of the first `<tag>...</tag>` pair in `block`, if present.
/// Exact-name, case-sensitive match; tags carrying attributes do not count.
fn tag_text<'a>(block: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = block.find(&open)? + open.len();
    let end = start + block[start..].find(&close)?;
    Some(&block[start..end])
}

/// Trim surrounding whitespace and an optional CDATA wrapper.
fn strip_cdata(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix("<![CDATA[").unwrap_or(text);
    let text = text.strip_suffix("]]>").unwrap_or(text);
    text.trim()
}

/// Best-effort date parse for `<pubDate>` text.
///
/// Tries RFC 2822 (the RSS convention), then RFC 3339, then the date-only
/// shapes feeds actually emit. Returns `None` for anything else; the caller
/// treats that as "now" rather than an error.
fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    const DATE_ONLY: &[&str] = &["%a, %d %b %Y", "%d %b %Y", "%Y-%m-%d"];
    for format in DATE_ONLY {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}
