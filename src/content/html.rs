//! Tag-pair scanning over raw HTML.
//!
//! This is deliberately not a DOM. Block removal, region isolation, and
//! paragraph collection all work by case-insensitive tag-pair matching over
//! the raw text, which holds up well on the tag soup real pages serve:
//! an unclosed or overlapping tag costs at most one block, never the whole
//! extraction.
//!
//! Case-insensitive search uses an ASCII-lowercased shadow of the document.
//! ASCII lowercasing is length-preserving, so every offset found in the
//! shadow is valid (and on a char boundary) in the original.

/// Tags whose entire blocks are removed before extraction: navigation,
/// header/footer landmarks, complementary asides, and executable/styling
/// content.
const BOILERPLATE_TAGS: &[&str] = &["nav", "header", "footer", "aside", "script", "style"];

/// Remove every boilerplate block, nested content included.
///
/// A block is an opening tag (attributes allowed) through the *first*
/// matching closing tag; nested same-name tags are not balanced. An opening
/// tag with no closing counterpart is left in place for the later
/// tag-stripping passes to flatten.
pub(crate) fn strip_boilerplate(html: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;

    while pos < html.len() {
        match next_boilerplate_block(&lower, pos) {
            Some((start, end)) => {
                out.push_str(&html[pos..start]);
                pos = end;
            }
            None => {
                out.push_str(&html[pos..]);
                break;
            }
        }
    }
    out
}

/// Earliest removable block at or after `from`, as `(start, end)` offsets.
fn next_boilerplate_block(lower: &str, from: usize) -> Option<(usize, usize)> {
    let mut earliest: Option<(usize, usize)> = None;
    for tag in BOILERPLATE_TAGS {
        if let Some(span) = find_block(lower, from, tag) {
            if earliest.is_none_or(|(start, _)| span.0 < start) {
                earliest = Some(span);
            }
        }
    }
    earliest
}

/// Isolate the primary content region: the inside of the leftmost `<main>`
/// or `<article>` block, ended by the first closing tag of either kind.
/// Documents without such a region are used whole.
pub(crate) fn content_region(html: &str) -> &str {
    let lower = html.to_ascii_lowercase();
    let opening = ["main", "article"]
        .iter()
        .filter_map(|tag| find_open_tag(&lower, 0, tag))
        .min_by_key(|&(start, _)| start);
    let Some((_, open_end)) = opening else {
        return html;
    };

    let closing = ["</main>", "</article>"]
        .iter()
        .filter_map(|close| lower[open_end..].find(close))
        .min();
    match closing {
        Some(offset) => &html[open_end..open_end + offset],
        None => html,
    }
}

/// Collect the inner content of every `<p>` block in document order.
pub(crate) fn paragraphs(region: &str) -> Vec<&str> {
    let lower = region.to_ascii_lowercase();
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some((_, open_end)) = find_open_tag(&lower, pos, "p") {
        let Some(offset) = lower[open_end..].find("</p>") else {
            break;
        };
        found.push(&region[open_end..open_end + offset]);
        pos = open_end + offset + "</p>".len();
    }
    found
}

/// Find `<tag ...>` at or after `from` in the lowercased document, returning
/// `(start_of_tag, end_of_opening_tag)`. Rejects longer names sharing the
/// prefix (`<p` must not match `<pre>`); an opening angle with no closing
/// `>` ends the scan.
fn find_open_tag(lower: &str, from: usize, tag: &str) -> Option<(usize, usize)> {
    let open = format!("<{tag}");
    let mut search = from;

    while let Some(offset) = lower[search..].find(&open) {
        let start = search + offset;
        let after_name = start + open.len();
        if lower
            .as_bytes()
            .get(after_name)
            .is_some_and(|b| b.is_ascii_alphanumeric())
        {
            search = after_name;
            continue;
        }
        let gt = lower[after_name..].find('>')?;
        return Some((start, after_name + gt + 1));
    }
    None
}

/// Find a full `<tag ...>...</tag>` block at or after `from`, first-closing
/// semantics. Openings with no closing tag are skipped.
fn find_block(lower: &str, from: usize, tag: &str) -> Option<(usize, usize)> {
    let close = format!("</{tag}>");
    let mut search = from;

    while let Some((start, open_end)) = find_open_tag(lower, search, tag) {
        if let Some(offset) = lower[open_end..].find(&close) {
            return Some((start, open_end + offset + close.len()));
        }
        search = open_end;
    }
    None
}

/// Remove every `<...>` run, splicing `replacement` in its place. A dangling
/// `<` with no closing angle stays as literal text.
pub(crate) fn strip_tags(fragment: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut rest = fragment;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        match rest[start..].find('>') {
            Some(end) => {
                out.push_str(replacement);
                rest = &rest[start + end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Collapse runs of 3+ consecutive line breaks down to exactly two newlines.
/// `\r\n`, `\n`, and `\r` each count as one break; shorter runs are kept
/// verbatim.
pub(crate) fn collapse_blank_lines(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\n' || bytes[i] == b'\r' {
            let run_start = i;
            let mut breaks = 0;
            while i < bytes.len() && (bytes[i] == b'\n' || bytes[i] == b'\r') {
                if bytes[i] == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
                    i += 2;
                } else {
                    i += 1;
                }
                breaks += 1;
            }
            if breaks >= 3 {
                out.push_str("\n\n");
            } else {
                out.push_str(&text[run_start..i]);
            }
        } else {
            let run_start = i;
            while i < bytes.len() && bytes[i] != b'\n' && bytes[i] != b'\r' {
                i += 1;
            }
            out.push_str(&text[run_start..i]);
        }
    }
    out
}

/// Collapse every run of 2+ whitespace characters to a single space. A lone
/// whitespace character is kept as-is.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_whitespace() && chars.peek().is_some_and(|next| next.is_whitespace()) {
            while chars.peek().is_some_and(|next| next.is_whitespace()) {
                chars.next();
            }
            out.push(' ');
        } else {
            out.push(c);
        }
    }
    out
}

/// Truncate to at most `max` characters (not bytes), reporting whether
/// anything was cut.
pub(crate) fn truncate_chars(mut text: String, max: usize) -> (String, bool) {
    match text.char_indices().nth(max) {
        Some((index, _)) => {
            text.truncate(index);
            (text, true)
        }
        None => (text, false),
    }
}
