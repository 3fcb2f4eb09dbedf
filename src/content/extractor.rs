//! Article retrieval and readable-text extraction.

use std::time::Duration;

use thiserror::Error;

use super::html;
use crate::http::read_limited_text;

/// Article pages larger than this are treated as unreachable.
const MAX_PAGE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Below this many `<p>` blocks the page likely doesn't use paragraph markup
/// (or isn't an article), and extraction falls back to whole-region text.
const MIN_PARAGRAPH_BLOCKS: usize = 3;

/// The article page could not be retrieved.
///
/// Like the feed fetch error, this is a single collapsed kind: transport
/// faults and failing statuses share one stable message, with the detail
/// going to the logs. "Content too short" is never an error here — that
/// judgment belongs to the summarization layer.
#[derive(Debug, Error)]
#[error("Could not fetch article content.")]
pub struct ContentFetchError;

/// Plain-text article body, bounded to a fixed maximum length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub text: String,
    /// True when the pre-truncation text exceeded the length bound.
    pub truncated: bool,
}

/// Fetches an article page and reduces its HTML to bounded plain text.
pub struct ContentExtractor {
    client: reqwest::Client,
    timeout: Duration,
    max_chars: usize,
}

impl ContentExtractor {
    /// `max_chars` is the output bound in characters (15,000 in the default
    /// configuration).
    pub fn new(client: reqwest::Client, timeout: Duration, max_chars: usize) -> Self {
        Self {
            client,
            timeout,
            max_chars,
        }
    }

    /// Retrieve `url` and extract its readable body text.
    ///
    /// # Errors
    ///
    /// [`ContentFetchError`] when the page is unreachable, times out, or
    /// returns a non-success status. Extraction itself cannot fail — any
    /// HTML, however broken, produces some (possibly empty) text.
    pub async fn extract(&self, url: &str) -> Result<ExtractedContent, ContentFetchError> {
        let response = tokio::time::timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| {
                tracing::warn!(url = %url, "article request timed out");
                ContentFetchError
            })?
            .map_err(|e| {
                tracing::warn!(url = %url, error = %e, "article request failed");
                ContentFetchError
            })?;

        if !response.status().is_success() {
            tracing::warn!(url = %url, status = %response.status(), "article returned error status");
            return Err(ContentFetchError);
        }

        let page = read_limited_text(response, MAX_PAGE_SIZE)
            .await
            .map_err(|e| {
                tracing::warn!(url = %url, error = %e, "failed to read article body");
                ContentFetchError
            })?;

        Ok(self.extract_from_html(&page))
    }

    /// Reduce raw HTML to readable text.
    ///
    /// Pipeline: strip boilerplate blocks, isolate the `<main>`/`<article>`
    /// region, then either join paragraph contents (when the page uses
    /// paragraph markup) or fall back to whitespace-collapsed whole-region
    /// text. The result is truncated to the configured character bound.
    pub fn extract_from_html(&self, page: &str) -> ExtractedContent {
        let stripped = html::strip_boilerplate(page);
        let region = html::content_region(&stripped);
        let blocks = html::paragraphs(region);

        let text = if blocks.len() >= MIN_PARAGRAPH_BLOCKS {
            let joined = blocks
                .iter()
                .map(|block| html::strip_tags(block, ""))
                .collect::<Vec<_>>()
                .join("\n");
            html::collapse_blank_lines(&joined).trim().to_string()
        } else {
            tracing::debug!(
                paragraphs = blocks.len(),
                "too few paragraph blocks, falling back to whole-region text"
            );
            html::collapse_whitespace(&html::strip_tags(region, " "))
                .trim()
                .to_string()
        };

        let (text, truncated) = html::truncate_chars(text, self.max_chars);
        ExtractedContent { text, truncated }
    }
}
