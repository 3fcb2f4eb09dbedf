//! Orchestrates extraction and backend dispatch for one article.

use thiserror::Error;

use super::backend::{SummaryBackend, SummaryLength, SummaryRequest, SummaryResult};
use crate::content::{ContentExtractor, ContentFetchError};

/// Returned as a *successful* summary when a page yields too little readable
/// text to be worth sending to the backend. The wording is part of the
/// caller contract: extraction worked, so the caller gets a summary-shaped
/// answer that explains itself.
const THIN_CONTENT_SUMMARY: &str = "Could not extract enough readable content from the article \
to generate a summary. The page might be heavily reliant on JavaScript or have a non-standard \
format.";

/// The backend call failed. One kind for every cause (timeout, transport,
/// failing status, malformed response); the detail is logged, never
/// surfaced.
#[derive(Debug, Error)]
#[error("The AI model failed to generate a summary.")]
pub struct SummarizationError;

/// Everything `summarize` can fail with: the article page was unreachable,
/// or the backend call failed. Parsing-level problems never appear here.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error(transparent)]
    Content(#[from] ContentFetchError),
    #[error(transparent)]
    Summarization(#[from] SummarizationError),
}

/// Produces a summary for one article URL: extract, gate, dispatch.
pub struct Summarizer {
    extractor: ContentExtractor,
    backend: SummaryBackend,
    min_input_chars: usize,
}

impl Summarizer {
    /// `min_input_chars` is the gate below which extraction is considered too
    /// thin to summarize (100 in the default configuration).
    pub fn new(extractor: ContentExtractor, backend: SummaryBackend, min_input_chars: usize) -> Self {
        Self {
            extractor,
            backend,
            min_input_chars,
        }
    }

    /// Summarize the article at `article_url` to the requested length.
    ///
    /// A single attempt end to end: one extraction fetch, one backend call,
    /// no retries. Extraction that succeeds but yields too little text
    /// short-circuits to a diagnostic [`SummaryResult`], which is a success,
    /// not an error.
    ///
    /// # Errors
    ///
    /// [`SummarizeError::Content`] when the article page is unreachable;
    /// [`SummarizeError::Summarization`] when the backend call fails for any
    /// reason.
    pub async fn summarize(
        &self,
        article_url: &str,
        length: SummaryLength,
    ) -> Result<SummaryResult, SummarizeError> {
        let content = self.extractor.extract(article_url).await?;

        let chars = content.text.chars().count();
        if chars < self.min_input_chars {
            tracing::debug!(
                url = %article_url,
                chars,
                minimum = self.min_input_chars,
                "extracted text below summarizable minimum"
            );
            return Ok(SummaryResult {
                summary: THIN_CONTENT_SUMMARY.to_string(),
            });
        }

        tracing::debug!(
            url = %article_url,
            chars,
            truncated = content.truncated,
            length = ?length,
            "dispatching summary request"
        );
        let request = SummaryRequest {
            content: content.text,
            length,
        };
        match self.backend.summarize(&request).await {
            Ok(result) => Ok(result),
            Err(e) => {
                // Operators get the cause; callers get the stable message.
                tracing::warn!(url = %article_url, error = %e, "summary backend call failed");
                Err(SummarizationError.into())
            }
        }
    }
}
