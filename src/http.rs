//! Shared HTTP plumbing: bounded streaming body reads.
//!
//! Every fetch path in the pipeline (feed, article page, backend response)
//! reads its body through [`read_limited_text`] so a misbehaving remote can
//! never balloon memory.

use futures::StreamExt;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum BodyError {
    /// Response body exceeded the caller's size limit.
    #[error("response exceeds {0} bytes")]
    TooLarge(usize),
    /// Network-level error while streaming the body.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Read a response body as text, enforcing `limit` bytes.
///
/// Checks `Content-Length` up front when present, then streams chunks with a
/// running cap. Bytes that are not valid UTF-8 are decoded lossily — feeds
/// and article pages with broken encodings degrade to replacement characters
/// rather than failing the whole request.
pub(crate) async fn read_limited_text(
    response: reqwest::Response,
    limit: usize,
) -> Result<String, BodyError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(BodyError::TooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(BodyError::TooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
