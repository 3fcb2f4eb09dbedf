//! Feed retrieval with scheme normalization and bounded staleness caching.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use super::cache::FeedCache;
use crate::http::read_limited_text;

/// Feed documents larger than this are treated as unreachable.
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// The feed endpoint could not be retrieved.
///
/// Deliberately carries no detail: DNS failures, refused connections, TLS
/// errors, timeouts, and non-success HTTP statuses all collapse into this one
/// kind with one stable message. The distinction is logged for operators but
/// is not part of the caller contract.
#[derive(Debug, Error)]
#[error("Could not fetch the RSS feed. Check the URL and network connection.")]
pub struct FetchError;

/// Retrieves raw feed documents over HTTP.
///
/// Holds a shared [`reqwest::Client`] and, optionally, a [`FeedCache`] whose
/// freshness window short-circuits repeat fetches of the same URL. Without a
/// cache every call goes to the network — construct it that way in tests.
pub struct FeedFetcher {
    client: reqwest::Client,
    timeout: Duration,
    cache: Option<Arc<FeedCache>>,
}

impl FeedFetcher {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            cache: None,
        }
    }

    /// Install a freshness cache. Fetches consult it before the network and
    /// populate it after a successful retrieval.
    pub fn with_cache(mut self, cache: Arc<FeedCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Fetch the raw feed document at `url`.
    ///
    /// The URL gets `https://` prepended when it lacks an `http`/`https`
    /// prefix; no other validation happens before the request goes out.
    ///
    /// # Errors
    ///
    /// [`FetchError`] on any transport failure, timeout, unreadable body, or
    /// non-success status.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let url = normalize_url(url.trim());

        if let Some(cache) = &self.cache {
            if let Some(body) = cache.get(&url) {
                tracing::debug!(url = %url, bytes = body.len(), "serving feed from cache");
                return Ok(body);
            }
        }

        let response = tokio::time::timeout(self.timeout, self.client.get(&*url).send())
            .await
            .map_err(|_| {
                tracing::warn!(url = %url, "feed request timed out");
                FetchError
            })?
            .map_err(|e| {
                tracing::warn!(url = %url, error = %e, "feed request failed");
                FetchError
            })?;

        if !response.status().is_success() {
            tracing::warn!(url = %url, status = %response.status(), "feed endpoint returned error status");
            return Err(FetchError);
        }

        let body = read_limited_text(response, MAX_FEED_SIZE)
            .await
            .map_err(|e| {
                tracing::warn!(url = %url, error = %e, "failed to read feed body");
                FetchError
            })?;

        if let Some(cache) = &self.cache {
            cache.insert(&url, body.clone());
        }

        tracing::debug!(url = %url, bytes = body.len(), "fetched feed");
        Ok(body)
    }
}

/// Prepend `https://` when the URL lacks a scheme prefix. The check is
/// case-insensitive and this is the only pre-request normalization applied.
fn normalize_url(url: &str) -> Cow<'_, str> {
    let has_prefix = |prefix: &str| {
        url.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };
    if has_prefix("http://") || has_prefix("https://") {
        Cow::Borrowed(url)
    } else {
        Cow::Owned(format!("https://{url}"))
    }
}
