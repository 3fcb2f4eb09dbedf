//! Wires the pipeline stages together behind the two caller-facing
//! operations: load a feed, summarize an article.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use secrecy::SecretString;
use url::Url;

use crate::config::Config;
use crate::content::ContentExtractor;
use crate::feed::{parse_feed, FeedCache, FeedFetcher, FeedItem, FetchError};
use crate::summarizer::{SummarizeError, Summarizer, SummaryBackend, SummaryLength, SummaryResult};

/// Env var consulted for the backend API key; takes precedence over the
/// config file.
const API_KEY_ENV: &str = "BRIEF_BACKEND_API_KEY";

/// The assembled pipeline. Every invocation is independent; concurrent
/// calls share nothing but the HTTP connection pool and the optional feed
/// cache.
pub struct Pipeline {
    fetcher: FeedFetcher,
    summarizer: Summarizer,
}

impl Pipeline {
    /// Build all components from configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .context("failed to build HTTP client")?;
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let mut fetcher = FeedFetcher::new(client.clone(), timeout);
        if config.feed_cache_ttl_secs > 0 {
            let cache = FeedCache::new(
                Duration::from_secs(config.feed_cache_ttl_secs),
                config.feed_cache_capacity,
            );
            fetcher = fetcher.with_cache(Arc::new(cache));
        }

        let extractor = ContentExtractor::new(client.clone(), timeout, config.max_article_chars);

        let endpoint = Url::parse(&config.backend_url)
            .with_context(|| format!("invalid backend URL: {}", config.backend_url))?;
        let mut backend = SummaryBackend::new(client, endpoint, timeout);
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .or_else(|| config.backend_api_key.clone());
        if let Some(key) = api_key {
            backend = backend.with_api_key(SecretString::from(key));
        }

        Ok(Self {
            fetcher,
            summarizer: Summarizer::new(extractor, backend, config.min_summary_input_chars),
        })
    }

    /// Fetch and parse the feed at `url`, newest items first.
    ///
    /// # Errors
    ///
    /// [`FetchError`] when the feed endpoint is unreachable or returns a
    /// failing status. A reachable but malformed feed is not an error; it
    /// degrades to fewer (or zero) items.
    pub async fn load_feed(&self, url: &str) -> Result<Vec<FeedItem>, FetchError> {
        let document = self.fetcher.fetch(url).await?;
        let items = parse_feed(&document);
        tracing::info!(url = %url, items = items.len(), "loaded feed");
        Ok(items)
    }

    /// Fetch, extract, and summarize the article at `article_url`.
    ///
    /// Always re-fetches and re-extracts; summaries are never cached.
    pub async fn summarize(
        &self,
        article_url: &str,
        length: SummaryLength,
    ) -> Result<SummaryResult, SummarizeError> {
        self.summarizer.summarize(article_url, length).await
    }
}
