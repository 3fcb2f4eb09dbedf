//! In-memory freshness cache for fetched feed documents.
//!
//! Keyed by the exact request URL with a bounded staleness window. The cache
//! is an explicit component handed to the fetcher rather than ambient state,
//! so tests (and callers who want every fetch to hit the network) can simply
//! not install one.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::Duration;

use lru::LruCache;
use tokio::time::Instant;

struct CachedFeed {
    body: String,
    fetched_at: Instant,
}

/// URL-keyed cache of raw feed bodies with a freshness window.
///
/// Entries older than the window are never served — [`get`](Self::get)
/// evicts them on sight. Capacity is bounded (LRU) so a caller cycling
/// through many feeds cannot grow the map without limit. Safe for concurrent
/// use; the lock only guards map operations, never I/O.
pub struct FeedCache {
    ttl: Duration,
    entries: Mutex<LruCache<String, CachedFeed>>,
}

impl FeedCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            ttl,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Return the cached body for `url` if it is still within the freshness
    /// window. Expired entries are dropped, not returned.
    pub fn get(&self, url: &str) -> Option<String> {
        let mut entries = self.lock();
        match entries.get(url) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => Some(entry.body.clone()),
            Some(_) => {
                entries.pop(url);
                None
            }
            None => None,
        }
    }

    /// Store (or replace) the body for `url`, stamped with the current time.
    pub fn insert(&self, url: &str, body: String) {
        let entry = CachedFeed {
            body,
            fetched_at: Instant::now(),
        };
        self.lock().put(url.to_string(), entry);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, CachedFeed>> {
        // A poisoned lock means a panic mid-map-operation; the map itself is
        // still structurally sound, so recover rather than propagate.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
