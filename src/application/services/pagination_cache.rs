//! Short-lived cache of older history pages.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::domain::entities::{FormattedMessage, MessageId};

/// Maximum number of peers with a cached page.
pub const DEFAULT_PAGE_CACHE_SIZE: usize = 5;

/// How long a cached page stays valid after insertion.
pub const DEFAULT_PAGE_TTL: Duration = Duration::from_secs(10 * 60);

/// A page of older messages fetched for one peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPage {
    pub offset_id: MessageId,
    pub messages: Vec<FormattedMessage>,
}

#[derive(Debug)]
struct Entry {
    page: CachedPage,
    inserted_at: Instant,
}

/// LRU cache of history pages keyed by peer, with a fixed time-to-live.
///
/// A miss or an expired entry is never an error; callers fall back to
/// fetching the page again.
pub struct PaginationCache {
    entries: Mutex<LruCache<String, Entry>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PaginationCache {
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(cap)),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Stores a page, evicting the least recently used key when full.
    pub fn put(&self, key: impl Into<String>, page: CachedPage) {
        self.put_at(key, page, Instant::now());
    }

    /// Returns the page for `key` and marks it most recently used.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<CachedPage> {
        self.get_at(key, Instant::now())
    }

    pub(crate) fn put_at(&self, key: impl Into<String>, page: CachedPage, now: Instant) {
        let key = key.into();
        debug!(key = %key, messages = page.messages.len(), "Caching history page");
        let mut entries = self.entries.lock();
        if let Some((evicted, _)) = entries.push(
            key.clone(),
            Entry {
                page,
                inserted_at: now,
            },
        ) && evicted != key
        {
            debug!(key = %evicted, "Evicted least recently used history page");
        }
    }

    pub(crate) fn get_at(&self, key: &str, now: Instant) -> Option<CachedPage> {
        let mut entries = self.entries.lock();

        let expired = match entries.get(key) {
            Some(entry) => now.saturating_duration_since(entry.inserted_at) >= self.ttl,
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                trace!(key, "History page cache miss");
                return None;
            }
        };

        if expired {
            entries.pop(key);
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(key, "History page expired");
            return None;
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        trace!(key, "History page cache hit");
        entries.get(key).map(|entry| entry.page.clone())
    }

    /// Drops the page for `key`.
    pub fn invalidate(&self, key: &str) {
        self.entries.lock().pop(key);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }
}

impl Default for PaginationCache {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_CACHE_SIZE, DEFAULT_PAGE_TTL)
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Page cache: {} peers, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn page(offset: i64) -> CachedPage {
        CachedPage {
            offset_id: MessageId(offset),
            messages: vec![FormattedMessage::new(offset - 1, "bob", "old", false, Utc::now())],
        }
    }

    #[test]
    fn test_put_and_get() {
        let cache = PaginationCache::default();
        cache.put("1234", page(10));
        assert_eq!(cache.get("1234"), Some(page(10)));
    }

    #[test]
    fn test_miss_is_none() {
        let cache = PaginationCache::default();
        assert_eq!(cache.get("nope"), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_sixth_key_evicts_least_recently_used() {
        let cache = PaginationCache::default();
        for key in 1..=5 {
            cache.put(key.to_string(), page(key));
        }
        // touching "1" makes "2" the least recently used
        assert!(cache.get("1").is_some());

        cache.put("6", page(6));

        assert_eq!(cache.len(), 5);
        assert!(cache.get("2").is_none());
        for key in ["1", "3", "4", "5", "6"] {
            assert!(cache.get(key).is_some(), "{key} should be cached");
        }
    }

    #[test]
    fn test_entries_expire_after_ttl() {
        let cache = PaginationCache::default();
        let start = Instant::now();
        cache.put_at("k", page(1), start);

        let just_before = start + DEFAULT_PAGE_TTL - Duration::from_secs(1);
        assert!(cache.get_at("k", just_before).is_some());

        let after = start + DEFAULT_PAGE_TTL + Duration::from_secs(1);
        assert!(cache.get_at("k", after).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_access_does_not_extend_ttl() {
        let cache = PaginationCache::new(5, Duration::from_secs(60));
        let start = Instant::now();
        cache.put_at("k", page(1), start);

        assert!(cache.get_at("k", start + Duration::from_secs(59)).is_some());
        assert!(cache.get_at("k", start + Duration::from_secs(61)).is_none());
    }

    #[test]
    fn test_reput_refreshes_entry() {
        let cache = PaginationCache::default();
        cache.put("k", page(1));
        cache.put("k", page(2));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k"), Some(page(2)));
    }

    #[test]
    fn test_invalidate() {
        let cache = PaginationCache::default();
        cache.put("k", page(1));
        cache.invalidate("k");
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_stats_display() {
        let cache = PaginationCache::default();
        cache.put("k", page(1));
        let _ = cache.get("k");
        let _ = cache.get("x");
        assert_eq!(
            cache.stats().to_string(),
            "Page cache: 1 peers, 50.0% hit rate (1 hits, 1 misses)"
        );
    }
}
