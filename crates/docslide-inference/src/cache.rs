//! In-process response cache with per-entry expiry.
//!
//! Entries are evicted lazily: an expired entry is removed when a read finds
//! it, never by a background sweep. There is no capacity bound and no LRU
//! eviction, so a long-lived process with many distinct keys grows without
//! limit.
//!
//! Each call locks the store for its own duration only. A `get` followed by
//! a `set` is not atomic, so two concurrent misses on one key both reach the
//! provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use docslide_core::Envelope;

/// Cache of successful envelopes keyed by provider, operation and payload hash.
pub type ResponseCache = TtlCache<Envelope>;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Key/value store with optional time-to-live per entry.
#[derive(Debug)]
pub struct TtlCache<V> {
    store: Mutex<HashMap<String, CacheEntry<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self {
            store: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
}

impl<V: Clone> TtlCache<V> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        // A panic while holding the lock cannot leave an entry half-written.
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store `value` under `key`.
    ///
    /// `None` or a zero `ttl` stores the entry without expiry.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        let expires_at = ttl.filter(|t| !t.is_zero()).map(|t| Instant::now() + t);
        debug!(cache_key = %key, ttl = ?ttl, "Cache SET");
        self.lock().insert(key, CacheEntry { value, expires_at });
    }

    /// Fetch a live entry, removing it if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut store = self.lock();
        let expired = match store.get(key) {
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            Some(entry) => entry.expires_at.is_some_and(|at| at <= Instant::now()),
        };

        if expired {
            store.remove(key);
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(cache_key = %key, "Cache EXPIRED");
            return None;
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        store.get(key).map(|entry| entry.value.clone())
    }

    /// Remove one entry, or every entry when `key` is `None`.
    pub fn clear(&self, key: Option<&str>) {
        let mut store = self.lock();
        match key {
            Some(k) => {
                store.remove(k);
            }
            None => store.clear(),
        }
    }

    /// Number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_without_ttl_never_expires() {
        let cache = TtlCache::new();
        cache.set("k", 1, None);
        tokio::time::advance(Duration::from_secs(86_400)).await;
        assert_eq!(cache.get("k"), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_means_no_expiry() {
        let cache = TtlCache::new();
        cache.set("k", "v".to_string(), Some(Duration::ZERO));
        tokio::time::advance(Duration::from_secs(3600)).await;
        assert_eq!(cache.get("k").as_deref(), Some("v"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = TtlCache::new();
        cache.set("k", 7, Some(Duration::from_millis(1000)));

        tokio::time::advance(Duration::from_millis(999)).await;
        assert_eq!(cache.get("k"), Some(7));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(cache.get("k"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_removed_on_read() {
        let cache = TtlCache::new();
        cache.set("k", 1, Some(Duration::from_millis(10)));
        tokio::time::advance(Duration::from_millis(20)).await;

        assert_eq!(cache.len(), 1, "no proactive sweep");
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_overwrites_existing_entry() {
        let cache = TtlCache::new();
        cache.set("k", 1, None);
        cache.set("k", 2, None);
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_single_key() {
        let cache = TtlCache::new();
        cache.set("a", 1, None);
        cache.set("b", 2, None);
        cache.clear(Some("a"));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
    }

    #[test]
    fn test_clear_all() {
        let cache = TtlCache::new();
        cache.set("a", 1, None);
        cache.set("b", 2, None);
        cache.clear(None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_stats_count_hits_and_misses() {
        let cache = TtlCache::new();
        cache.set("a", 1, None);
        cache.get("a");
        cache.get("a");
        cache.get("missing");
        assert_eq!(cache.stats(), CacheStats { hits: 2, misses: 1 });
    }
}
