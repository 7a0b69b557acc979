//! Time-bounded dedup cache for idempotent replay suppression.
//!
//! Maps a job fingerprint to its previously computed result so identical
//! payloads arriving within the TTL skip the expensive path entirely. A miss
//! never changes an answer, only whether the slow path is re-run — this is
//! replay suppression, not correctness-critical caching.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

struct Entry<V> {
    inserted_at: Instant,
    value: V,
}

/// Content-addressed cache with a TTL and a bounded capacity.
///
/// All operations serialize on a single lock and hold it for O(1) work;
/// no external calls ever happen under the lock.
pub struct DedupCache<V> {
    ttl: Duration,
    capacity: usize,
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V: Clone> DedupCache<V> {
    /// Creates a cache holding at most `capacity` entries, each live for `ttl`.
    ///
    /// A zero capacity is clamped to one entry.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Looks up `key`, treating entries older than the TTL as absent.
    ///
    /// A stale entry found here is purged on the spot.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() <= self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `value` under `key`.
    ///
    /// When inserting a new key at capacity, the entry with the oldest
    /// insertion time is evicted first (ties broken arbitrarily).
    pub fn insert(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut entries = self.entries.lock();
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }
        entries.insert(
            key,
            Entry {
                inserted_at: Instant::now(),
                value,
            },
        );
    }

    /// Number of live-or-stale entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_within_ttl() {
        let cache = DedupCache::new(4, Duration::from_secs(60));
        cache.insert("a", 1u32);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn expired_entry_is_a_miss_and_purged() {
        let cache = DedupCache::new(4, Duration::from_millis(20));
        cache.insert("a", 1u32);
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get("a"), None);
        // The stale read removed the entry.
        assert!(cache.is_empty());
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let cache = DedupCache::new(3, Duration::from_secs(60));
        cache.insert("first", 1u32);
        std::thread::sleep(Duration::from_millis(5));
        cache.insert("second", 2);
        std::thread::sleep(Duration::from_millis(5));
        cache.insert("third", 3);
        cache.insert("fourth", 4);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("first"), None);
        assert_eq!(cache.get("second"), Some(2));
        assert_eq!(cache.get("third"), Some(3));
        assert_eq!(cache.get("fourth"), Some(4));
    }

    #[test]
    fn reinserting_existing_key_does_not_evict() {
        let cache = DedupCache::new(2, Duration::from_secs(60));
        cache.insert("a", 1u32);
        cache.insert("b", 2);
        cache.insert("a", 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(3));
        assert_eq!(cache.get("b"), Some(2));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let cache = DedupCache::new(0, Duration::from_secs(60));
        cache.insert("a", 1u32);
        assert_eq!(cache.get("a"), Some(1));
        cache.insert("b", 2);
        assert_eq!(cache.len(), 1);
    }
}
