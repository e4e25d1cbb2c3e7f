//! In-memory TTL cache for shaped catalog responses
//!
//! The catalog API is rate limited and its answers change slowly, so shaped
//! responses are held in-process with per-entry deadlines. Expired entries
//! are dropped lazily on lookup and swept opportunistically on insert.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct Entry<T> {
    value: T,
    deadline: Instant,
}

/// Keyed TTL cache; clones values out on hit
pub struct TtlCache<T: Clone> {
    entries: Mutex<HashMap<String, Entry<T>>>,
    /// Sweep the whole map once it grows past this many entries
    sweep_threshold: usize,
}

impl<T: Clone> TtlCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            sweep_threshold: 1024,
        }
    }

    /// Get a live entry, removing it if expired
    pub async fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock().await;

        match entries.get(key) {
            Some(entry) if entry.deadline > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert a value with a time-to-live
    pub async fn insert(&self, key: impl Into<String>, value: T, ttl: Duration) {
        let mut entries = self.entries.lock().await;

        if entries.len() >= self.sweep_threshold {
            let now = Instant::now();
            entries.retain(|_, entry| entry.deadline > now);
        }

        entries.insert(
            key.into(),
            Entry {
                value,
                deadline: Instant::now() + ttl,
            },
        );
    }
}

impl<T: Clone> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hit_within_ttl() {
        let cache = TtlCache::new();
        cache.insert("k", 42, Duration::from_secs(60)).await;
        assert_eq!(cache.get("k").await, Some(42));
    }

    #[tokio::test]
    async fn test_miss_on_unknown_key() {
        let cache: TtlCache<i32> = TtlCache::new();
        assert_eq!(cache.get("missing").await, None);
    }

    #[tokio::test]
    async fn test_entry_expires() {
        let cache = TtlCache::new();
        cache.insert("k", 1, Duration::from_millis(10)).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_insert_overwrites() {
        let cache = TtlCache::new();
        cache.insert("k", 1, Duration::from_secs(60)).await;
        cache.insert("k", 2, Duration::from_secs(60)).await;
        assert_eq!(cache.get("k").await, Some(2));
    }
}
