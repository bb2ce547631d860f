// In-process cache store.
// Entries expire lazily: an expired entry is dropped the next time it is read.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::RwLock;
use serde_json::Value;
use tokio::time::Instant;

use super::CacheStore;

struct Entry {
    value: Value,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Thread-safe in-memory [`CacheStore`].
///
/// Uses the tokio clock, so paused-time tests can advance past a TTL.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        // Re-check under the write lock: another writer may have refreshed it.
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
        }
        None
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().insert(key.to_string(), entry);
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryCache::new();
        cache.set("labels_acme_widgets", json!(["bug"]), Duration::from_secs(60));

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("labels_acme_widgets"), Some(json!(["bug"])));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("labels_acme_widgets"), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = MemoryCache::new();
        cache.set("short", json!(1), Duration::from_secs(10));
        cache.set("long", json!(2), Duration::from_secs(100));

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("long"));
    }

    #[test]
    fn test_set_overwrites_and_remove() {
        let cache = MemoryCache::new();
        let ttl = Duration::from_secs(300);
        cache.set("issue_acme_widgets_1", json!({"title": "old"}), ttl);
        cache.set("issue_acme_widgets_1", json!({"title": "new"}), ttl);
        assert_eq!(cache.get("issue_acme_widgets_1"), Some(json!({"title": "new"})));

        cache.remove("issue_acme_widgets_1");
        cache.remove("missing");
        assert_eq!(cache.get("issue_acme_widgets_1"), None);
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(MemoryCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for j in 0..100 {
                        let key = format!("k{}", j % 10);
                        cache.set(&key, json!(i), Duration::from_secs(60));
                        let _ = cache.get(&key);
                        if j % 7 == 0 {
                            cache.remove(&key);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 10);
    }
}
