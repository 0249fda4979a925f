//! Short-lived result cache.
//!
//! An explicitly constructed instance with per-entry absolute expiry,
//! shared across concurrent requests behind a lock. An entry past its
//! expiry is treated as absent and evicted on the read that finds it;
//! it is never served. Payloads are stored serialized so one cache can
//! hold every resource class.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

struct CacheEntry {
    payload: serde_json::Value,
    expires_at: Instant,
}

/// Time-boxed key→value store.
///
/// Keys are resource-class-qualified strings (`video:<slug>`,
/// `trending:<period>:<page>`, ...). When constructed disabled, reads
/// always miss and writes are no-ops.
pub struct ResultCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    enabled: bool,
}

impl ResultCache {
    /// Create an empty cache.
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            enabled,
        }
    }

    /// Look up a key. Expired entries are evicted, not served.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.enabled {
            return None;
        }

        let mut entries = self.entries.write().unwrap();
        let entry = entries.get(key)?;
        if entry.expires_at <= Instant::now() {
            debug!(key = %key, "cache entry expired, evicting");
            entries.remove(key);
            return None;
        }

        let payload = entry.payload.clone();
        match serde_json::from_value(payload) {
            Ok(value) => Some(value),
            Err(_) => {
                // Payload no longer matches the requested shape
                entries.remove(key);
                None
            }
        }
    }

    /// Store a value under a key with a time-to-live.
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        if !self.enabled {
            return;
        }
        let Ok(payload) = serde_json::to_value(value) else {
            return;
        };
        self.entries.write().unwrap().insert(
            key.to_string(),
            CacheEntry {
                payload,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get_round_trips() {
        let cache = ResultCache::new(true);
        cache.set("video:ep-1", &vec![1u32, 2, 3], Duration::from_secs(1));
        assert_eq!(cache.get::<Vec<u32>>("video:ep-1"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_expired_entries_miss_and_evict() {
        let cache = ResultCache::new(true);
        cache.set("k", &"v".to_string(), Duration::from_millis(20));
        assert_eq!(cache.get::<String>("k"), Some("v".to_string()));

        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.get::<String>("k"), None);
        assert!(cache.is_empty()); // evicted on read, not just hidden
    }

    #[test]
    fn test_overwrite_replaces_entry() {
        let cache = ResultCache::new(true);
        cache.set("k", &1u32, Duration::from_secs(5));
        cache.set("k", &2u32, Duration::from_secs(5));
        assert_eq!(cache.get::<u32>("k"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_disabled_cache_never_stores() {
        let cache = ResultCache::new(false);
        cache.set("k", &1u32, Duration::from_secs(5));
        assert_eq!(cache.get::<u32>("k"), None);
        assert!(cache.is_empty());
    }
}
