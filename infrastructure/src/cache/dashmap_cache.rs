//! Concurrent in-memory expiring cache.

use dashmap::DashMap;
use fleet_application::ports::expiring_cache::ExpiringCache;
use std::hash::Hash;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn new(value: V, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// [`ExpiringCache`] over a [`DashMap`] with per-entry deadlines.
///
/// Expired entries are invisible to `get` and dropped lazily, on access or
/// during a `keys_near_expiry` sweep.
pub struct DashMapExpiringCache<K, V>
where
    K: Eq + Hash,
{
    entries: DashMap<K, Entry<V>>,
}

impl<K, V> Default for DashMapExpiringCache<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<K, V> DashMapExpiringCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn purge_expired(&self) {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(removed, "Expired cache entries purged");
        }
    }
}

impl<K, V> ExpiringCache<K, V> for DashMapExpiringCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn put(&self, key: K, value: V, ttl: Option<Duration>) {
        self.entries.insert(key, Entry::new(value, ttl));
    }

    fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Some(entry.value.clone());
            }
        } else {
            return None;
        }

        // A concurrent put may have renewed the entry since the read above.
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    fn evict(&self, key: &K) {
        self.entries.remove(key);
    }

    fn take(&self, key: &K) -> Option<V> {
        let (_, entry) = self.entries.remove(key)?;
        (!entry.is_expired(Instant::now())).then_some(entry.value)
    }

    fn keys_near_expiry(&self) -> Vec<K> {
        self.purge_expired();
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> DashMapExpiringCache<String, u32> {
        DashMapExpiringCache::new()
    }

    #[test]
    fn test_put_overwrites() {
        let cache = cache();
        cache.put("a".to_string(), 1, None);
        cache.put("a".to_string(), 2, None);

        assert_eq!(cache.get(&"a".to_string()), Some(2));
        assert_eq!(cache.keys_near_expiry(), vec!["a".to_string()]);
    }

    #[test]
    fn test_expired_entry_is_invisible() {
        let cache = cache();
        cache.put("a".to_string(), 1, Some(Duration::from_millis(10)));
        cache.put("b".to_string(), 2, None);

        std::thread::sleep(Duration::from_millis(30));

        assert_eq!(cache.get(&"a".to_string()), None);
        assert_eq!(cache.keys_near_expiry(), vec!["b".to_string()]);
    }

    #[test]
    fn test_keys_near_expiry_sweeps() {
        let cache = cache();
        for i in 0..3 {
            cache.put(format!("k{i}"), i, Some(Duration::from_millis(5)));
        }
        cache.put("keep".to_string(), 9, Some(Duration::from_secs(60)));

        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.keys_near_expiry(), vec!["keep".to_string()]);
        assert_eq!(cache.entries.len(), 1);
    }

    #[test]
    fn test_evict_is_idempotent() {
        let cache = cache();
        cache.put("a".to_string(), 1, None);

        cache.evict(&"a".to_string());
        cache.evict(&"a".to_string());

        assert!(cache.keys_near_expiry().is_empty());
    }

    #[test]
    fn test_take_claims_only_the_value_read() {
        let cache = cache();
        cache.put("a".to_string(), 1, None);

        assert_eq!(cache.take(&"a".to_string()), Some(1));
        cache.put("a".to_string(), 2, None);

        assert_eq!(cache.take(&"a".to_string()), Some(2));
        assert_eq!(cache.take(&"a".to_string()), None);
    }

    #[test]
    fn test_take_ignores_expired_value() {
        let cache = cache();
        cache.put("a".to_string(), 1, Some(Duration::from_millis(5)));
        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.take(&"a".to_string()), None);
        assert!(cache.entries.is_empty());
    }

    #[test]
    fn test_renewal_extends_deadline() {
        let cache = cache();
        cache.put("a".to_string(), 1, Some(Duration::from_millis(20)));
        std::thread::sleep(Duration::from_millis(10));
        cache.put("a".to_string(), 1, Some(Duration::from_secs(60)));
        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.get(&"a".to_string()), Some(1));
    }
}
