//! In-process TTL Cache
//!
//! Mutex-guarded map with per-entry expiry and a fixed capacity. When full,
//! expired entries are purged first, then the entry closest to expiry goes.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use contactdesk::{ContactCache, ContactMessage};

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, Entry<V>>>,
    max_entries: usize,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    pub fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut entries = self.lock();
        let expired = match entries.get(key) {
            Some(entry) if now < entry.expires_at => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.remove(key);
        }
        None
    }

    pub fn insert_at(&self, key: &str, value: V, ttl: Duration, now: Instant) {
        let mut entries = self.lock();

        if !entries.contains_key(key) && entries.len() >= self.max_entries {
            entries.retain(|_, entry| now < entry.expires_at);

            if entries.len() >= self.max_entries {
                let soonest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.expires_at)
                    .map(|(k, _)| k.clone());
                if let Some(soonest) = soonest {
                    entries.remove(&soonest);
                }
            }
        }

        entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
    }

    pub fn invalidate(&self, key: &str) {
        self.lock().remove(key);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry<V>>> {
        // A panic while holding the lock cannot leave an entry half-written
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl ContactCache for TtlCache<ContactMessage> {
    fn get(&self, key: &str) -> Option<ContactMessage> {
        self.get_at(key, Instant::now())
    }

    fn set(&self, key: &str, value: ContactMessage, ttl: Duration) {
        self.insert_at(key, value, ttl, Instant::now());
    }

    fn remove(&self, key: &str) {
        self.invalidate(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn test_entry_expires_after_ttl() {
        let cache = TtlCache::new(10);
        let now = Instant::now();
        cache.insert_at("contact_message_1", "one", MINUTE, now);

        assert_eq!(cache.get_at("contact_message_1", now), Some("one"));
        assert_eq!(
            cache.get_at("contact_message_1", now + Duration::from_secs(59)),
            Some("one")
        );
        assert_eq!(cache.get_at("contact_message_1", now + MINUTE), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_removes_entry() {
        let cache = TtlCache::new(10);
        let now = Instant::now();
        cache.insert_at("a", 1, MINUTE, now);
        cache.invalidate("a");

        assert_eq!(cache.get_at("a", now), None);
    }

    #[test]
    fn test_capacity_purges_expired_first() {
        let cache = TtlCache::new(2);
        let now = Instant::now();
        cache.insert_at("stale", 1, Duration::from_secs(1), now);
        cache.insert_at("fresh", 2, MINUTE * 5, now);

        let later = now + Duration::from_secs(2);
        cache.insert_at("new", 3, MINUTE, later);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get_at("fresh", later), Some(2));
        assert_eq!(cache.get_at("new", later), Some(3));
    }

    #[test]
    fn test_capacity_evicts_soonest_to_expire() {
        let cache = TtlCache::new(2);
        let now = Instant::now();
        cache.insert_at("long", 1, MINUTE * 10, now);
        cache.insert_at("short", 2, MINUTE, now);
        cache.insert_at("third", 3, MINUTE * 5, now);

        assert_eq!(cache.get_at("short", now), None);
        assert_eq!(cache.get_at("long", now), Some(1));
        assert_eq!(cache.get_at("third", now), Some(3));
    }

    #[test]
    fn test_replacing_existing_key_does_not_evict() {
        let cache = TtlCache::new(2);
        let now = Instant::now();
        cache.insert_at("a", 1, MINUTE, now);
        cache.insert_at("b", 2, MINUTE, now);
        cache.insert_at("a", 10, MINUTE, now);

        assert_eq!(cache.get_at("a", now), Some(10));
        assert_eq!(cache.get_at("b", now), Some(2));
    }
}
