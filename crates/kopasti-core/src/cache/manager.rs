use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::QueryParams;

/// Entries older than this are never served.
pub const DEFAULT_TTL_SECS: i64 = 5 * 60;

const COLLECTION_PREFIX: &str = "collection:";
const MEMBER_PREFIX: &str = "member:";

/// Normalized identity of a logical query.
///
/// Collection and single-member keys live in separate prefixes so the two
/// kinds never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn collection(params: &QueryParams) -> Self {
        let pairs = params.normalized_pairs();
        let serialized = serde_json::to_string(&pairs).unwrap_or_default();
        Self(format!("{COLLECTION_PREFIX}{serialized}"))
    }

    pub fn member(id: &str) -> Self {
        Self(format!("{MEMBER_PREFIX}{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub payload: T,
    pub stored_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            stored_at: Utc::now(),
        }
    }

    pub fn age(&self) -> Duration {
        Utc::now() - self.stored_at
    }

    /// Valid only while `now - stored_at < ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }
}

/// In-memory store for query results with lazy time-based expiry.
///
/// One instance is built by the composition root and shared by every view.
/// Nothing is persisted; entries live as long as the process.
pub struct QueryCache<T> {
    entries: Mutex<HashMap<CacheKey, CacheEntry<T>>>,
    ttl: Duration,
}

impl<T: Clone> QueryCache<T> {
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(DEFAULT_TTL_SECS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry<T>>> {
        // Entries are replaced wholesale, so a panicked writer cannot leave one half-built
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the entry for `key` if it is still fresh. An expired entry is
    /// evicted and reported as absent.
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry<T>> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.is_expired(self.ttl) => {
                debug!(key = %key, age_secs = entry.age().num_seconds(), "Evicting expired cache entry");
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.clone()),
            None => None,
        }
    }

    pub fn set(&self, key: CacheKey, payload: T) {
        self.insert_entry(key, CacheEntry::new(payload));
    }

    /// Store an entry with an explicit timestamp.
    pub fn insert_entry(&self, key: CacheKey, entry: CacheEntry<T>) {
        self.lock().insert(key, entry);
    }

    pub fn delete(&self, key: &CacheKey) -> bool {
        self.lock().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Drop every expired entry now instead of waiting for a read.
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(self.ttl));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "Purged expired cache entries");
        }
        removed
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<T: Clone> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn backdated<T>(payload: T, minutes: i64) -> CacheEntry<T> {
        CacheEntry {
            payload,
            stored_at: Utc::now() - Duration::minutes(minutes),
        }
    }

    #[test]
    fn test_collection_key_normalization() {
        let a = QueryParams {
            q: Some(String::new()),
            ..QueryParams::first_page()
        };
        let b = QueryParams::first_page();
        assert_eq!(CacheKey::collection(&a), CacheKey::collection(&b));

        let c = QueryParams::first_page().with_search("a");
        let d = QueryParams::first_page().with_search("ab");
        assert_ne!(CacheKey::collection(&c), CacheKey::collection(&d));
        assert_ne!(CacheKey::collection(&b), CacheKey::collection(&c));

        let e = QueryParams::first_page().with_cohort("2024");
        let f = QueryParams::first_page().with_unit("2024");
        assert_ne!(CacheKey::collection(&e), CacheKey::collection(&f));

        let second_page = QueryParams::first_page().with_page(20, 20);
        assert_ne!(CacheKey::collection(&b), CacheKey::collection(&second_page));

        let wider = QueryParams::first_page().with_page(0, 50);
        assert_ne!(CacheKey::collection(&b), CacheKey::collection(&wider));

        let unlimited = QueryParams {
            limit: None,
            ..QueryParams::first_page()
        };
        assert_ne!(CacheKey::collection(&b), CacheKey::collection(&unlimited));

        let no_offset = QueryParams {
            offset: None,
            ..QueryParams::first_page()
        };
        assert_ne!(CacheKey::collection(&b), CacheKey::collection(&no_offset));
    }

    #[test]
    fn test_key_namespaces_do_not_collide() {
        let collection = CacheKey::collection(&QueryParams::default());
        let member = CacheKey::member("");
        assert_ne!(collection, member);
        assert!(collection.as_str().starts_with("collection:"));
        assert_eq!(CacheKey::member("abc").to_string(), "member:abc");
    }

    #[test]
    fn test_get_fresh_entry() {
        let cache = QueryCache::new();
        let key = CacheKey::member("abc");
        assert!(cache.get(&key).is_none());

        cache.set(key.clone(), vec![1, 2, 3]);
        let entry = cache.get(&key).expect("fresh entry should be served");
        assert_eq!(entry.payload, vec![1, 2, 3]);
    }

    #[test]
    fn test_expired_entry_is_absent_and_evicted() {
        let cache = QueryCache::new();
        let key = CacheKey::member("abc");
        cache.insert_entry(key.clone(), backdated(1, 6));
        assert_eq!(cache.len(), 1);

        assert!(cache.get(&key).is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_entry_just_inside_ttl_is_served() {
        let cache = QueryCache::new();
        let key = CacheKey::member("abc");
        cache.insert_entry(key.clone(), backdated(1, 4));
        assert!(cache.get(&key).is_some());
    }

    #[test]
    fn test_set_replaces_entry() {
        let cache = QueryCache::new();
        let key = CacheKey::member("abc");
        cache.insert_entry(key.clone(), backdated("old", 4));
        cache.set(key.clone(), "new");

        let entry = cache.get(&key).expect("entry present");
        assert_eq!(entry.payload, "new");
        assert!(entry.age() < Duration::minutes(1));
    }

    #[test]
    fn test_delete_and_clear() {
        let cache = QueryCache::new();
        cache.set(CacheKey::member("a"), 1);
        cache.set(CacheKey::member("b"), 2);

        assert!(cache.delete(&CacheKey::member("a")));
        assert!(!cache.delete(&CacheKey::member("a")));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let cache = QueryCache::new();
        cache.insert_entry(CacheKey::member("old"), backdated(1, 10));
        cache.insert_entry(CacheKey::member("older"), backdated(2, 60));
        cache.set(CacheKey::member("fresh"), 3);

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&CacheKey::member("fresh")).is_some());
    }

    #[test]
    fn test_zero_ttl_never_serves() {
        let cache = QueryCache::with_ttl(Duration::zero());
        let key = CacheKey::member("abc");
        cache.set(key.clone(), 1);
        assert!(cache.get(&key).is_none());
    }
}
