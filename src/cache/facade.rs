//! Cache facade
//!
//! Typed, infallible front for a [`KvBackend`]. Every operation completes
//! normally whatever the backend does: failures are logged, counted and turned
//! into a miss or a no-op.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::backend::{CacheError, KvBackend};
use super::stats::{CacheStats, StatsCounters};
use super::{DEFAULT_TTL_SECS, KEY_PREFIX};

// == Lookup Outcome ==
/// How a lookup resolved.
///
/// Callers normally treat `Miss` and `Unavailable` the same way (go to the
/// store); the split exists for logging and statistics.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    Hit(T),
    Miss,
    Unavailable,
}

impl<T> CacheLookup<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            CacheLookup::Hit(value) => Some(value),
            CacheLookup::Miss | CacheLookup::Unavailable => None,
        }
    }
}

struct Inner {
    /// `None` is the disabled state: every call is a miss or a no-op.
    backend: Option<Arc<dyn KvBackend>>,
    default_ttl: i64,
    stats: StatsCounters,
}

// == Cache ==
/// Look-aside cache handle. Cheap to clone; clones share backend and stats.
#[derive(Clone)]
pub struct Cache {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("backend", &self.backend_name())
            .field("default_ttl", &self.inner.default_ttl)
            .finish()
    }
}

impl Cache {
    /// Wraps `backend`, using `default_ttl` seconds when `set` gets no TTL.
    pub fn new(backend: Arc<dyn KvBackend>, default_ttl: i64) -> Self {
        Self::build(Some(backend), default_ttl)
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::build(None, DEFAULT_TTL_SECS)
    }

    fn build(backend: Option<Arc<dyn KvBackend>>, default_ttl: i64) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                default_ttl,
                stats: StatsCounters::default(),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.backend.is_some()
    }

    pub fn backend_name(&self) -> &'static str {
        self.inner
            .backend
            .as_ref()
            .map_or("disabled", |backend| backend.name())
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.stats.snapshot()
    }

    // == Lookup ==
    /// Fetches and decodes `key`, reporting how the lookup resolved.
    ///
    /// An entry that no longer decodes as `T` is dropped and reported as a miss.
    pub async fn lookup<T: DeserializeOwned>(&self, key: &str) -> CacheLookup<T> {
        let stats = &self.inner.stats;
        let Some(backend) = &self.inner.backend else {
            stats.record_unavailable();
            return CacheLookup::Unavailable;
        };

        let namespaced = namespaced(key);
        let raw = match backend.get(&namespaced).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                stats.record_miss();
                debug!(key, "cache miss");
                return CacheLookup::Miss;
            }
            Err(err) => {
                stats.record_unavailable();
                warn!(key, error = %err, "cache get failed, falling through to store");
                return CacheLookup::Unavailable;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                stats.record_hit();
                debug!(key, "cache hit");
                CacheLookup::Hit(value)
            }
            Err(err) => {
                stats.record_miss();
                warn!(key, error = %err, "discarding undecodable cache entry");
                if let Err(err) = backend.del(&namespaced).await {
                    warn!(key, error = %err, "cache delete failed");
                }
                CacheLookup::Miss
            }
        }
    }

    // == Get ==
    /// The cached value, or `None` on miss, expiry or backend failure.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.lookup(key).await.into_option()
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl` seconds (default TTL when `None`).
    ///
    /// A TTL of zero or less expires immediately: any existing entry is removed
    /// and the value is not stored.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Option<i64>) {
        let Some(backend) = &self.inner.backend else {
            return;
        };

        let ttl = ttl.unwrap_or(self.inner.default_ttl);
        let namespaced = namespaced(key);
        let result = if ttl <= 0 {
            backend.del(&namespaced).await
        } else {
            match serde_json::to_string(value) {
                Ok(raw) => backend.set_ex(&namespaced, raw, ttl as u64).await,
                Err(err) => Err(CacheError::from(err)),
            }
        };

        if let Err(err) = result {
            warn!(key, error = %err, "cache set failed");
        }
    }

    // == Delete ==
    /// Removes `key`. Missing keys and backend failures are ignored.
    pub async fn delete(&self, key: &str) {
        let Some(backend) = &self.inner.backend else {
            return;
        };
        if let Err(err) = backend.del(&namespaced(key)).await {
            warn!(key, error = %err, "cache delete failed");
        }
    }

    /// Deletes every key in `keys` after a committed store write.
    pub async fn invalidate<I, K>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        for key in keys {
            let key = key.as_ref();
            self.delete(key).await;
            self.inner.stats.record_invalidation();
            debug!(key, "cache invalidated");
        }
    }

    // == Clear ==
    /// Drops every entry in the backend.
    pub async fn clear(&self) {
        let Some(backend) = &self.inner.backend else {
            return;
        };
        if let Err(err) = backend.flush_all().await {
            warn!(error = %err, "cache clear failed");
        }
    }

    // == Read-Through ==
    /// Returns the cached value for `key`, or runs `load` against the store,
    /// caches its result with the default TTL and returns it.
    ///
    /// Errors from `load` are returned untouched and nothing is cached.
    pub async fn get_or_load<T, E, F, Fut>(&self, key: &str, load: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let CacheLookup::Hit(value) = self.lookup(key).await {
            return Ok(value);
        }

        let value = load().await?;
        self.set(key, &value, None).await;
        Ok(value)
    }
}

fn namespaced(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::test_support::FailingKv;
    use crate::cache::MemoryKv;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Listing {
        id: String,
        price: u64,
    }

    fn memory_cache() -> (Cache, Arc<MemoryKv>) {
        let kv = Arc::new(MemoryKv::new(100));
        (Cache::new(kv.clone(), 3600), kv)
    }

    fn listing(id: &str) -> Listing {
        Listing {
            id: id.to_string(),
            price: 1200,
        }
    }

    #[tokio::test]
    async fn test_get_never_written_is_absent() {
        let (cache, _) = memory_cache();
        assert_eq!(cache.get::<Listing>("property:P1").await, None);
        assert_eq!(
            cache.lookup::<Listing>("property:P1").await,
            CacheLookup::Miss
        );
    }

    #[tokio::test]
    async fn test_set_then_get_round_trips() {
        let (cache, _) = memory_cache();
        cache.set("property:P1", &listing("P1"), None).await;

        assert_eq!(cache.get("property:P1").await, Some(listing("P1")));
        assert_eq!(cache.stats().hits, 1);
    }

    #[tokio::test]
    async fn test_keys_are_namespaced_in_backend() {
        let (cache, kv) = memory_cache();
        cache.set("property:P1", &listing("P1"), None).await;

        assert!(kv.get("cache:property:P1").await.unwrap().is_some());
        assert!(kv.get("property:P1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_positive_ttl_expires_immediately() {
        let (cache, _) = memory_cache();
        cache.set("property:P1", &listing("P1"), None).await;

        cache.set("property:P1", &listing("P1"), Some(0)).await;
        assert_eq!(cache.get::<Listing>("property:P1").await, None);

        cache.set("property:P2", &listing("P2"), Some(-5)).await;
        assert_eq!(cache.get::<Listing>("property:P2").await, None);
    }

    #[tokio::test]
    async fn test_delete_twice_is_harmless() {
        let (cache, _) = memory_cache();
        cache.set("property:P1", &listing("P1"), None).await;

        cache.delete("property:P1").await;
        cache.delete("property:P1").await;

        assert_eq!(cache.get::<Listing>("property:P1").await, None);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss_and_is_dropped() {
        let (cache, kv) = memory_cache();
        kv.set_ex("cache:property:P1", "not json".into(), 60)
            .await
            .unwrap();

        assert_eq!(
            cache.lookup::<Listing>("property:P1").await,
            CacheLookup::Miss
        );
        assert!(kv.get("cache:property:P1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_drops_everything() {
        let (cache, kv) = memory_cache();
        cache.set("property:P1", &listing("P1"), None).await;
        cache.set("properties:all", &vec![listing("P1")], None).await;

        cache.clear().await;

        assert!(kv.is_empty().await);
    }

    #[tokio::test]
    async fn test_disabled_cache_is_a_no_op() {
        let cache = Cache::disabled();
        cache.set("property:P1", &listing("P1"), None).await;
        cache.delete("property:P1").await;
        cache.clear().await;

        assert!(!cache.is_enabled());
        assert_eq!(cache.backend_name(), "disabled");
        assert_eq!(
            cache.lookup::<Listing>("property:P1").await,
            CacheLookup::Unavailable
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_degrades_silently() {
        let cache = Cache::new(Arc::new(FailingKv), 3600);

        cache.set("property:P1", &listing("P1"), None).await;
        cache.delete("property:P1").await;
        cache.invalidate([crate::cache::keys::ALL_PROPERTIES]).await;
        cache.clear().await;

        assert_eq!(
            cache.lookup::<Listing>("property:P1").await,
            CacheLookup::Unavailable
        );
        assert_eq!(cache.get::<Listing>("property:P1").await, None);
        assert_eq!(cache.stats().unavailable, 2);
    }

    #[tokio::test]
    async fn test_get_or_load_populates_on_miss_and_skips_store_on_hit() {
        let (cache, _) = memory_cache();

        let first: Result<Listing, String> =
            cache.get_or_load("property:P1", || async { Ok(listing("P1")) }).await;
        assert_eq!(first.unwrap(), listing("P1"));

        let second: Result<Listing, String> = cache
            .get_or_load("property:P1", || async {
                Err("store must not be queried on a hit".to_string())
            })
            .await;
        assert_eq!(second.unwrap(), listing("P1"));
    }

    #[tokio::test]
    async fn test_get_or_load_does_not_cache_errors() {
        let (cache, kv) = memory_cache();

        let result: Result<Listing, String> = cache
            .get_or_load("property:P9", || async { Err("Property not found".to_string()) })
            .await;

        assert!(result.is_err());
        assert!(kv.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_or_load_falls_through_when_backend_down() {
        let cache = Cache::new(Arc::new(FailingKv), 3600);

        let result: Result<Listing, String> =
            cache.get_or_load("property:P1", || async { Ok(listing("P1")) }).await;

        assert_eq!(result.unwrap(), listing("P1"));
    }

    #[tokio::test]
    async fn test_invalidate_counts_each_key() {
        let (cache, _) = memory_cache();
        cache.set("property:P1", &listing("P1"), None).await;

        cache
            .invalidate(["property:P1".to_string(), "properties:all".to_string()])
            .await;

        assert_eq!(cache.stats().invalidations, 2);
        assert_eq!(cache.get::<Listing>("property:P1").await, None);
    }
}
