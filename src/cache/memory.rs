//! In-process key-value backend
//!
//! HashMap storage with per-entry TTL and LRU eviction once capacity is
//! reached. Used when no Redis URL is configured, and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::backend::{CacheResult, KvBackend};
use super::entry::{current_timestamp_ms, CacheEntry};
use super::lru::LruTracker;

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    evictions: u64,
}

impl Inner {
    fn remove(&mut self, key: &str) -> bool {
        self.lru.remove(key);
        self.entries.remove(key).is_some()
    }
}

// == Memory Backend ==
/// Bounded in-process TTL store.
#[derive(Debug)]
pub struct MemoryKv {
    inner: RwLock<Inner>,
    max_entries: usize,
}

impl MemoryKv {
    /// Creates a backend that holds at most `max_entries` keys.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            max_entries: max_entries.max(1),
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let mut inner = self.inner.write().await;
        let expired: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            inner.remove(key);
        }
        expired.len()
    }

    /// Number of stored entries, expired ones included until swept.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Entries dropped because the backend was full.
    pub async fn evictions(&self) -> u64 {
        self.inner.read().await.evictions
    }
}

#[async_trait]
impl KvBackend for MemoryKv {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        // Write lock: expired entries are dropped and LRU order is updated.
        let mut inner = self.inner.write().await;
        let value = match inner.entries.get(key) {
            None => return Ok(None),
            Some(entry) if entry.is_expired() => None,
            Some(entry) => Some(entry.value.clone()),
        };

        match value {
            Some(value) => {
                inner.lru.touch(key);
                Ok(Some(value))
            }
            None => {
                inner.remove(key);
                Ok(None)
            }
        }
    }

    async fn set_ex(&self, key: &str, value: String, ttl_secs: u64) -> CacheResult<()> {
        let mut inner = self.inner.write().await;

        if !inner.entries.contains_key(key) && inner.entries.len() >= self.max_entries {
            if let Some(evicted) = inner.lru.evict_oldest() {
                inner.entries.remove(&evicted);
                inner.evictions += 1;
                debug!(key = %evicted, "evicted least recently used cache entry");
            }
        }

        inner
            .entries
            .insert(key.to_string(), CacheEntry::new(value, ttl_secs));
        inner.lru.touch(key);
        Ok(())
    }

    async fn del(&self, key: &str) -> CacheResult<()> {
        self.inner.write().await.remove(key);
        Ok(())
    }

    async fn flush_all(&self) -> CacheResult<()> {
        let mut inner = self.inner.write().await;
        inner.entries.clear();
        inner.lru.clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
