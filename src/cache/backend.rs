//! Key-value backend contract
//!
//! The four commands the facade needs from a key-value store. Implementations
//! report connectivity problems as [`CacheError`]; the facade decides what to
//! do with them.

use async_trait::async_trait;
use thiserror::Error;

/// Faults raised by a key-value backend. Never leaves the cache module.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Store unreachable or the command failed in transit
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// Snapshot could not be encoded or decoded
    #[error("cache serialization: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Unavailable(err.to_string())
    }
}

pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// `GET` / `SETEX` / `DEL` / `FLUSHALL` over namespaced string keys.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Returns the stored text, or `None` when absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key` for `ttl_secs` seconds (always > 0).
    async fn set_ex(&self, key: &str, value: String, ttl_secs: u64) -> CacheResult<()>;

    /// Removes `key`; a missing key is not an error.
    async fn del(&self, key: &str) -> CacheResult<()>;

    /// Removes every key.
    async fn flush_all(&self) -> CacheResult<()>;

    /// Short label for logs and the stats endpoint.
    fn name(&self) -> &'static str;
}
