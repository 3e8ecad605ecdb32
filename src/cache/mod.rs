//! Cache Module
//!
//! Look-aside caching for the read paths: a typed facade over pluggable
//! key-value backends (Redis or in-process), plus the canonical keys that tie
//! read-path population to write-path invalidation.

mod backend;
mod entry;
mod facade;
pub mod keys;
mod lru;
mod memory;
mod redis_kv;
mod setup;
mod stats;


// Re-export public types
pub use backend::{CacheError, CacheResult, KvBackend};
pub use facade::{Cache, CacheLookup};
pub use memory::MemoryKv;
pub use redis_kv::{RedisKv, DEFAULT_COMMAND_TIMEOUT};
pub use setup::CacheSetup;
pub use stats::CacheStats;

// == Public Constants ==
/// TTL applied when a caller does not pass one, in seconds
pub const DEFAULT_TTL_SECS: i64 = 3600;

/// Namespace prepended to every key before it reaches the backend
pub const KEY_PREFIX: &str = "cache:";
