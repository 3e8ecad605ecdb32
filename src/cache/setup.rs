//! Builds the cache facade from configuration.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::{Cache, MemoryKv, RedisKv};
use crate::config::Config;

/// The facade plus, for the in-process backend, a handle the expiry sweep
/// runs against.
pub struct CacheSetup {
    pub cache: Cache,
    pub sweepable: Option<Arc<MemoryKv>>,
}

impl CacheSetup {
    /// Redis when `REDIS_URL` is set, the in-process backend otherwise.
    ///
    /// A Redis server that cannot be reached at startup leaves the cache
    /// disabled rather than failing boot.
    pub async fn from_config(config: &Config) -> Self {
        if !config.cache_enabled {
            info!("cache disabled by configuration");
            return Self::disabled();
        }

        match &config.redis_url {
            Some(url) => match RedisKv::connect(
                url,
                Duration::from_millis(config.cache_command_timeout_ms),
            )
            .await
            {
                Ok(redis) => Self {
                    cache: Cache::new(Arc::new(redis), config.cache_ttl),
                    sweepable: None,
                },
                Err(err) => {
                    warn!(error = %err, "redis unavailable, continuing without cache");
                    Self::disabled()
                }
            },
            None => {
                let memory = Arc::new(MemoryKv::new(config.cache_max_entries));
                info!(max_entries = config.cache_max_entries, "using in-process cache");
                Self {
                    cache: Cache::new(memory.clone(), config.cache_ttl),
                    sweepable: Some(memory),
                }
            }
        }
    }

    fn disabled() -> Self {
        Self {
            cache: Cache::disabled(),
            sweepable: None,
        }
    }
}
