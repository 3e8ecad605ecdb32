//! Expiry sweep for the in-process cache backend
//!
//! Reads already ignore expired entries; the sweep reclaims memory held by
//! keys nobody reads again. Redis expires keys on its own and needs no sweep.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryKv;

/// Spawns a task that removes expired entries from `backend` every
/// `interval_secs` seconds. Abort the returned handle on shutdown.
pub fn spawn_cleanup_task(backend: Arc<MemoryKv>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "cache expiry sweep started");

        loop {
            tokio::time::sleep(interval).await;

            let removed = backend.cleanup_expired().await;
            if removed > 0 {
                info!(removed, "cache expiry sweep removed expired entries");
            } else {
                debug!("cache expiry sweep found nothing to remove");
            }
        }
    })
}
