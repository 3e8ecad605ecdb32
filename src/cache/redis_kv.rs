//! Redis key-value backend
//!
//! Thin wrapper over a multiplexed [`ConnectionManager`], which reconnects on
//! its own after the server comes back.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Cmd, FromRedisValue};
use tracing::info;

use super::backend::{CacheError, CacheResult, KvBackend};

/// How long startup waits for the first connection before giving up.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Default budget for a single command once connected.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Clone)]
pub struct RedisKv {
    conn: ConnectionManager,
    command_timeout: Duration,
}

impl RedisKv {
    /// Opens a managed connection to `url`.
    ///
    /// Fails if the URL is malformed or the server does not answer within
    /// [`CONNECT_TIMEOUT`]; callers fall back to a disabled cache. Every
    /// later command that gets no reply within `command_timeout` fails with
    /// [`CacheError::Unavailable`].
    pub async fn connect(url: &str, command_timeout: Duration) -> CacheResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = tokio::time::timeout(CONNECT_TIMEOUT, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Unavailable(format!("connect to {url} timed out")))??;

        info!(%url, ?command_timeout, "connected to redis");
        Ok(Self {
            conn,
            command_timeout,
        })
    }

    async fn query<T: FromRedisValue>(&self, cmd: &Cmd) -> CacheResult<T> {
        let mut conn = self.conn.clone();
        let reply = tokio::time::timeout(self.command_timeout, cmd.query_async(&mut conn))
            .await
            .map_err(|_| {
                CacheError::Unavailable(format!(
                    "no reply within {}ms",
                    self.command_timeout.as_millis()
                ))
            })?;
        Ok(reply?)
    }
}

#[async_trait]
impl KvBackend for RedisKv {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.query(redis::cmd("GET").arg(key)).await
    }

    async fn set_ex(&self, key: &str, value: String, ttl_secs: u64) -> CacheResult<()> {
        self.query(redis::cmd("SETEX").arg(key).arg(ttl_secs).arg(value))
            .await
    }

    async fn del(&self, key: &str) -> CacheResult<()> {
        self.query(redis::cmd("DEL").arg(key)).await
    }

    async fn flush_all(&self) -> CacheResult<()> {
        self.query(&redis::cmd("FLUSHALL")).await
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Instant;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use crate::cache::Cache;

    /// A server that acknowledges every command with `+OK` but never answers
    /// `GET`, like a redis that is up yet stuck.
    async fn stalled_on_get_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    loop {
                        let n = match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => n,
                        };
                        let chunk = &buf[..n];
                        if chunk.windows(7).any(|w| w == b"\r\nGET\r\n") {
                            continue;
                        }
                        // One reply per RESP array in the chunk.
                        let commands = chunk
                            .iter()
                            .enumerate()
                            .filter(|(i, b)| **b == b'*' && (*i == 0 || chunk[i - 1] == b'\n'))
                            .count();
                        for _ in 0..commands.max(1) {
                            if socket.write_all(b"+OK\r\n").await.is_err() {
                                return;
                            }
                        }
                    }
                });
            }
        });

        format!("redis://{addr}/")
    }

    #[tokio::test]
    async fn test_unanswered_command_times_out() {
        let url = stalled_on_get_server().await;
        let kv = RedisKv::connect(&url, Duration::from_millis(200))
            .await
            .unwrap();
        kv.set_ex("cache:property:P1", "{}".to_string(), 60)
            .await
            .unwrap();

        let started = Instant::now();
        let result = kv.get("cache:property:P1").await;

        assert!(matches!(result, Err(CacheError::Unavailable(_))));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_stalled_server_falls_through_to_store() {
        let url = stalled_on_get_server().await;
        let kv = RedisKv::connect(&url, Duration::from_millis(200))
            .await
            .unwrap();
        let cache = Cache::new(std::sync::Arc::new(kv), 3600);

        let loaded = tokio::time::timeout(
            Duration::from_secs(2),
            cache.get_or_load("property:P1", || async { Ok::<_, String>("fresh".to_string()) }),
        )
        .await
        .expect("read path must not stall on an unresponsive cache");

        assert_eq!(loaded.unwrap(), "fresh");
        assert_eq!(cache.stats().unavailable, 1);
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        let result = RedisKv::connect("not-a-redis-url", DEFAULT_COMMAND_TIMEOUT).await;
        assert!(matches!(result, Err(CacheError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_connect_fails_without_server() {
        // Port 1 is reserved and never runs redis.
        let result = RedisKv::connect("redis://127.0.0.1:1/", DEFAULT_COMMAND_TIMEOUT).await;
        assert!(result.is_err());
    }
}
