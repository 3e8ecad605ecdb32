//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::DEFAULT_COMMAND_TIMEOUT;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Redis connection URL; the in-process cache backend is used when unset
    pub redis_url: Option<String>,
    /// When false the cache facade is built disabled
    pub cache_enabled: bool,
    /// Default TTL in seconds for cached snapshots
    pub cache_ttl: i64,
    /// Per-command reply budget for the Redis backend, in milliseconds
    pub cache_command_timeout_ms: u64,
    /// Capacity of the in-process cache backend
    pub cache_max_entries: usize,
    /// Expired-entry sweep interval for the in-process backend, in seconds
    pub cleanup_interval: u64,
    /// HMAC secret used to sign bearer tokens
    pub jwt_secret: String,
    /// Bearer token lifetime in days
    pub token_ttl_days: i64,
    /// Per-request timeout in seconds
    pub request_timeout: u64,
    /// Account promoted to (or created as) admin at startup
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `REDIS_URL` - Redis URL (default: unset, in-process cache)
    /// - `CACHE_ENABLED` - Enable the look-aside cache (default: true)
    /// - `CACHE_TTL` - Snapshot TTL in seconds (default: 3600)
    /// - `CACHE_COMMAND_TIMEOUT_MS` - Redis command reply budget (default: 500)
    /// - `CACHE_MAX_ENTRIES` - In-process cache capacity (default: 10000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `JWT_SECRET` - Token signing secret (default: "default_secret")
    /// - `TOKEN_TTL_DAYS` - Token lifetime (default: 7)
    /// - `REQUEST_TIMEOUT` - Request timeout in seconds (default: 30)
    /// - `ADMIN_EMAIL` / `ADMIN_PASSWORD` - Admin account bootstrapped at startup (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()),
            cache_enabled: parse_var("CACHE_ENABLED").unwrap_or(defaults.cache_enabled),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            cache_command_timeout_ms: parse_var("CACHE_COMMAND_TIMEOUT_MS")
                .unwrap_or(defaults.cache_command_timeout_ms),
            cache_max_entries: parse_var("CACHE_MAX_ENTRIES")
                .unwrap_or(defaults.cache_max_entries),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            jwt_secret: env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            token_ttl_days: parse_var("TOKEN_TTL_DAYS").unwrap_or(defaults.token_ttl_days),
            request_timeout: parse_var("REQUEST_TIMEOUT").unwrap_or(defaults.request_timeout),
            admin_email: non_empty_var("ADMIN_EMAIL"),
            admin_password: non_empty_var("ADMIN_PASSWORD"),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            redis_url: None,
            cache_enabled: true,
            cache_ttl: 3600,
            cache_command_timeout_ms: DEFAULT_COMMAND_TIMEOUT.as_millis() as u64,
            cache_max_entries: 10_000,
            cleanup_interval: 60,
            jwt_secret: "default_secret".to_string(),
            token_ttl_days: 7,
            request_timeout: 30,
            admin_email: None,
            admin_password: None,
        }
    }
}
