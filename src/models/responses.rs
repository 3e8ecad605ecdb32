//! Response DTOs for the listing API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::domain::{Property, Recommendation, UserProfile, UserSummary};

/// Response body for register and login
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

/// Plain confirmation message
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for `DELETE /api/favorites`
#[derive(Debug, Clone, Serialize)]
pub struct ClearFavoritesResponse {
    pub message: String,
    pub removed: usize,
}

/// A recommendation with its listing and the other party embedded.
///
/// `property` is `None` once the listing has been deleted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationView {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub property: Option<Property>,
    /// Sender on the received list, recipient on the sent list
    pub counterpart: Option<UserSummary>,
}

/// Response body for the cache stats endpoint (`GET /api/cache/stats`)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    /// "redis", "memory" or "disabled"
    pub backend: String,
    pub enabled: bool,
    pub hits: u64,
    pub misses: u64,
    pub unavailable: u64,
    pub invalidations: u64,
    /// hits / (hits + misses + unavailable)
    pub hit_rate: f64,
}

impl CacheStatsResponse {
    pub fn new(backend: impl Into<String>, enabled: bool, stats: CacheStats) -> Self {
        Self {
            backend: backend.into(),
            enabled,
            hits: stats.hits,
            misses: stats.misses,
            unavailable: stats.unavailable,
            invalidations: stats.invalidations,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
