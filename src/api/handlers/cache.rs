use axum::{extract::State, Json};
use tracing::info;

use crate::api::{AppState, AuthUser};
use crate::error::{AppError, Result};
use crate::models::{CacheStatsResponse, MessageResponse};

/// Handler for GET /api/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let cache = &state.cache;
    Json(CacheStatsResponse::new(
        cache.backend_name(),
        cache.is_enabled(),
        cache.stats(),
    ))
}

/// Handler for DELETE /api/cache (admins only)
pub async fn cache_clear_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<MessageResponse>> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    state.cache.clear().await;
    info!(user_id = %user.id, "cache cleared");
    Ok(Json(MessageResponse::new("Cache cleared")))
}
