use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::{AppState, AuthUser};
use crate::domain::Property;
use crate::error::Result;
use crate::models::{ClearFavoritesResponse, MessageResponse};

/// Handler for GET /api/favorites
pub async fn list_favorites_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Property>>> {
    Ok(Json(state.favorites.list(user.id).await?))
}

/// Handler for POST /api/favorites/:property_id
pub async fn add_favorite_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(property_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let property = state.favorites.add(user.id, &property_id).await?;
    Ok(Json(MessageResponse::new(format!(
        "Property '{}' added to favorites",
        property.property_id
    ))))
}

/// Handler for DELETE /api/favorites/:property_id
pub async fn remove_favorite_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(property_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let property = state.favorites.remove(user.id, &property_id).await?;
    Ok(Json(MessageResponse::new(format!(
        "Property '{}' removed from favorites",
        property.property_id
    ))))
}

/// Handler for DELETE /api/favorites
pub async fn clear_favorites_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ClearFavoritesResponse>> {
    let removed = state.favorites.clear(user.id).await?;
    Ok(Json(ClearFavoritesResponse {
        message: "Favorites cleared".to_string(),
        removed,
    }))
}
