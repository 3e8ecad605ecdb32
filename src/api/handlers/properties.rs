use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::api::{AppState, AuthUser};
use crate::domain::{Property, PropertyFilter, PropertyPatch};
use crate::error::Result;
use crate::models::{CreatePropertyRequest, MessageResponse};

/// Handler for GET /api/properties
///
/// Without query parameters this is the cached full listing; any filter
/// parameter turns it into an uncached search.
pub async fn list_properties_handler(
    State(state): State<AppState>,
    Query(filter): Query<PropertyFilter>,
) -> Result<Json<Vec<Property>>> {
    Ok(Json(state.properties.list(&filter).await?))
}

/// Handler for POST /api/properties
pub async fn create_property_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreatePropertyRequest>,
) -> Result<(StatusCode, Json<Property>)> {
    let property = state.properties.create(&user, req).await?;
    Ok((StatusCode::CREATED, Json(property)))
}

/// Handler for GET /api/properties/:id
pub async fn get_property_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Property>> {
    Ok(Json(state.properties.get(&id).await?))
}

/// Handler for PUT /api/properties/:id
pub async fn update_property_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(patch): Json<PropertyPatch>,
) -> Result<Json<Property>> {
    Ok(Json(state.properties.update(&user, &id, patch).await?))
}

/// Handler for DELETE /api/properties/:id
pub async fn delete_property_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let deleted = state.properties.delete(&user, &id).await?;
    Ok(Json(MessageResponse::new(format!(
        "Property '{}' deleted",
        deleted.property_id
    ))))
}

/// Handler for GET /api/properties/:id/similar
pub async fn similar_properties_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Property>>> {
    Ok(Json(state.properties.similar(&id).await?))
}
