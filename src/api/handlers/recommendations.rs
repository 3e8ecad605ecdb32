use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::{AppState, AuthUser};
use crate::error::Result;
use crate::models::{CreateRecommendationRequest, RecommendationView};

/// Handler for POST /api/recommendations
pub async fn create_recommendation_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateRecommendationRequest>,
) -> Result<(StatusCode, Json<RecommendationView>)> {
    let view = state.recommendations.create(&user, req).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Handler for GET /api/recommendations/received
pub async fn received_recommendations_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<RecommendationView>>> {
    Ok(Json(state.recommendations.received(user.id).await?))
}

/// Handler for GET /api/recommendations/sent
pub async fn sent_recommendations_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<RecommendationView>>> {
    Ok(Json(state.recommendations.sent(user.id).await?))
}

/// Handler for PATCH /api/recommendations/:id/view
pub async fn mark_viewed_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RecommendationView>> {
    Ok(Json(state.recommendations.mark_viewed(user.id, id).await?))
}
