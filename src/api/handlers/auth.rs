use axum::{extract::State, http::StatusCode, Json};

use crate::api::{AppState, AuthUser};
use crate::domain::UserProfile;
use crate::error::Result;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest};

/// Handler for POST /api/auth/register
pub async fn register_handler(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let auth = state.users.register(req).await?;
    Ok((StatusCode::CREATED, Json(auth)))
}

/// Handler for POST /api/auth/login
pub async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    Ok(Json(state.users.login(req).await?))
}

/// Handler for GET /api/auth/profile
///
/// The extractor already resolved the cached profile.
pub async fn profile_handler(AuthUser(user): AuthUser) -> Json<UserProfile> {
    Json(user)
}

/// Handler for PUT /api/auth/profile
pub async fn update_profile_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>> {
    Ok(Json(state.users.update_profile(user.id, req).await?))
}
