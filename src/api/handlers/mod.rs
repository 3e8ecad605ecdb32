//! API Handlers
//!
//! HTTP request handlers, one module per resource. Handlers only extract and
//! shape; caching and invalidation live in the services they call.

mod auth;
mod cache;
mod favorites;
mod properties;
mod recommendations;

use axum::Json;

use crate::models::HealthResponse;

pub use auth::{login_handler, profile_handler, register_handler, update_profile_handler};
pub use cache::{cache_clear_handler, cache_stats_handler};
pub use favorites::{
    add_favorite_handler, clear_favorites_handler, list_favorites_handler,
    remove_favorite_handler,
};
pub use properties::{
    create_property_handler, delete_property_handler, get_property_handler,
    list_properties_handler, similar_properties_handler, update_property_handler,
};
pub use recommendations::{
    create_recommendation_handler, mark_viewed_handler, received_recommendations_handler,
    sent_recommendations_handler,
};

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
