//! API Routes
//!
//! Configures the Axum router with every listing endpoint.

use std::time::Duration;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::handlers::*;
use super::AppState;

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: allows any origin
/// - Tracing: logs every request
/// - Timeout: requests running longer than `request_timeout` get 408
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth = Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/profile", get(profile_handler).put(update_profile_handler));

    let properties = Router::new()
        .route(
            "/",
            get(list_properties_handler).post(create_property_handler),
        )
        .route(
            "/:id",
            get(get_property_handler)
                .put(update_property_handler)
                .delete(delete_property_handler),
        )
        .route("/:id/similar", get(similar_properties_handler));

    let favorites = Router::new()
        .route(
            "/",
            get(list_favorites_handler).delete(clear_favorites_handler),
        )
        .route(
            "/:property_id",
            post(add_favorite_handler).delete(remove_favorite_handler),
        );

    let recommendations = Router::new()
        .route("/", post(create_recommendation_handler))
        .route("/received", get(received_recommendations_handler))
        .route("/sent", get(sent_recommendations_handler))
        .route("/:id/view", patch(mark_viewed_handler));

    let cache = Router::new()
        .route("/", delete(cache_clear_handler))
        .route("/stats", get(cache_stats_handler));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/auth", auth)
        .nest("/api/properties", properties)
        .nest("/api/favorites", favorites)
        .nest("/api/recommendations", recommendations)
        .nest("/api/cache", cache)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
