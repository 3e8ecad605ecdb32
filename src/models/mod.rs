//! Request and Response models for the listing API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    CreatePropertyRequest, CreateRecommendationRequest, LoginRequest, RegisterRequest,
    UpdateProfileRequest,
};
pub use responses::{
    AuthResponse, CacheStatsResponse, ClearFavoritesResponse, HealthResponse, MessageResponse,
    RecommendationView,
};
