//! Services Module
//!
//! Business operations over the document store. Every cached read goes
//! through [`Cache::get_or_load`](crate::cache::Cache::get_or_load) and every
//! write invalidates the keys it affects after the store commits.

pub mod auth;
mod favorites;
mod properties;
mod recommendations;
mod users;

pub use auth::TokenIssuer;
pub use favorites::FavoriteService;
pub use properties::{PropertyService, MAX_SIMILAR};
pub use recommendations::RecommendationService;
pub use users::UserService;
