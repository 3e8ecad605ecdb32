//! Canonical cache keys
//!
//! One key per cached scope. Read paths and write paths must build keys
//! through these functions so a write always hits the key a read populated.

use std::fmt::Display;

/// Every property, newest first.
pub const ALL_PROPERTIES: &str = "properties:all";

/// A single property by its property id.
pub fn property(id: impl Display) -> String {
    format!("property:{id}")
}

/// The properties a user has favorited.
pub fn user_favorites(user_id: impl Display) -> String {
    format!("user_favorites:{user_id}")
}

/// A user's public profile.
pub fn user(user_id: impl Display) -> String {
    format!("user:{user_id}")
}
