//! Request DTOs for the listing API
//!
//! Defines the structure of incoming HTTP request bodies. Each body with
//! constraints beyond its types has a `validate` returning the first problem.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{Furnished, ListedBy, ListingType, Property};

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

fn looks_like_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    matches!(
        (parts.next(), parts.next()),
        (Some(local), Some(domain)) if !local.is_empty() && domain.contains('.')
    )
}

/// Lowercased and trimmed, so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Request body for `POST /api/auth/register`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Option<String> {
        if !looks_like_email(self.email.trim()) {
            return Some("A valid email is required".to_string());
        }
        if self.password.len() < MIN_PASSWORD_LENGTH {
            return Some(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            ));
        }
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Some("First and last name are required".to_string());
        }
        None
    }
}

/// Request body for `POST /api/auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `PUT /api/auth/profile`. Only these fields may change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Option<String> {
        if self.first_name.is_none() && self.last_name.is_none() && self.password.is_none() {
            return Some("Nothing to update".to_string());
        }
        if matches!(&self.first_name, Some(n) if n.trim().is_empty())
            || matches!(&self.last_name, Some(n) if n.trim().is_empty())
        {
            return Some("Names cannot be empty".to_string());
        }
        if matches!(&self.password, Some(p) if p.len() < MIN_PASSWORD_LENGTH) {
            return Some(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            ));
        }
        None
    }
}

fn default_color_theme() -> String {
    "#ffffff".to_string()
}

/// Request body for `POST /api/properties`
///
/// `propertyId` is generated when omitted; the owner is always the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyRequest {
    #[serde(default)]
    pub property_id: Option<String>,
    pub title: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub price: f64,
    pub state: String,
    pub city: String,
    pub area_sq_ft: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub furnished: Furnished,
    pub available_from: NaiveDate,
    pub listed_by: ListedBy,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_color_theme")]
    pub color_theme: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub is_verified: bool,
    pub listing_type: ListingType,
}

impl CreatePropertyRequest {
    pub fn validate(&self) -> Option<String> {
        if matches!(&self.property_id, Some(id) if id.trim().is_empty()) {
            return Some("Property id cannot be empty".to_string());
        }
        if self.title.trim().is_empty() {
            return Some("Title cannot be empty".to_string());
        }
        if self.city.trim().is_empty() || self.state.trim().is_empty() {
            return Some("City and state are required".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Some("Price must be a non-negative number".to_string());
        }
        if !self.area_sq_ft.is_finite() || self.area_sq_ft <= 0.0 {
            return Some("Area must be a positive number".to_string());
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Some("Rating must be between 0 and 5".to_string());
        }
        None
    }

    /// Builds the stored record owned by `owner`.
    pub fn into_property(self, owner: Uuid) -> Property {
        let now = Utc::now();
        let property_id = self
            .property_id
            .map(|id| id.trim().to_string())
            .unwrap_or_else(|| format!("PROP-{}", Uuid::new_v4().simple()));

        Property {
            property_id,
            title: self.title,
            property_type: self.property_type,
            price: self.price,
            state: self.state,
            city: self.city,
            area_sq_ft: self.area_sq_ft,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            amenities: self.amenities,
            furnished: self.furnished,
            available_from: self.available_from,
            listed_by: self.listed_by,
            tags: self.tags,
            color_theme: self.color_theme,
            rating: self.rating,
            is_verified: self.is_verified,
            listing_type: self.listing_type,
            owner,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request body for `POST /api/recommendations`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecommendationRequest {
    pub property_id: String,
    pub recipient_email: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl CreateRecommendationRequest {
    pub fn validate(&self) -> Option<String> {
        if self.property_id.trim().is_empty() {
            return Some("Property id is required".to_string());
        }
        if !looks_like_email(self.recipient_email.trim()) {
            return Some("A valid recipient email is required".to_string());
        }
        None
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// JSON body for a valid listing with the given id.
    pub fn create_property_json(id: &str) -> String {
        format!(
            r#"{{"propertyId":"{id}","title":"Sea view flat","type":"Apartment","price":250000,
            "state":"Goa","city":"Panaji","areaSqFt":900,"bedrooms":2,"bathrooms":1,
            "furnished":"Semi","availableFrom":"2025-03-01","listedBy":"Agent","listingType":"sale"}}"#
        )
    }
}
