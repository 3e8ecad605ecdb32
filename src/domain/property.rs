//! Property listings
//!
//! The listing record, the partial update applied to it, and the filter used
//! by search.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Price band around a base listing that still counts as similar.
const SIMILAR_PRICE_BAND: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Furnished {
    Furnished,
    Semi,
    Unfurnished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListedBy {
    Agent,
    Builder,
    Owner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Rent,
    Sale,
}

// == Property ==
/// A listing as held by the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub property_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub price: f64,
    pub state: String,
    pub city: String,
    pub area_sq_ft: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub amenities: Vec<String>,
    pub furnished: Furnished,
    pub available_from: NaiveDate,
    pub listed_by: ListedBy,
    pub tags: Vec<String>,
    pub color_theme: String,
    pub rating: f64,
    pub is_verified: bool,
    pub listing_type: ListingType,
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Same city and type, price within 20% of `base`, and not `base` itself.
    pub fn is_similar_to(&self, base: &Property) -> bool {
        self.property_id != base.property_id
            && self.city.eq_ignore_ascii_case(&base.city)
            && self.property_type.eq_ignore_ascii_case(&base.property_type)
            && self.price >= base.price * (1.0 - SIMILAR_PRICE_BAND)
            && self.price <= base.price * (1.0 + SIMILAR_PRICE_BAND)
    }

    /// Applies every field present in `patch` and bumps `updated_at`.
    pub fn apply(&mut self, patch: PropertyPatch) {
        let PropertyPatch {
            title,
            property_type,
            price,
            state,
            city,
            area_sq_ft,
            bedrooms,
            bathrooms,
            amenities,
            furnished,
            available_from,
            listed_by,
            tags,
            color_theme,
            rating,
            is_verified,
            listing_type,
        } = patch;

        replace(&mut self.title, title);
        replace(&mut self.property_type, property_type);
        replace(&mut self.price, price);
        replace(&mut self.state, state);
        replace(&mut self.city, city);
        replace(&mut self.area_sq_ft, area_sq_ft);
        replace(&mut self.bedrooms, bedrooms);
        replace(&mut self.bathrooms, bathrooms);
        replace(&mut self.amenities, amenities);
        replace(&mut self.furnished, furnished);
        replace(&mut self.available_from, available_from);
        replace(&mut self.listed_by, listed_by);
        replace(&mut self.tags, tags);
        replace(&mut self.color_theme, color_theme);
        replace(&mut self.rating, rating);
        replace(&mut self.is_verified, is_verified);
        replace(&mut self.listing_type, listing_type);
        self.updated_at = Utc::now();
    }
}

fn replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

// == Property Patch ==
/// Partial update; absent fields are left untouched. Owner and id are not
/// patchable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropertyPatch {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub price: Option<f64>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub area_sq_ft: Option<f64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub amenities: Option<Vec<String>>,
    pub furnished: Option<Furnished>,
    pub available_from: Option<NaiveDate>,
    pub listed_by: Option<ListedBy>,
    pub tags: Option<Vec<String>>,
    pub color_theme: Option<String>,
    pub rating: Option<f64>,
    pub is_verified: Option<bool>,
    pub listing_type: Option<ListingType>,
}

impl PropertyPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.property_type.is_none()
            && self.price.is_none()
            && self.state.is_none()
            && self.city.is_none()
            && self.area_sq_ft.is_none()
            && self.bedrooms.is_none()
            && self.bathrooms.is_none()
            && self.amenities.is_none()
            && self.furnished.is_none()
            && self.available_from.is_none()
            && self.listed_by.is_none()
            && self.tags.is_none()
            && self.color_theme.is_none()
            && self.rating.is_none()
            && self.is_verified.is_none()
            && self.listing_type.is_none()
    }

    /// Returns an error message when a present field is out of range.
    pub fn validate(&self) -> Option<String> {
        if matches!(&self.title, Some(t) if t.trim().is_empty()) {
            return Some("Title cannot be empty".to_string());
        }
        if matches!(self.price, Some(p) if !p.is_finite() || p < 0.0) {
            return Some("Price must be a non-negative number".to_string());
        }
        if matches!(self.area_sq_ft, Some(a) if !a.is_finite() || a <= 0.0) {
            return Some("Area must be a positive number".to_string());
        }
        if matches!(self.rating, Some(r) if !(0.0..=5.0).contains(&r)) {
            return Some("Rating must be between 0 and 5".to_string());
        }
        None
    }
}

// == Property Filter ==
/// Search criteria from the listing query string. Every field is optional;
/// an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilter {
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub furnished: Option<Furnished>,
    pub listing_type: Option<ListingType>,
}

impl PropertyFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, property: &Property) -> bool {
        let text = |want: &Option<String>, have: &str| {
            want.as_deref()
                .map_or(true, |want| want.eq_ignore_ascii_case(have))
        };

        text(&self.property_type, &property.property_type)
            && text(&self.city, &property.city)
            && text(&self.state, &property.state)
            && self.min_price.map_or(true, |min| property.price >= min)
            && self.max_price.map_or(true, |max| property.price <= max)
            && self.bedrooms.map_or(true, |n| property.bedrooms == n)
            && self.bathrooms.map_or(true, |n| property.bathrooms == n)
            && self.furnished.map_or(true, |f| property.furnished == f)
            && self.listing_type.map_or(true, |t| property.listing_type == t)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::property;
    use super::*;

    #[test]
    fn test_similarity_band() {
        let owner = Uuid::new_v4();
        let base = property("P1", owner);

        let mut close = property("P2", owner);
        close.price = 119_000.0;
        assert!(close.is_similar_to(&base));

        let mut pricey = property("P3", owner);
        pricey.price = 121_000.0;
        assert!(!pricey.is_similar_to(&base));

        let mut elsewhere = property("P4", owner);
        elsewhere.city = "Mumbai".to_string();
        assert!(!elsewhere.is_similar_to(&base));

        assert!(!base.is_similar_to(&base));
    }

    #[test]
    fn test_apply_patch_touches_only_present_fields() {
        let mut listing = property("P1", Uuid::new_v4());
        let before = listing.clone();

        listing.apply(PropertyPatch {
            price: Some(95_000.0),
            tags: Some(vec!["price-drop".to_string()]),
            ..Default::default()
        });

        assert_eq!(listing.price, 95_000.0);
        assert_eq!(listing.tags, vec!["price-drop".to_string()]);
        assert_eq!(listing.title, before.title);
        assert_eq!(listing.owner, before.owner);
        assert!(listing.updated_at >= before.updated_at);
    }

    #[test]
    fn test_patch_rejects_unknown_fields() {
        let result = serde_json::from_str::<PropertyPatch>(r#"{"owner":"someone"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_validation() {
        assert!(PropertyPatch::default().validate().is_none());
        assert!(PropertyPatch::default().is_empty());

        let bad = PropertyPatch {
            rating: Some(7.5),
            ..Default::default()
        };
        assert!(bad.validate().is_some());
    }

    #[test]
    fn test_filter_matching() {
        let listing = property("P1", Uuid::new_v4());

        assert!(PropertyFilter::default().is_empty());
        assert!(PropertyFilter::default().matches(&listing));

        let filter = PropertyFilter {
            city: Some("bangalore".to_string()),
            min_price: Some(50_000.0),
            max_price: Some(150_000.0),
            listing_type: Some(ListingType::Sale),
            ..Default::default()
        };
        assert!(!filter.is_empty());
        assert!(filter.matches(&listing));

        let filter = PropertyFilter {
            bedrooms: Some(3),
            ..Default::default()
        };
        assert!(!filter.matches(&listing));
    }

    #[test]
    fn test_filter_from_query_names() {
        let filter: PropertyFilter = serde_json::from_str(
            r#"{"type":"Villa","minPrice":10,"listingType":"rent","furnished":"Unfurnished"}"#,
        )
        .unwrap();
        assert_eq!(filter.property_type.as_deref(), Some("Villa"));
        assert_eq!(filter.min_price, Some(10.0));
        assert_eq!(filter.listing_type, Some(ListingType::Rent));
        assert_eq!(filter.furnished, Some(Furnished::Unfurnished));
    }
}
