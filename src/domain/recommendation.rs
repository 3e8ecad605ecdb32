//! Peer recommendations: one user pointing a listing out to another.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationStatus {
    Pending,
    Viewed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: Uuid,
    pub property_id: String,
    pub from_user: Uuid,
    pub to_user: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: RecommendationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recommendation {
    pub fn new(
        property_id: impl Into<String>,
        from_user: Uuid,
        to_user: Uuid,
        message: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            property_id: property_id.into(),
            from_user,
            to_user,
            message,
            status: RecommendationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RecommendationStatus::Pending
    }

    /// A second pending recommendation of the same listing between the same
    /// two users is a duplicate.
    pub fn duplicates(&self, other: &Recommendation) -> bool {
        self.is_pending()
            && other.is_pending()
            && self.property_id == other.property_id
            && self.from_user == other.from_user
            && self.to_user == other.to_user
    }
}
