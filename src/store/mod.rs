//! Document Store Module
//!
//! The system of record behind the cache. Services talk to it through the
//! [`DocumentStore`] trait; each method is atomic for the records it touches.

mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Property, PropertyFilter, PropertyPatch, Recommendation, User, UserPatch};

pub use memory::MemoryDocumentStore;

// == Store Error ==
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No record matched
    #[error("{0}")]
    NotFound(String),

    /// Insert would break a uniqueness rule
    #[error("{0}")]
    Duplicate(String),

    /// Connectivity or validation failure inside the store
    #[error("{0}")]
    Failure(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A deleted listing together with the users whose favorites it was removed
/// from, so their cached lists can be invalidated.
#[derive(Debug, Clone)]
pub struct DeletedProperty {
    pub property: Property,
    pub favorited_by: Vec<Uuid>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    // == Users ==
    /// Inserts a user; `Duplicate` if the email is taken.
    async fn insert_user(&self, user: User) -> StoreResult<User>;
    async fn find_user(&self, id: Uuid) -> StoreResult<User>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn update_user(&self, id: Uuid, patch: UserPatch) -> StoreResult<User>;

    // == Properties ==
    /// Inserts a listing; `Duplicate` if the property id is taken.
    async fn insert_property(&self, property: Property) -> StoreResult<Property>;
    async fn find_property(&self, id: &str) -> StoreResult<Property>;
    /// Listings matching `filter`, newest first.
    async fn find_properties(&self, filter: &PropertyFilter) -> StoreResult<Vec<Property>>;
    async fn update_property(&self, id: &str, patch: PropertyPatch) -> StoreResult<Property>;
    /// Deletes a listing and every favorite pointing at it.
    async fn delete_property(&self, id: &str) -> StoreResult<DeletedProperty>;

    // == Favorites ==
    /// Adds `property_id` to the user's favorites (set semantics).
    async fn add_favorite(&self, user_id: Uuid, property_id: &str) -> StoreResult<Property>;
    async fn remove_favorite(&self, user_id: Uuid, property_id: &str) -> StoreResult<Property>;
    /// The user's favorite listings, newest first.
    async fn favorites_of(&self, user_id: Uuid) -> StoreResult<Vec<Property>>;
    async fn favorited_by(&self, property_id: &str) -> StoreResult<Vec<Uuid>>;
    /// Empties the user's favorites, returning how many were removed.
    async fn clear_favorites(&self, user_id: Uuid) -> StoreResult<usize>;

    // == Recommendations ==
    /// Inserts a recommendation; `Duplicate` if an equivalent one is pending.
    async fn insert_recommendation(&self, rec: Recommendation) -> StoreResult<Recommendation>;
    /// Received by `user_id`, newest first.
    async fn recommendations_to(&self, user_id: Uuid) -> StoreResult<Vec<Recommendation>>;
    /// Sent by `user_id`, newest first.
    async fn recommendations_from(&self, user_id: Uuid) -> StoreResult<Vec<Recommendation>>;
    /// Marks a pending recommendation addressed to `recipient` as viewed.
    async fn mark_recommendation_viewed(
        &self,
        id: Uuid,
        recipient: Uuid,
    ) -> StoreResult<Recommendation>;
}
