//! In-process document store
//!
//! All collections live behind one `RwLock`, so every trait method is a single
//! atomic step with respect to the others.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DeletedProperty, DocumentStore, StoreError, StoreResult};
use crate::domain::{
    Property, PropertyFilter, PropertyPatch, Recommendation, RecommendationStatus, User, UserPatch,
};

#[derive(Debug, Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    /// Email → user id
    emails: HashMap<String, Uuid>,
    properties: HashMap<String, Property>,
    /// User id → favorite property ids
    favorites: HashMap<Uuid, BTreeSet<String>>,
    recommendations: HashMap<Uuid, Recommendation>,
}

fn property_not_found() -> StoreError {
    StoreError::NotFound("Property not found".to_string())
}

fn user_not_found() -> StoreError {
    StoreError::NotFound("User not found".to_string())
}

fn newest_first<T>(mut items: Vec<T>, created: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T> {
    items.sort_by(|a, b| created(b).cmp(&created(a)));
    items
}

#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    data: RwLock<Collections>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let mut data = self.data.write().await;
        if data.emails.contains_key(&user.email) {
            return Err(StoreError::Duplicate("Email already registered".to_string()));
        }
        data.emails.insert(user.email.clone(), user.id);
        data.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<User> {
        self.data
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or_else(user_not_found)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let data = self.data.read().await;
        Ok(data
            .emails
            .get(email)
            .and_then(|id| data.users.get(id))
            .cloned())
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> StoreResult<User> {
        let mut data = self.data.write().await;
        let user = data.users.get_mut(&id).ok_or_else(user_not_found)?;

        if let Some(first_name) = patch.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        if let Some(password_hash) = patch.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn insert_property(&self, property: Property) -> StoreResult<Property> {
        let mut data = self.data.write().await;
        if data.properties.contains_key(&property.property_id) {
            return Err(StoreError::Duplicate(format!(
                "Property '{}' already exists",
                property.property_id
            )));
        }
        data.properties
            .insert(property.property_id.clone(), property.clone());
        Ok(property)
    }

    async fn find_property(&self, id: &str) -> StoreResult<Property> {
        self.data
            .read()
            .await
            .properties
            .get(id)
            .cloned()
            .ok_or_else(property_not_found)
    }

    async fn find_properties(&self, filter: &PropertyFilter) -> StoreResult<Vec<Property>> {
        let data = self.data.read().await;
        let matching: Vec<Property> = data
            .properties
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        Ok(newest_first(matching, |p: &Property| p.created_at))
    }

    async fn update_property(&self, id: &str, patch: PropertyPatch) -> StoreResult<Property> {
        let mut data = self.data.write().await;
        let property = data.properties.get_mut(id).ok_or_else(property_not_found)?;
        property.apply(patch);
        Ok(property.clone())
    }

    async fn delete_property(&self, id: &str) -> StoreResult<DeletedProperty> {
        let mut data = self.data.write().await;
        let property = data.properties.remove(id).ok_or_else(property_not_found)?;

        let mut favorited_by = Vec::new();
        for (user_id, favorites) in data.favorites.iter_mut() {
            if favorites.remove(id) {
                favorited_by.push(*user_id);
            }
        }

        Ok(DeletedProperty {
            property,
            favorited_by,
        })
    }

    async fn add_favorite(&self, user_id: Uuid, property_id: &str) -> StoreResult<Property> {
        let mut data = self.data.write().await;
        let property = data
            .properties
            .get(property_id)
            .cloned()
            .ok_or_else(property_not_found)?;
        data.favorites
            .entry(user_id)
            .or_default()
            .insert(property_id.to_string());
        Ok(property)
    }

    async fn remove_favorite(&self, user_id: Uuid, property_id: &str) -> StoreResult<Property> {
        let mut data = self.data.write().await;
        let property = data
            .properties
            .get(property_id)
            .cloned()
            .ok_or_else(property_not_found)?;
        if let Some(favorites) = data.favorites.get_mut(&user_id) {
            favorites.remove(property_id);
        }
        Ok(property)
    }

    async fn favorites_of(&self, user_id: Uuid) -> StoreResult<Vec<Property>> {
        let data = self.data.read().await;
        let favorites: Vec<Property> = data
            .favorites
            .get(&user_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| data.properties.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(newest_first(favorites, |p: &Property| p.created_at))
    }

    async fn favorited_by(&self, property_id: &str) -> StoreResult<Vec<Uuid>> {
        let data = self.data.read().await;
        Ok(data
            .favorites
            .iter()
            .filter(|(_, ids)| ids.contains(property_id))
            .map(|(user_id, _)| *user_id)
            .collect())
    }

    async fn clear_favorites(&self, user_id: Uuid) -> StoreResult<usize> {
        let mut data = self.data.write().await;
        Ok(data
            .favorites
            .remove(&user_id)
            .map_or(0, |ids| ids.len()))
    }

    async fn insert_recommendation(&self, rec: Recommendation) -> StoreResult<Recommendation> {
        let mut data = self.data.write().await;
        if data.recommendations.values().any(|r| r.duplicates(&rec)) {
            return Err(StoreError::Duplicate(
                "You have already recommended this property to this user".to_string(),
            ));
        }
        data.recommendations.insert(rec.id, rec.clone());
        Ok(rec)
    }

    async fn recommendations_to(&self, user_id: Uuid) -> StoreResult<Vec<Recommendation>> {
        let data = self.data.read().await;
        let received: Vec<Recommendation> = data
            .recommendations
            .values()
            .filter(|r| r.to_user == user_id)
            .cloned()
            .collect();
        Ok(newest_first(received, |r: &Recommendation| r.created_at))
    }

    async fn recommendations_from(&self, user_id: Uuid) -> StoreResult<Vec<Recommendation>> {
        let data = self.data.read().await;
        let sent: Vec<Recommendation> = data
            .recommendations
            .values()
            .filter(|r| r.from_user == user_id)
            .cloned()
            .collect();
        Ok(newest_first(sent, |r: &Recommendation| r.created_at))
    }

    async fn mark_recommendation_viewed(
        &self,
        id: Uuid,
        recipient: Uuid,
    ) -> StoreResult<Recommendation> {
        let mut data = self.data.write().await;
        let rec = data
            .recommendations
            .get_mut(&id)
            .filter(|r| r.to_user == recipient && r.is_pending())
            .ok_or_else(|| StoreError::NotFound("Recommendation not found".to_string()))?;

        rec.status = RecommendationStatus::Viewed;
        rec.updated_at = Utc::now();
        Ok(rec.clone())
    }
}
