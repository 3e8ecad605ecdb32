//! A user's favorite listings, cached as `user_favorites:<user>`.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::cache::{keys, Cache};
use crate::domain::Property;
use crate::error::{AppError, Result};
use crate::store::DocumentStore;

#[derive(Clone)]
pub struct FavoriteService {
    store: Arc<dyn DocumentStore>,
    cache: Cache,
}

impl FavoriteService {
    pub fn new(store: Arc<dyn DocumentStore>, cache: Cache) -> Self {
        Self { store, cache }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Property>> {
        self.cache
            .get_or_load(&keys::user_favorites(user_id), || async {
                Ok::<_, AppError>(self.store.favorites_of(user_id).await?)
            })
            .await
    }

    /// Adding a listing that is already a favorite is a no-op that still
    /// succeeds.
    pub async fn add(&self, user_id: Uuid, property_id: &str) -> Result<Property> {
        let property = self.store.add_favorite(user_id, property_id).await?;
        self.invalidate(user_id).await;
        debug!(user_id = %user_id, property_id, "favorite added");
        Ok(property)
    }

    pub async fn remove(&self, user_id: Uuid, property_id: &str) -> Result<Property> {
        let property = self.store.remove_favorite(user_id, property_id).await?;
        self.invalidate(user_id).await;
        debug!(user_id = %user_id, property_id, "favorite removed");
        Ok(property)
    }

    /// Returns how many favorites were removed.
    pub async fn clear(&self, user_id: Uuid) -> Result<usize> {
        let removed = self.store.clear_favorites(user_id).await?;
        self.invalidate(user_id).await;
        Ok(removed)
    }

    async fn invalidate(&self, user_id: Uuid) {
        self.cache.invalidate([keys::user_favorites(user_id)]).await;
    }
}
