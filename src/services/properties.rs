//! Property listings: read-through reads, write-then-invalidate writes
//!
//! Cached scopes:
//! - `properties:all`: the unfiltered listing, dropped by every property write
//! - `property:<id>`: one listing, dropped by writes to that id
//! - `user_favorites:<user>`: dropped for every user who favorited a listing
//!   that is updated or deleted, since those lists embed the listing

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::{keys, Cache};
use crate::domain::{Property, PropertyFilter, PropertyPatch, UserProfile};
use crate::error::{AppError, Result};
use crate::models::CreatePropertyRequest;
use crate::store::DocumentStore;

/// Upper bound on similar listings returned for one property.
pub const MAX_SIMILAR: usize = 5;

#[derive(Clone)]
pub struct PropertyService {
    store: Arc<dyn DocumentStore>,
    cache: Cache,
}

impl PropertyService {
    pub fn new(store: Arc<dyn DocumentStore>, cache: Cache) -> Self {
        Self { store, cache }
    }

    // == Read path ==
    /// Every listing (cached) when `filter` is empty, otherwise a search
    /// straight against the store.
    pub async fn list(&self, filter: &PropertyFilter) -> Result<Vec<Property>> {
        if !filter.is_empty() {
            return Ok(self.store.find_properties(filter).await?);
        }

        self.cache
            .get_or_load(keys::ALL_PROPERTIES, || async {
                Ok::<_, AppError>(self.store.find_properties(&PropertyFilter::default()).await?)
            })
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Property> {
        self.cache
            .get_or_load(&keys::property(id), || async {
                Ok::<_, AppError>(self.store.find_property(id).await?)
            })
            .await
    }

    /// Listings in the same city and category priced within 20% of `id`.
    pub async fn similar(&self, id: &str) -> Result<Vec<Property>> {
        let base = self.get(id).await?;
        let all = self.list(&PropertyFilter::default()).await?;
        Ok(all
            .into_iter()
            .filter(|candidate| candidate.is_similar_to(&base))
            .take(MAX_SIMILAR)
            .collect())
    }

    // == Write path ==
    pub async fn create(&self, owner: &UserProfile, req: CreatePropertyRequest) -> Result<Property> {
        if let Some(msg) = req.validate() {
            return Err(AppError::InvalidRequest(msg));
        }

        let property = self.store.insert_property(req.into_property(owner.id)).await?;
        self.cache
            .invalidate([
                keys::property(&property.property_id),
                keys::ALL_PROPERTIES.to_string(),
            ])
            .await;

        info!(property_id = %property.property_id, owner = %owner.id, "property created");
        Ok(property)
    }

    pub async fn update(
        &self,
        actor: &UserProfile,
        id: &str,
        patch: PropertyPatch,
    ) -> Result<Property> {
        if patch.is_empty() {
            return Err(AppError::InvalidRequest("Nothing to update".to_string()));
        }
        if let Some(msg) = patch.validate() {
            return Err(AppError::InvalidRequest(msg));
        }

        self.authorize(actor, id).await?;
        let property = self.store.update_property(id, patch).await?;

        let fans = self.favorited_by(id).await;
        self.invalidate_listing(id, &fans).await;
        Ok(property)
    }

    pub async fn delete(&self, actor: &UserProfile, id: &str) -> Result<Property> {
        self.authorize(actor, id).await?;
        let deleted = self.store.delete_property(id).await?;

        self.invalidate_listing(id, &deleted.favorited_by).await;
        info!(property_id = %id, "property deleted");
        Ok(deleted.property)
    }

    /// Only the owner or an admin may change a listing. Checked against the
    /// store, never the cache.
    async fn authorize(&self, actor: &UserProfile, id: &str) -> Result<()> {
        let current = self.store.find_property(id).await?;
        if current.owner == actor.id || actor.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "You can only modify your own properties".to_string(),
            ))
        }
    }

    /// The write has already committed, so a failed lookup here only costs
    /// favorites-list freshness until TTL expiry.
    async fn favorited_by(&self, id: &str) -> Vec<Uuid> {
        self.store.favorited_by(id).await.unwrap_or_else(|err| {
            warn!(property_id = %id, error = %err, "could not resolve favorites to invalidate");
            Vec::new()
        })
    }

    async fn invalidate_listing(&self, id: &str, fans: &[Uuid]) {
        let mut stale = vec![keys::property(id), keys::ALL_PROPERTIES.to_string()];
        stale.extend(fans.iter().map(keys::user_favorites));
        self.cache.invalidate(stale).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::test_support::FailingKv;
    use crate::cache::MemoryKv;
    use crate::domain::Role;
    use crate::models::requests::fixtures::create_property_json;
    use crate::store::MemoryDocumentStore;
    use chrono::Utc;

    struct Harness {
        svc: PropertyService,
        store: Arc<MemoryDocumentStore>,
        cache: Cache,
    }

    fn harness() -> Harness {
        let store = Arc::new(MemoryDocumentStore::new());
        let cache = Cache::new(Arc::new(MemoryKv::new(100)), 3600);
        Harness {
            svc: PropertyService::new(store.clone(), cache.clone()),
            store,
            cache,
        }
    }

    fn profile(role: Role) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            email: "owner@example.com".to_string(),
            first_name: "Owner".to_string(),
            last_name: "One".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    fn create_req(id: &str) -> CreatePropertyRequest {
        serde_json::from_str(&create_property_json(id)).unwrap()
    }

    fn price_patch(price: f64) -> PropertyPatch {
        PropertyPatch {
            price: Some(price),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_read_update_invalidates_both_scopes() {
        let h = harness();
        let owner = profile(Role::User);

        h.svc.create(&owner, create_req("P1")).await.unwrap();
        assert!(h.cache.get::<Property>("property:P1").await.is_none());

        let read = h.svc.get("P1").await.unwrap();
        assert_eq!(h.cache.get::<Property>("property:P1").await, Some(read));
        h.svc.list(&PropertyFilter::default()).await.unwrap();
        assert!(h.cache.get::<Vec<Property>>("properties:all").await.is_some());

        h.svc.update(&owner, "P1", price_patch(1.0)).await.unwrap();

        assert!(h.cache.get::<Property>("property:P1").await.is_none());
        assert!(h.cache.get::<Vec<Property>>("properties:all").await.is_none());
        assert_eq!(h.svc.get("P1").await.unwrap().price, 1.0);
    }

    #[tokio::test]
    async fn test_hit_skips_store() {
        let h = harness();
        let owner = profile(Role::User);
        h.svc.create(&owner, create_req("P1")).await.unwrap();
        h.svc.get("P1").await.unwrap();

        // Mutate the store behind the service's back: a hit keeps serving the
        // snapshot until a write through the service invalidates it.
        h.store.update_property("P1", price_patch(7.0)).await.unwrap();
        assert_ne!(h.svc.get("P1").await.unwrap().price, 7.0);
        assert_eq!(h.cache.stats().hits, 1);
    }

    #[tokio::test]
    async fn test_create_invalidates_list() {
        let h = harness();
        let owner = profile(Role::User);
        h.svc.create(&owner, create_req("P1")).await.unwrap();
        assert_eq!(h.svc.list(&PropertyFilter::default()).await.unwrap().len(), 1);

        h.svc.create(&owner, create_req("P2")).await.unwrap();
        assert_eq!(h.svc.list(&PropertyFilter::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_of_one_id_keeps_other_ids_cached() {
        let h = harness();
        let owner = profile(Role::User);
        h.svc.create(&owner, create_req("P1")).await.unwrap();
        h.svc.create(&owner, create_req("P2")).await.unwrap();
        h.svc.get("P1").await.unwrap();
        h.svc.get("P2").await.unwrap();

        h.svc.update(&owner, "P1", price_patch(1.0)).await.unwrap();

        assert!(h.cache.get::<Property>("property:P1").await.is_none());
        assert!(h.cache.get::<Property>("property:P2").await.is_some());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cache_intact() {
        let h = harness();
        let owner = profile(Role::User);
        let stranger = profile(Role::User);
        h.svc.create(&owner, create_req("P1")).await.unwrap();
        h.svc.get("P1").await.unwrap();

        let result = h.svc.update(&stranger, "P1", price_patch(1.0)).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert!(h.cache.get::<Property>("property:P1").await.is_some());

        let result = h.svc.delete(&owner, "missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(h.cache.get::<Property>("property:P1").await.is_some());
    }

    #[tokio::test]
    async fn test_admin_may_modify_any_listing() {
        let h = harness();
        let owner = profile(Role::User);
        let admin = profile(Role::Admin);
        h.svc.create(&owner, create_req("P1")).await.unwrap();

        h.svc.update(&admin, "P1", price_patch(2.0)).await.unwrap();
        h.svc.delete(&admin, "P1").await.unwrap();
        assert!(matches!(h.svc.get("P1").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_invalidates_fans_favorites() {
        let h = harness();
        let owner = profile(Role::User);
        let fan = Uuid::new_v4();
        h.svc.create(&owner, create_req("P1")).await.unwrap();
        h.store.add_favorite(fan, "P1").await.unwrap();
        let listed = h.store.favorites_of(fan).await.unwrap();
        h.cache.set(&keys::user_favorites(fan), &listed, None).await;

        h.svc.delete(&owner, "P1").await.unwrap();

        assert!(h
            .cache
            .get::<Vec<Property>>(&keys::user_favorites(fan))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_update_invalidates_fans_favorites() {
        let h = harness();
        let owner = profile(Role::User);
        let fan = Uuid::new_v4();
        h.svc.create(&owner, create_req("P1")).await.unwrap();
        h.store.add_favorite(fan, "P1").await.unwrap();
        h.cache.set(&keys::user_favorites(fan), &Vec::<Property>::new(), None).await;

        h.svc.update(&owner, "P1", price_patch(3.0)).await.unwrap();

        assert!(h
            .cache
            .get::<Vec<Property>>(&keys::user_favorites(fan))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_filtered_list_bypasses_cache() {
        let h = harness();
        let owner = profile(Role::User);
        h.svc.create(&owner, create_req("P1")).await.unwrap();

        let filter = PropertyFilter {
            city: Some("Panaji".to_string()),
            ..Default::default()
        };
        assert_eq!(h.svc.list(&filter).await.unwrap().len(), 1);
        assert!(h.cache.get::<Vec<Property>>("properties:all").await.is_none());
    }

    #[tokio::test]
    async fn test_similar_listings() {
        let h = harness();
        let owner = profile(Role::User);
        h.svc.create(&owner, create_req("P1")).await.unwrap();
        h.svc.create(&owner, create_req("P2")).await.unwrap();
        let mut far = create_req("P3");
        far.city = "Mumbai".to_string();
        h.svc.create(&owner, far).await.unwrap();

        let similar = h.svc.similar("P1").await.unwrap();
        let ids: Vec<_> = similar.iter().map(|p| p.property_id.as_str()).collect();
        assert_eq!(ids, vec!["P2"]);
    }

    #[tokio::test]
    async fn test_unreachable_cache_leaves_every_operation_working() {
        let store = Arc::new(MemoryDocumentStore::new());
        let cache = Cache::new(Arc::new(FailingKv), 3600);
        let svc = PropertyService::new(store.clone(), cache.clone());
        let owner = profile(Role::User);

        svc.create(&owner, create_req("P1")).await.unwrap();
        svc.create(&owner, create_req("P2")).await.unwrap();
        assert_eq!(svc.get("P1").await.unwrap().property_id, "P1");
        assert_eq!(svc.list(&PropertyFilter::default()).await.unwrap().len(), 2);
        assert_eq!(svc.similar("P1").await.unwrap().len(), 1);

        svc.update(&owner, "P1", price_patch(9.0)).await.unwrap();
        assert_eq!(svc.get("P1").await.unwrap().price, 9.0);

        svc.delete(&owner, "P1").await.unwrap();
        assert!(matches!(svc.get("P1").await, Err(AppError::NotFound(_))));
        assert_eq!(
            svc.list(&PropertyFilter::default()).await.unwrap(),
            store.find_properties(&PropertyFilter::default()).await.unwrap()
        );
        assert!(cache.stats().unavailable > 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_cold_reads_converge_on_store_snapshot() {
        let h = harness();
        let owner = profile(Role::User);
        h.svc.create(&owner, create_req("P1")).await.unwrap();
        h.svc.create(&owner, create_req("P2")).await.unwrap();

        let (a, b) = (h.svc.clone(), h.svc.clone());
        let first = tokio::spawn(async move { a.list(&PropertyFilter::default()).await });
        let second = tokio::spawn(async move { b.list(&PropertyFilter::default()).await });
        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();
        let snapshot = h.store.find_properties(&PropertyFilter::default()).await.unwrap();

        assert_eq!(first, snapshot);
        assert_eq!(second, snapshot);
        assert_eq!(
            h.cache.get::<Vec<Property>>("properties:all").await,
            Some(snapshot)
        );
    }
}
