//! Shared application state

use std::sync::Arc;

use crate::cache::Cache;
use crate::config::Config;
use crate::services::{
    FavoriteService, PropertyService, RecommendationService, TokenIssuer, UserService,
};
use crate::store::DocumentStore;

/// Application state shared across all handlers.
///
/// Every service holds a clone of the same [`Cache`] facade, so a write in
/// one service invalidates what another service's read populated.
#[derive(Clone)]
pub struct AppState {
    pub cache: Cache,
    pub users: UserService,
    pub properties: PropertyService,
    pub favorites: FavoriteService,
    pub recommendations: RecommendationService,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, cache: Cache, tokens: TokenIssuer) -> Self {
        let properties = PropertyService::new(store.clone(), cache.clone());
        Self {
            users: UserService::new(store.clone(), cache.clone(), tokens),
            favorites: FavoriteService::new(store.clone(), cache.clone()),
            recommendations: RecommendationService::new(store, properties.clone()),
            properties,
            cache,
        }
    }

    /// Wires the services with token settings from `config`.
    pub fn from_config(config: &Config, store: Arc<dyn DocumentStore>, cache: Cache) -> Self {
        let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl_days);
        Self::new(store, cache, tokens)
    }
}
