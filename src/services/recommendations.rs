//! Peer recommendations. Embedded listings are read through the property
//! cache; recommendations themselves are not cached.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::PropertyService;
use crate::domain::{Property, Recommendation, UserProfile, UserSummary};
use crate::error::{AppError, Result};
use crate::models::requests::normalize_email;
use crate::models::{CreateRecommendationRequest, RecommendationView};
use crate::store::{DocumentStore, StoreError};

#[derive(Clone)]
pub struct RecommendationService {
    store: Arc<dyn DocumentStore>,
    properties: PropertyService,
}

/// Which side of a recommendation to embed as the counterpart.
#[derive(Clone, Copy)]
enum Side {
    Sender,
    Recipient,
}

impl RecommendationService {
    pub fn new(store: Arc<dyn DocumentStore>, properties: PropertyService) -> Self {
        Self { store, properties }
    }

    pub async fn create(
        &self,
        sender: &UserProfile,
        req: CreateRecommendationRequest,
    ) -> Result<RecommendationView> {
        if let Some(msg) = req.validate() {
            return Err(AppError::InvalidRequest(msg));
        }

        let recipient = self
            .store
            .find_user_by_email(&normalize_email(&req.recipient_email))
            .await?
            .ok_or_else(|| AppError::NotFound("Recipient user not found".to_string()))?;
        if recipient.id == sender.id {
            return Err(AppError::InvalidRequest(
                "You cannot recommend a property to yourself".to_string(),
            ));
        }

        let property_id = req.property_id.trim();
        let property = self.properties.get(property_id).await?;

        let message = req
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        let rec = self
            .store
            .insert_recommendation(Recommendation::new(
                property_id,
                sender.id,
                recipient.id,
                message,
            ))
            .await?;

        info!(recommendation_id = %rec.id, from = %sender.id, to = %recipient.id, "recommendation sent");
        Ok(RecommendationView {
            recommendation: rec,
            property: Some(property),
            counterpart: Some(recipient.summary()),
        })
    }

    /// Recommendations addressed to `user_id`, newest first, with the sender
    /// embedded.
    pub async fn received(&self, user_id: Uuid) -> Result<Vec<RecommendationView>> {
        let recs = self.store.recommendations_to(user_id).await?;
        self.views(recs, Side::Sender).await
    }

    /// Recommendations sent by `user_id`, newest first, with the recipient
    /// embedded.
    pub async fn sent(&self, user_id: Uuid) -> Result<Vec<RecommendationView>> {
        let recs = self.store.recommendations_from(user_id).await?;
        self.views(recs, Side::Recipient).await
    }

    /// Only the recipient may mark a recommendation, and only while pending.
    pub async fn mark_viewed(&self, user_id: Uuid, id: Uuid) -> Result<RecommendationView> {
        let rec = self.store.mark_recommendation_viewed(id, user_id).await?;
        self.view(rec, Side::Sender).await
    }

    async fn views(&self, recs: Vec<Recommendation>, side: Side) -> Result<Vec<RecommendationView>> {
        let mut views = Vec::with_capacity(recs.len());
        for rec in recs {
            views.push(self.view(rec, side).await?);
        }
        Ok(views)
    }

    async fn view(&self, rec: Recommendation, side: Side) -> Result<RecommendationView> {
        let counterpart_id = match side {
            Side::Sender => rec.from_user,
            Side::Recipient => rec.to_user,
        };
        Ok(RecommendationView {
            property: self.embedded_property(&rec.property_id).await?,
            counterpart: self.counterpart(counterpart_id).await?,
            recommendation: rec,
        })
    }

    /// `None` once the listing has been deleted.
    async fn embedded_property(&self, property_id: &str) -> Result<Option<Property>> {
        match self.properties.get(property_id).await {
            Ok(property) => Ok(Some(property)),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn counterpart(&self, user_id: Uuid) -> Result<Option<UserSummary>> {
        match self.store.find_user(user_id).await {
            Ok(user) => Ok(Some(user.summary())),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
