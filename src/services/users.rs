//! Accounts: registration, login, token authentication and profiles
//!
//! Profiles are read through the `user:<id>` cache entry; profile updates
//! invalidate it. Token authentication reuses the same cached profile.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::auth::{hash_password, verify_password, TokenIssuer};
use crate::cache::{keys, Cache};
use crate::domain::{Role, User, UserPatch, UserProfile};
use crate::error::{AppError, Result};
use crate::models::requests::{normalize_email, MIN_PASSWORD_LENGTH};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::store::DocumentStore;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn DocumentStore>,
    cache: Cache,
    tokens: TokenIssuer,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>, cache: Cache, tokens: TokenIssuer) -> Self {
        Self {
            store,
            cache,
            tokens,
        }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse> {
        if let Some(msg) = req.validate() {
            return Err(AppError::InvalidRequest(msg));
        }

        let email = normalize_email(&req.email);
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let now = chrono::Utc::now();
        let user = self
            .store
            .insert_user(User {
                id: Uuid::new_v4(),
                email,
                password_hash: hash_password(&req.password)?,
                first_name: req.first_name.trim().to_string(),
                last_name: req.last_name.trim().to_string(),
                role: Role::User,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(user_id = %user.id, "user registered");
        self.auth_response(&user)
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse> {
        let user = self
            .store
            .find_user_by_email(&normalize_email(&req.email))
            .await?
            .filter(|user| verify_password(&req.password, &user.password_hash))
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        self.auth_response(&user)
    }

    /// Resolves a bearer token to the caller's profile.
    pub async fn authenticate(&self, token: &str) -> Result<UserProfile> {
        let user_id = self.tokens.verify(token)?;
        match self.profile(user_id).await {
            Err(AppError::NotFound(_)) => {
                Err(AppError::Unauthorized("Please authenticate.".to_string()))
            }
            other => other,
        }
    }

    // == Read path ==
    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile> {
        self.cache
            .get_or_load(&keys::user(user_id), || async {
                Ok::<_, AppError>(self.store.find_user(user_id).await?.profile())
            })
            .await
    }

    // == Write path ==
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<UserProfile> {
        if let Some(msg) = req.validate() {
            return Err(AppError::InvalidRequest(msg));
        }

        let password_hash = req.password.as_deref().map(hash_password).transpose()?;
        let patch = UserPatch {
            first_name: req.first_name.map(|n| n.trim().to_string()),
            last_name: req.last_name.map(|n| n.trim().to_string()),
            password_hash,
            role: None,
        };

        let user = self.store.update_user(user_id, patch).await?;
        self.cache.invalidate([keys::user(user_id)]).await;
        Ok(user.profile())
    }

    /// Makes `email` an admin account with `password`, creating it when it
    /// does not exist yet. Safe to run on every boot.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<UserProfile> {
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::InvalidRequest(format!(
                "Admin password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let email = normalize_email(email);
        let password_hash = hash_password(password)?;
        let admin = match self.store.find_user_by_email(&email).await? {
            Some(user) => {
                let patch = UserPatch {
                    password_hash: Some(password_hash),
                    role: Some(Role::Admin),
                    ..Default::default()
                };
                self.store.update_user(user.id, patch).await?
            }
            None => {
                let now = chrono::Utc::now();
                self.store
                    .insert_user(User {
                        id: Uuid::new_v4(),
                        email,
                        password_hash,
                        first_name: "Admin".to_string(),
                        last_name: "User".to_string(),
                        role: Role::Admin,
                        created_at: now,
                        updated_at: now,
                    })
                    .await?
            }
        };

        self.cache.invalidate([keys::user(admin.id)]).await;
        info!(user_id = %admin.id, "admin account ready");
        Ok(admin.profile())
    }

    fn auth_response(&self, user: &User) -> Result<AuthResponse> {
        Ok(AuthResponse {
            user: user.profile(),
            token: self.tokens.issue(user.id)?,
        })
    }
}
