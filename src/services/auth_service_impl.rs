//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tokio::task;

use crate::clients::oidc::{IdentityClaims, TokenResponse};
use crate::config::SecurityConfig;
use crate::constants::{PRIMARY_ADMIN_EMAIL, PRIMARY_ADMIN_ID, session};
use crate::db::repositories::admin::{hash_password, verify_password};
use crate::db::{Store, UpsertUser};
use crate::services::auth_service::{AuthError, AuthService, Principal};

pub struct SeaOrmAuthService {
    store: Store,
    /// Argon2 hash of the configured bootstrap password, computed once so
    /// the fallback branch verifies through the same path as stored hashes.
    bootstrap_hash: String,
}

impl SeaOrmAuthService {
    pub fn new(store: Store, security: &SecurityConfig) -> anyhow::Result<Self> {
        let bootstrap_hash = hash_password(&security.bootstrap_password, Some(security))?;

        Ok(Self {
            store,
            bootstrap_hash,
        })
    }

    fn expiry() -> i64 {
        chrono::Utc::now().timestamp() + session::TTL_SECONDS
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login_password(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        if let Some(admin) = self.store.verify_admin_password(email, password).await? {
            return Ok(Principal {
                id: admin.id,
                email: admin.email,
                is_admin: true,
                is_super_admin: admin.is_super_admin,
                expires_at: Self::expiry(),
                claims: None,
                access_token: None,
                refresh_token: None,
            });
        }

        // The primary admin always authenticates with the bootstrap
        // password, whether a credential row exists for it or not.
        if email == PRIMARY_ADMIN_EMAIL {
            let password = password.to_string();
            let bootstrap_hash = self.bootstrap_hash.clone();
            let is_valid =
                task::spawn_blocking(move || verify_password(&password, &bootstrap_hash))
                    .await
                    .map_err(|e| AuthError::Internal(e.to_string()))?
                    .map_err(AuthError::from)?;

            if is_valid {
                return Ok(Principal {
                    id: PRIMARY_ADMIN_ID.to_string(),
                    email: email.to_string(),
                    is_admin: true,
                    is_super_admin: true,
                    expires_at: Self::expiry(),
                    claims: None,
                    access_token: None,
                    refresh_token: None,
                });
            }
        }

        Err(AuthError::InvalidCredentials)
    }

    async fn login_external(
        &self,
        claims: IdentityClaims,
        tokens: TokenResponse,
    ) -> Result<Principal, AuthError> {
        let user = self
            .store
            .upsert_user(UpsertUser {
                id: claims.sub.clone(),
                email: claims.email.clone(),
                first_name: claims.first_name.clone(),
                last_name: claims.last_name.clone(),
                profile_image_url: claims.profile_image_url.clone(),
                is_admin: claims.email == PRIMARY_ADMIN_EMAIL,
            })
            .await?;

        let expires_at = claims.exp.unwrap_or_else(|| {
            tokens
                .expires_in
                .map_or_else(Self::expiry, |secs| chrono::Utc::now().timestamp() + secs)
        });

        Ok(Principal {
            id: user.id,
            email: user.email,
            is_admin: user.is_admin,
            is_super_admin: false,
            expires_at,
            claims: Some(claims),
            access_token: Some(tokens.access_token),
            refresh_token: tokens.refresh_token,
        })
    }
}
