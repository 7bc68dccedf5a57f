//! Domain service for authentication.
//!
//! Two mutually exclusive paths populate a session: a password check
//! against the admin credential table, and the external identity provider
//! whose verified claims are upserted into a user record. Both produce the
//! same [`Principal`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clients::oidc::{IdentityClaims, TokenResponse};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Deliberately generic: the caller must not learn whether the email
    /// exists.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// The authenticated identity associated with a session, regardless of
/// which path authenticated it. Stored server-side in the session store and
/// resolved explicitly at the start of each request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,

    pub email: String,

    pub is_admin: bool,

    pub is_super_admin: bool,

    /// Unix seconds. Always set; an expired principal is unauthenticated.
    pub expires_at: i64,

    /// Present only for external-identity sessions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claims: Option<IdentityClaims>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Principal {
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= chrono::Utc::now().timestamp()
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Password path: verifies the credential table, falling back to the
    /// primary-admin bootstrap credential when no row matches.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login_password(&self, email: &str, password: &str) -> Result<Principal, AuthError>;

    /// External path: upserts the user record from verified provider claims
    /// and builds the session principal.
    async fn login_external(
        &self,
        claims: IdentityClaims,
        tokens: TokenResponse,
    ) -> Result<Principal, AuthError>;
}
