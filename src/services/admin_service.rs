//! Domain service for managing the administrator roster.

use thiserror::Error;

use crate::db::Admin;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Attempt to remove the primary admin.
    #[error("{0}")]
    Protected(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for AdminError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for admin-roster management. All operations are
/// guarded at the API layer; only `create` additionally requires a
/// super-admin caller.
#[async_trait::async_trait]
pub trait AdminService: Send + Sync {
    /// Grants admin rights to an email. Raises the flag on any matching
    /// user row; creates or re-hashes the credential row. A password is
    /// mandatory when no credential row exists yet.
    async fn promote(&self, email: &str, password: Option<&str>) -> Result<(), AdminError>;

    /// Revokes admin rights. Idempotent on the credential delete; refuses
    /// the primary admin.
    async fn remove(&self, email: &str) -> Result<(), AdminError>;

    /// All credential rows, without password hashes.
    async fn list(&self) -> Result<Vec<Admin>, AdminError>;

    /// Raw credential creation (super-admin only at the API layer).
    async fn create(&self, email: &str, password: &str) -> Result<Admin, AdminError>;
}
