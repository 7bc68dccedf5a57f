use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::{admins, prelude::*};

/// Admin credential data returned from the repository (without the
/// password hash).
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: String,
    pub email: String,
    pub is_super_admin: bool,
    pub created_at: String,
}

impl From<admins::Model> for Admin {
    fn from(model: admins::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            is_super_admin: model.is_super_admin,
            created_at: model.created_at,
        }
    }
}

pub struct AdminRepository {
    conn: DatabaseConnection,
}

impl AdminRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let admin = Admins::find()
            .filter(admins::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query admin by email")?;

        Ok(admin.map(Admin::from))
    }

    pub async fn list(&self) -> Result<Vec<Admin>> {
        let rows = Admins::find()
            .all(&self.conn)
            .await
            .context("Failed to list admins")?;

        Ok(rows.into_iter().map(Admin::from).collect())
    }

    /// Verify a password against the stored hash for this email.
    /// Returns the matching credential on success, `None` otherwise
    /// (including when no row exists).
    ///
    /// Note: `spawn_blocking` because Argon2 verification is CPU-intensive
    /// and would block the async runtime if run directly.
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<Option<Admin>> {
        let admin = Admins::find()
            .filter(admins::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query admin for password verification")?;

        let Some(admin) = admin else {
            return Ok(None);
        };

        let password_hash = admin.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || verify_password(&password, &password_hash))
            .await
            .context("Password verification task panicked")??;

        Ok(is_valid.then(|| Admin::from(admin)))
    }

    pub async fn create(
        &self,
        email: &str,
        password: &str,
        is_super_admin: bool,
        config: &SecurityConfig,
    ) -> Result<Admin> {
        let password = password.to_string();
        let config = config.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let active = admins::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash),
            is_super_admin: Set(is_super_admin),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        let admin = active
            .insert(&self.conn)
            .await
            .context("Failed to insert admin")?;

        Ok(Admin::from(admin))
    }

    pub async fn update_password(
        &self,
        email: &str,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        let admin = Admins::find()
            .filter(admins::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query admin for password update")?
            .ok_or_else(|| anyhow::anyhow!("Admin not found: {email}"))?;

        let password = new_password.to_string();
        let config = config.clone();
        let new_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let mut active: admins::ActiveModel = admin.into();
        active.password_hash = Set(new_hash);
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Idempotent: deleting a missing email is not an error.
    pub async fn delete_by_email(&self, email: &str) -> Result<()> {
        Admins::delete_many()
            .filter(admins::Column::Email.eq(email))
            .exec(&self.conn)
            .await
            .context("Failed to delete admin")?;

        Ok(())
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses default params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Verify a password against a PHC-format Argon2 hash string.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    let argon2 = Argon2::default();
    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("hunter2secret", None).unwrap();
        assert!(verify_password("hunter2secret", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password", None).unwrap();
        let b = hash_password("same-password", None).unwrap();
        assert_ne!(a, b);
    }
}
