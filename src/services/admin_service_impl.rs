//! `SeaORM` implementation of the `AdminService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::config::SecurityConfig;
use crate::constants::PRIMARY_ADMIN_EMAIL;
use crate::db::{Admin, Store};
use crate::services::admin_service::{AdminError, AdminService};

pub struct SeaOrmAdminService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAdminService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

#[async_trait]
impl AdminService for SeaOrmAdminService {
    async fn promote(&self, email: &str, password: Option<&str>) -> Result<(), AdminError> {
        if email.is_empty() {
            return Err(AdminError::Validation("Email required".to_string()));
        }

        // A user row from the external path may or may not exist; raise the
        // flag when it does.
        if self.store.get_user_by_email(email).await?.is_some() {
            self.store.set_user_admin_by_email(email, true).await?;
        }

        match self.store.get_admin_by_email(email).await? {
            None => {
                let Some(password) = password else {
                    return Err(AdminError::Validation(
                        "Password required for new admin".to_string(),
                    ));
                };
                self.store
                    .create_admin(email, password, false, &self.security)
                    .await?;
            }
            Some(_) => {
                if let Some(password) = password {
                    self.store
                        .update_admin_password(email, password, &self.security)
                        .await?;
                }
            }
        }

        info!("Promoted {email} to admin");
        Ok(())
    }

    async fn remove(&self, email: &str) -> Result<(), AdminError> {
        if email.is_empty() {
            return Err(AdminError::Validation("Email required".to_string()));
        }

        if email == PRIMARY_ADMIN_EMAIL {
            return Err(AdminError::Protected(
                "Cannot remove primary admin".to_string(),
            ));
        }

        self.store.delete_admin_by_email(email).await?;
        self.store.set_user_admin_by_email(email, false).await?;

        info!("Removed admin {email}");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Admin>, AdminError> {
        Ok(self.store.list_admins().await?)
    }

    async fn create(&self, email: &str, password: &str) -> Result<Admin, AdminError> {
        let admin = self
            .store
            .create_admin(email, password, false, &self.security)
            .await?;

        info!("Created admin {email}");
        Ok(admin)
    }
}
