use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::{prelude::*, users};

/// Profile fields carried by an identity-provider upsert.
#[derive(Debug, Clone)]
pub struct UpsertUser {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub is_admin: bool,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<users::Model>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by id")?;

        Ok(user)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user)
    }

    /// Upsert keyed by subject id, refreshing profile fields on every
    /// external login. The admin flag is only ever raised here, never
    /// lowered: a previously promoted user keeps the flag when `is_admin`
    /// in the claims-derived input is false.
    pub async fn upsert(&self, input: UpsertUser) -> Result<users::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let existing = self.get_by_id(&input.id).await?;
        let is_admin = input.is_admin || existing.as_ref().is_some_and(|u| u.is_admin);

        let active = users::ActiveModel {
            id: Set(input.id.clone()),
            email: Set(input.email),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            profile_image_url: Set(input.profile_image_url),
            is_admin: Set(is_admin),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        Users::insert(active)
            .on_conflict(
                OnConflict::column(users::Column::Id)
                    .update_columns([
                        users::Column::Email,
                        users::Column::FirstName,
                        users::Column::LastName,
                        users::Column::ProfileImageUrl,
                        users::Column::IsAdmin,
                        users::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await
            .context("Failed to upsert user")?;

        self.get_by_id(&input.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User vanished after upsert"))
    }

    /// Set or clear the admin flag on any user row with this email.
    /// A no-op when no such user exists.
    pub async fn set_admin_by_email(&self, email: &str, is_admin: bool) -> Result<()> {
        Users::update_many()
            .col_expr(users::Column::IsAdmin, Expr::value(is_admin))
            .col_expr(
                users::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(users::Column::Email.eq(email))
            .exec(&self.conn)
            .await
            .context("Failed to update user admin flag")?;

        Ok(())
    }
}
