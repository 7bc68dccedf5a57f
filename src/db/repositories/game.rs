use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::constants::categories;
use crate::entities::{games, prelude::*};

/// Fields required to create a catalog entry. URL validation happens at the
/// API boundary before this struct is built.
#[derive(Debug, Clone)]
pub struct NewGame {
    pub title: String,
    pub image_url: String,
    pub download_url: String,
    pub category: String,
    pub developer: Option<String>,
    pub description: Option<String>,
    pub youtube_url: Option<String>,
    pub order: Option<i32>,
}

/// Partial update; `None` fields are left untouched. The id is never mutable.
/// `youtube_url` is doubly optional: `Some(None)` clears a stored trailer,
/// `None` leaves it as is.
#[derive(Debug, Clone, Default)]
pub struct GamePatch {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub download_url: Option<String>,
    pub category: Option<String>,
    pub developer: Option<String>,
    pub description: Option<String>,
    pub youtube_url: Option<Option<String>>,
    pub order: Option<i32>,
}

pub struct GameRepository {
    conn: DatabaseConnection,
}

impl GameRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// List entries, newest display order first. Category is an exact match
    /// unless it is the "All" sentinel; search is a case-insensitive
    /// substring match on the title. Filters combine with AND.
    pub async fn list(
        &self,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<games::Model>> {
        let mut condition = Condition::all();

        if let Some(category) = category
            && category != categories::ALL
        {
            condition = condition.add(games::Column::Category.eq(category));
        }

        if let Some(search) = search
            && !search.is_empty()
        {
            condition = condition.add(games::Column::Title.contains(search));
        }

        let rows = Games::find()
            .filter(condition)
            .order_by_desc(games::Column::Order)
            .all(&self.conn)
            .await
            .context("Failed to list games")?;

        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<games::Model>> {
        let game = Games::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query game by id")?;

        Ok(game)
    }

    pub async fn create(&self, input: NewGame) -> Result<games::Model> {
        let active = games::ActiveModel {
            title: Set(input.title),
            image_url: Set(input.image_url),
            download_url: Set(input.download_url),
            category: Set(input.category),
            developer: Set(input.developer),
            description: Set(input.description),
            youtube_url: Set(input.youtube_url),
            order: Set(input.order.unwrap_or(0)),
            ..Default::default()
        };

        let game = active
            .insert(&self.conn)
            .await
            .context("Failed to insert game")?;

        Ok(game)
    }

    /// Applies only the supplied fields. Returns `None` when the id does not
    /// exist.
    pub async fn update(&self, id: i32, patch: GamePatch) -> Result<Option<games::Model>> {
        let Some(existing) = Games::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query game for update")?
        else {
            return Ok(None);
        };

        let mut active: games::ActiveModel = existing.into();

        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(image_url) = patch.image_url {
            active.image_url = Set(image_url);
        }
        if let Some(download_url) = patch.download_url {
            active.download_url = Set(download_url);
        }
        if let Some(category) = patch.category {
            active.category = Set(category);
        }
        if let Some(developer) = patch.developer {
            active.developer = Set(Some(developer));
        }
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        if let Some(youtube_url) = patch.youtube_url {
            active.youtube_url = Set(youtube_url);
        }
        if let Some(order) = patch.order {
            active.order = Set(order);
        }

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update game")?;

        Ok(Some(updated))
    }

    /// Idempotent: deleting a missing id is not an error.
    pub async fn delete(&self, id: i32) -> Result<()> {
        Games::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete game")?;

        Ok(())
    }

    /// Display-order hint update for one entry.
    pub async fn set_order(&self, id: i32, order: i32) -> Result<()> {
        Games::update_many()
            .col_expr(games::Column::Order, Expr::value(order))
            .filter(games::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to update game order")?;

        Ok(())
    }

    pub async fn count(&self) -> Result<u64> {
        let count = Games::find()
            .count(&self.conn)
            .await
            .context("Failed to count games")?;

        Ok(count)
    }
}
