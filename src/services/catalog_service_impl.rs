//! `SeaORM` implementation of the `CatalogService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::{GamePatch, NewGame, Store};
use crate::entities::games;
use crate::services::catalog_service::{CatalogError, CatalogFilters, CatalogService, OrderUpdate};

pub struct SeaOrmCatalogService {
    store: Store,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list(&self, filters: CatalogFilters) -> Result<Vec<games::Model>, CatalogError> {
        Ok(self
            .store
            .list_games(filters.category.as_deref(), filters.search.as_deref())
            .await?)
    }

    async fn get(&self, id: i32) -> Result<games::Model, CatalogError> {
        self.store
            .get_game(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn create(&self, input: NewGame) -> Result<games::Model, CatalogError> {
        let game = self.store.create_game(input).await?;
        info!("Created game: {} (id {})", game.title, game.id);
        Ok(game)
    }

    async fn update(&self, id: i32, patch: GamePatch) -> Result<games::Model, CatalogError> {
        self.store
            .update_game(id, patch)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn delete(&self, id: i32) -> Result<(), CatalogError> {
        self.store.delete_game(id).await?;
        info!("Deleted game {id}");
        Ok(())
    }

    async fn reorder(&self, orders: &[OrderUpdate]) -> Result<(), CatalogError> {
        for item in orders {
            self.store.set_game_order(item.id, item.order).await?;
        }
        Ok(())
    }
}
