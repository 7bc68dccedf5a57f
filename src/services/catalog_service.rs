//! Domain service for the catalog of downloadable entries.

use thiserror::Error;

use crate::db::{GamePatch, NewGame};
use crate::entities::games;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Game {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Optional list filters; both absent means the full catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilters {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// One display-order assignment within a reorder request.
#[derive(Debug, Clone, Copy)]
pub struct OrderUpdate {
    pub id: i32,
    pub order: i32,
}

/// Domain service trait for the catalog. Reads are public; every mutation
/// is admin-gated at the API layer, not here.
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Filtered listing sorted by display order descending.
    async fn list(&self, filters: CatalogFilters) -> Result<Vec<games::Model>, CatalogError>;

    async fn get(&self, id: i32) -> Result<games::Model, CatalogError>;

    async fn create(&self, input: NewGame) -> Result<games::Model, CatalogError>;

    /// Applies only supplied fields; the id is never mutable.
    async fn update(&self, id: i32, patch: GamePatch) -> Result<games::Model, CatalogError>;

    /// Idempotent delete.
    async fn delete(&self, id: i32) -> Result<(), CatalogError>;

    /// Applies each order value in turn. Best-effort: a mid-sequence
    /// failure leaves earlier updates in place, acceptable for a
    /// display-order hint.
    async fn reorder(&self, orders: &[OrderUpdate]) -> Result<(), CatalogError>;
}
