use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::types::{
    CreateGameRequest, GameListQuery, MessageResponse, ReorderRequest, UpdateGameRequest,
};
use super::validation::{normalize_optional_url, validate_game_id, validate_required, validate_url};
use super::{ApiError, AppState};
use crate::db::{GamePatch, NewGame};
use crate::entities::games;
use crate::services::{CatalogFilters, OrderUpdate};

/// GET /api/games
/// Public listing with optional category and title-search filters.
pub async fn list_games(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GameListQuery>,
) -> Result<Json<Vec<games::Model>>, ApiError> {
    let games = state
        .shared
        .catalog_service
        .list(CatalogFilters {
            category: query.category,
            search: query.search,
        })
        .await?;

    Ok(Json(games))
}

/// GET /api/games/{id}
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<games::Model>, ApiError> {
    let id = validate_game_id(id)?;
    let game = state.shared.catalog_service.get(id).await?;
    Ok(Json(game))
}

/// POST /api/games
pub async fn create_game(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateGameRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_required("Title", &payload.title)?;
    validate_required("Category", &payload.category)?;
    validate_url("imageUrl", &payload.image_url)?;
    validate_url("downloadUrl", &payload.download_url)?;
    let youtube_url = normalize_optional_url("youtubeUrl", payload.youtube_url)?;

    let game = state
        .shared
        .catalog_service
        .create(NewGame {
            title: payload.title,
            image_url: payload.image_url,
            download_url: payload.download_url,
            category: payload.category,
            developer: payload.developer,
            description: payload.description,
            youtube_url,
            order: payload.order,
        })
        .await?;

    tracing::info!(id = game.id, title = %game.title, "Game created");
    Ok((StatusCode::CREATED, Json(game)))
}

/// PATCH /api/games/{id}
pub async fn update_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateGameRequest>,
) -> Result<Json<games::Model>, ApiError> {
    let id = validate_game_id(id)?;

    if let Some(title) = &payload.title {
        validate_required("Title", title)?;
    }
    if let Some(image_url) = &payload.image_url {
        validate_url("imageUrl", image_url)?;
    }
    if let Some(download_url) = &payload.download_url {
        validate_url("downloadUrl", download_url)?;
    }
    // An absent youtubeUrl leaves the stored trailer alone; an empty string
    // clears it.
    let youtube_url = match payload.youtube_url {
        None => None,
        Some(value) => Some(normalize_optional_url("youtubeUrl", Some(value))?),
    };

    let game = state
        .shared
        .catalog_service
        .update(
            id,
            GamePatch {
                title: payload.title,
                image_url: payload.image_url,
                download_url: payload.download_url,
                category: payload.category,
                developer: payload.developer,
                description: payload.description,
                youtube_url,
                order: payload.order,
            },
        )
        .await?;

    Ok(Json(game))
}

/// DELETE /api/games/{id}
pub async fn delete_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_game_id(id)?;
    state.shared.catalog_service.delete(id).await?;

    tracing::info!(id, "Game deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/games/reorder
/// Applies display orders item by item; earlier updates stick even if a
/// later one fails.
pub async fn reorder_games(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ReorderRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if payload.orders.is_empty() {
        return Err(ApiError::validation("Orders list cannot be empty"));
    }
    for entry in &payload.orders {
        validate_game_id(entry.id)?;
    }

    let updates: Vec<OrderUpdate> = payload
        .orders
        .into_iter()
        .map(|entry| OrderUpdate {
            id: entry.id,
            order: entry.order,
        })
        .collect();

    state.shared.catalog_service.reorder(&updates).await?;

    Ok(Json(MessageResponse::new("Order updated")))
}
