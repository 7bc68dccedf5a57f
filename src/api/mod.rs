use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, patch, post},
};
use anyhow::Context;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use sqlx::SqlitePool;

use time;

use crate::config::Config;
use crate::state::SharedState;

pub mod admins;
pub mod auth;
mod error;
pub mod games;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }
}

pub fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState { shared })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared))
}

pub async fn router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let config = state.config();
    let cors_origins = config.server.cors_allowed_origins.clone();
    let secure_cookies = config.server.secure_cookies;
    let session_ttl_minutes = config.server.session_ttl_minutes;

    // Sessions live in the same SQLite database as the catalog, via a
    // dedicated sqlx pool.
    let session_pool = SqlitePool::connect(&config.general.database_path)
        .await
        .context("Failed to open session store database")?;
    let session_store = SqliteStore::new(session_pool);
    session_store
        .migrate()
        .await
        .context("Failed to migrate session store")?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            session_ttl_minutes,
        )));

    let api_router = Router::new()
        .merge(catalog_admin_router())
        .merge(admin_management_router())
        .route("/login", get(auth::login_redirect).post(auth::login))
        .route("/callback", get(auth::login_callback))
        .route("/logout", get(auth::logout))
        .route("/auth/user", get(auth::get_current_user))
        .route("/games", get(games::list_games))
        .route("/games/{id}", get(games::get_game))
        .layer(session_layer)
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Ok(Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http()))
}

/// Catalog mutations require an admin session.
fn catalog_admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/games", post(games::create_game))
        .route("/games/reorder", post(games::reorder_games))
        .route("/games/{id}", patch(games::update_game).delete(games::delete_game))
        .route_layer(middleware::from_fn(auth::require_admin))
}

/// Roster maintenance is open to any admin; raw credential creation is
/// reserved for super admins.
fn admin_management_router() -> Router<Arc<AppState>> {
    let super_admin_routes = Router::new()
        .route("/admins", post(admins::create_admin))
        .route_layer(middleware::from_fn(auth::require_super_admin));

    Router::new()
        .route("/admin/list", get(admins::list_admins))
        .route("/admin/promote", post(admins::promote_admin))
        .route("/admin/remove", post(admins::remove_admin))
        .route_layer(middleware::from_fn(auth::require_admin))
        .merge(super_admin_routes)
}
