use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use super::types::{
    AdminCreatedResponse, CreateAdminRequest, MessageResponse, PromoteAdminRequest,
    RemoveAdminRequest,
};
use super::validation::{validate_email, validate_password};
use super::{ApiError, AppState};
use crate::db::Admin;

/// GET /api/admin/list
/// Credential rows without their password hashes.
pub async fn list_admins(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Admin>>, ApiError> {
    let admins = state.shared.admin_service.list().await?;
    Ok(Json(admins))
}

/// POST /api/admins
pub async fn create_admin(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAdminRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    let admin = state
        .shared
        .admin_service
        .create(payload.email.trim(), &payload.password)
        .await?;

    tracing::info!(email = %admin.email, "Admin created");
    Ok((
        StatusCode::CREATED,
        Json(AdminCreatedResponse {
            id: admin.id,
            email: admin.email,
        }),
    ))
}

/// POST /api/admin/promote
/// Grants admin rights to an email. A password is required only when no
/// credential row exists yet for that email.
pub async fn promote_admin(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PromoteAdminRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    validate_email(&payload.email)?;
    if let Some(password) = &payload.password {
        validate_password(password)?;
    }

    state
        .shared
        .admin_service
        .promote(payload.email.trim(), payload.password.as_deref())
        .await?;

    tracing::info!(email = %payload.email, "Admin promoted");
    Ok(Json(MessageResponse::new("Admin access granted")))
}

/// POST /api/admin/remove
pub async fn remove_admin(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RemoveAdminRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    validate_email(&payload.email)?;

    state
        .shared
        .admin_service
        .remove(payload.email.trim())
        .await?;

    tracing::info!(email = %payload.email, "Admin removed");
    Ok(Json(MessageResponse::new("Admin access removed")))
}
