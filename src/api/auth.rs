use axum::{
    Json,
    extract::{Query, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{Redirect, Response},
};
use rand::{Rng, distr::Alphanumeric};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, AppState};
use super::types::LoginRequest;
use crate::constants::session::{OIDC_NONCE_KEY, OIDC_STATE_KEY, PRINCIPAL_KEY};
use crate::services::Principal;

// ============================================================================
// Session helpers
// ============================================================================

/// Fetch the principal for this session, treating an expired one as absent.
pub async fn load_principal(session: &Session) -> Result<Option<Principal>, ApiError> {
    let principal = session
        .get::<Principal>(PRINCIPAL_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    match principal {
        Some(p) if p.is_expired() => {
            let _ = session.remove::<Principal>(PRINCIPAL_KEY).await;
            Ok(None)
        }
        other => Ok(other),
    }
}

async fn store_principal(session: &Session, principal: &Principal) -> Result<(), ApiError> {
    session
        .insert(PRINCIPAL_KEY, principal)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))
}

// ============================================================================
// Authorization guards
// ============================================================================

/// Any live session is enough.
pub fn authorize_session(principal: Option<&Principal>) -> Result<&Principal, ApiError> {
    principal.ok_or_else(|| ApiError::unauthorized("Unauthorized"))
}

/// Admin routes: the session must carry the admin flag.
pub fn authorize_admin(principal: Option<&Principal>) -> Result<&Principal, ApiError> {
    let principal = authorize_session(principal)?;
    if !principal.is_admin {
        return Err(ApiError::forbidden("Admin access required"));
    }
    Ok(principal)
}

/// Admin-management routes: reserved for super admins.
pub fn authorize_super_admin(principal: Option<&Principal>) -> Result<&Principal, ApiError> {
    let principal = authorize_admin(principal)?;
    if !principal.is_super_admin {
        return Err(ApiError::forbidden("Super admin access required"));
    }
    Ok(principal)
}

// ============================================================================
// Middleware
// ============================================================================

pub async fn require_session(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = load_principal(&session).await?;
    authorize_session(principal.as_ref())?;
    Ok(next.run(request).await)
}

pub async fn require_admin(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = load_principal(&session).await?;
    authorize_admin(principal.as_ref())?;
    Ok(next.run(request).await)
}

pub async fn require_super_admin(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = load_principal(&session).await?;
    authorize_super_admin(principal.as_ref())?;
    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/login
/// Password authentication against the admin credential table.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Principal>, ApiError> {
    if payload.email.trim().is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let principal = state
        .shared
        .auth_service
        .login_password(payload.email.trim(), &payload.password)
        .await?;

    store_principal(&session, &principal).await?;

    tracing::info!(email = %principal.email, "Password login succeeded");
    Ok(Json(principal))
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /api/login
/// Start the external-identity flow: remember state and nonce in the
/// session, then redirect to the provider's authorization endpoint.
pub async fn login_redirect(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
) -> Result<Redirect, ApiError> {
    let oidc = state
        .shared
        .oidc
        .as_ref()
        .ok_or_else(|| ApiError::validation("External login is not configured"))?;

    let hostname = request_hostname(&headers)?;
    let csrf_state = random_token();
    let nonce = random_token();

    session
        .insert(OIDC_STATE_KEY, &csrf_state)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;
    session
        .insert(OIDC_NONCE_KEY, &nonce)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    let url = oidc
        .authorization_url(&hostname, &csrf_state, &nonce)
        .await
        .map_err(|e| ApiError::identity_provider_error(e.to_string()))?;

    Ok(Redirect::to(url.as_str()))
}

/// GET /api/callback
/// The provider redirects back here with an authorization code.
pub async fn login_callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect, ApiError> {
    let oidc = state
        .shared
        .oidc
        .as_ref()
        .ok_or_else(|| ApiError::validation("External login is not configured"))?;

    if let Some(error) = query.error {
        tracing::warn!(%error, "Identity provider returned an error");
        return Err(ApiError::unauthorized("Login failed"));
    }

    let expected_state: Option<String> = session
        .remove(OIDC_STATE_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;
    let _nonce: Option<String> = session
        .remove(OIDC_NONCE_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    let returned_state = query
        .state
        .ok_or_else(|| ApiError::unauthorized("Missing state parameter"))?;
    if expected_state.as_deref() != Some(returned_state.as_str()) {
        return Err(ApiError::unauthorized("State mismatch"));
    }

    let code = query
        .code
        .ok_or_else(|| ApiError::unauthorized("Missing authorization code"))?;

    let hostname = request_hostname(&headers)?;
    let tokens = oidc
        .exchange_code(&hostname, &code)
        .await
        .map_err(|e| ApiError::identity_provider_error(e.to_string()))?;
    let claims = oidc
        .fetch_claims(&tokens.access_token)
        .await
        .map_err(|e| ApiError::identity_provider_error(e.to_string()))?;

    let principal = state.shared.auth_service.login_external(claims, tokens).await?;
    store_principal(&session, &principal).await?;

    tracing::info!(email = %principal.email, "External login succeeded");
    Ok(Redirect::to("/"))
}

/// GET /api/logout
pub async fn logout(session: Session) -> Redirect {
    let _ = session.flush().await;
    Redirect::to("/")
}

/// GET /api/auth/user
/// Current identity for the session. External sessions return the stored
/// user record; password sessions have no user row, so the principal itself
/// is returned.
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<Value>, ApiError> {
    let principal = load_principal(&session).await?;
    let principal = authorize_session(principal.as_ref())?;

    if principal.claims.is_some() {
        let user = state
            .shared
            .store
            .get_user(&principal.id)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to get user: {e}")))?
            .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;
        return Ok(Json(json!(user)));
    }

    Ok(Json(json!(principal)))
}

// ============================================================================
// Helpers
// ============================================================================

fn request_hostname(headers: &HeaderMap) -> Result<String, ApiError> {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::validation("Missing Host header"))?;

    // Strip an explicit port; provider bindings are keyed by hostname alone.
    Ok(host.split(':').next().unwrap_or(host).to_string())
}

fn random_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}
