use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use leadboard_core::config::AuthMode;

use crate::{error::AppError, state::AppState};

use super::jwt::encode_jwt;
use super::session::{build_session_cookie, clear_session_cookie, validate_session};

// ---------------------------------------------------------------------------
// POST /api/login
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user: Option<String>,
    pub password: Option<String>,
}

/// `POST /api/login`: exchange the operator credentials for a session
/// cookie. 404 when authentication is disabled.
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let AuthMode::Password { username, password } = &state.config.auth_mode else {
        return Err(AppError::NotFound("Auth not enabled".to_string()));
    };
    let Json(req) = payload?;

    let (Some(user), Some(given)) = (
        req.user.filter(|u| !u.is_empty()),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    };

    if user != *username || given != *password {
        tracing::warn!(user = %user, "Rejected login");
        return Err(AppError::InvalidCredentials);
    }

    let lifetime = state.config.session_duration();
    let (token, _expires_at) =
        encode_jwt(&state.session_secret, &user, lifetime).map_err(AppError::Internal)?;
    let cookie = build_session_cookie(&token, state.config.https, lifetime.as_secs());

    tracing::info!(user = %user, "Login successful");
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "message": "Login successful" })),
    ))
}

// ---------------------------------------------------------------------------
// POST /api/logout
// ---------------------------------------------------------------------------

/// `POST /api/logout`: clear the session cookie. Always 200.
pub async fn logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cookie = clear_session_cookie(state.config.https);
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "message": "Logged out" })),
    )
}

// ---------------------------------------------------------------------------
// GET /api/auth/session
// ---------------------------------------------------------------------------

/// `GET /api/auth/session`: the current operator, or 401.
pub async fn session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = validate_session(&state, &headers)?;
    Ok(Json(json!({ "data": user })))
}
