//! Request-scoped session validation shared by the auth middleware and the
//! session endpoint.

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Utc};
use serde::Serialize;

use leadboard_core::config::AuthMode;

use crate::{error::AppError, state::AppState};

use super::jwt::decode_jwt;

pub const SESSION_COOKIE: &str = "authToken";

/// The operator behind a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionUser {
    pub user: String,
    /// `None` when authentication is disabled.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Value of the session cookie, if the request carries one.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|c| c.trim().strip_prefix("authToken="))
        .filter(|token| !token.is_empty())
}

/// Resolve the session of a request from its headers.
///
/// With authentication disabled every request belongs to an anonymous
/// operator.
pub fn validate_session(state: &AppState, headers: &HeaderMap) -> Result<SessionUser, AppError> {
    let AuthMode::Password { username, .. } = &state.config.auth_mode else {
        return Ok(SessionUser {
            user: "anonymous".to_string(),
            expires_at: None,
        });
    };

    let token = session_token(headers).ok_or(AppError::Unauthorized)?;
    let claims = decode_jwt(token, &state.session_secret).map_err(|e| {
        tracing::debug!(error = %e, "Rejected session token");
        AppError::Unauthorized
    })?;
    if claims.sub != *username {
        return Err(AppError::Unauthorized);
    }

    Ok(SessionUser {
        user: claims.sub,
        expires_at: DateTime::from_timestamp(claims.exp, 0),
    })
}

pub fn build_session_cookie(token: &str, https: bool, max_age_secs: u64) -> String {
    let secure = if https { "; Secure" } else { "" };
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}{}",
        SESSION_COOKIE, token, max_age_secs, secure,
    )
}

pub fn clear_session_cookie(https: bool) -> String {
    let secure = if https { "; Secure" } else { "" };
    format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT{}",
        SESSION_COOKIE, secure,
    )
}
