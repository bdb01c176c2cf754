use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::state::AppState;

use super::session::validate_session;

/// Require a valid session on every request of the wrapped routes.
///
/// Browser navigations (requests that accept `text/html`) are redirected to
/// the login page; API callers get `401 {"error":"Unauthorized"}`. The
/// resolved [`SessionUser`](super::session::SessionUser) is added to the
/// request extensions.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    match validate_session(&state, request.headers()) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(_) if wants_html(request.headers()) => (
            StatusCode::SEE_OTHER,
            [(header::LOCATION, state.config.login_path.clone())],
        )
            .into_response(),
        Err(e) => {
            tracing::debug!(path = %request.uri().path(), "Unauthenticated request");
            e.into_response()
        }
    }
}

fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}
