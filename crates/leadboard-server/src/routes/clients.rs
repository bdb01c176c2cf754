use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use leadboard_core::reports::leads;

use crate::{error::AppError, state::AppState};

/// `GET /api/clients`: the client picker entries.
#[tracing::instrument(skip(state))]
pub async fn list_clients(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let clients = leads::clients(state.backend.as_ref(), &state.config.clients_table).await?;
    Ok(Json(json!({ "data": clients })))
}
