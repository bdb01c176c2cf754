use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use leadboard_core::reports::leads;

use crate::{error::AppError, state::AppState};

use super::query::ReportParams;

/// `GET /api/qualified-leads`: every qualified lead of a client in range.
#[tracing::instrument(skip(state))]
pub async fn qualified_leads(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.client_query()?;
    tracing::debug!(client_id = query.client_id, start = %query.range.start, end = %query.range.end, "Qualified leads");
    let rows = leads::qualified_leads(state.backend.as_ref(), &query).await?;
    Ok(Json(json!({ "data": rows })))
}
