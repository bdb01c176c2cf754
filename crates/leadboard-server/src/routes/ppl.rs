use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use leadboard_core::reports::ppl;

use crate::{error::AppError, state::AppState};

use super::query::ReportParams;

/// `GET /api/ppl-data`: pay-per-lead metrics, leads and daily chart.
#[tracing::instrument(skip(state))]
pub async fn ppl_data(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.client_query()?;
    let report = ppl::ppl_report(state.backend.as_ref(), &query).await?;
    Ok(Json(json!({ "data": report })))
}
