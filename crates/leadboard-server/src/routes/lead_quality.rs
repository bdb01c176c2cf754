use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use leadboard_core::bucket::Granularity;
use leadboard_core::reports::quality;

use crate::{error::AppError, state::AppState};

use super::query::{parse_grouping, ReportParams};

/// `GET /api/lead_quality_by_source`: source cards and quality trends,
/// grouped by `grouping` (default `month`).
#[tracing::instrument(skip(state))]
pub async fn lead_quality_by_source(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.client_query()?;
    let grouping = parse_grouping(params.grouping.as_deref(), "grouping", Granularity::Month)?;
    let report = quality::lead_quality_by_source(state.backend.as_ref(), &query, grouping).await?;
    Ok(Json(json!({ "data": report })))
}

/// `GET /api/lead_quality_page`: as above with every source-card row and
/// the procedures' default grouping.
#[tracing::instrument(skip(state))]
pub async fn lead_quality_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.client_query()?;
    let page = quality::lead_quality_page(state.backend.as_ref(), &query).await?;
    Ok(Json(json!({ "data": page })))
}
