//! Single-chart endpoints used by the standalone chart widgets.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use leadboard_core::bucket::Granularity;
use leadboard_core::reports::charts::LineChart;

use crate::{error::AppError, state::AppState};

use super::query::{parse_grouping, ReportParams};

async fn line_chart(
    state: &AppState,
    params: &ReportParams,
    chart: LineChart,
) -> Result<Json<serde_json::Value>, AppError> {
    let query = params.client_query()?;
    let granularity = parse_grouping(params.group_by.as_deref(), "groupBy", Granularity::Day)?;
    let points = chart
        .fetch(state.backend.as_ref(), &query, granularity)
        .await?;
    Ok(Json(json!({ "data": points })))
}

/// `GET /api/cost-line-chart`
#[tracing::instrument(skip(state))]
pub async fn cost_line_chart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, AppError> {
    line_chart(&state, &params, LineChart::Cost).await
}

/// `GET /api/get-qleadvolume-linechart`
#[tracing::instrument(skip(state))]
pub async fn qlead_volume_line_chart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, AppError> {
    line_chart(&state, &params, LineChart::Volume).await
}

/// `GET /api/get-qleadcostper-linechart`
#[tracing::instrument(skip(state))]
pub async fn qlead_cost_per_line_chart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, AppError> {
    line_chart(&state, &params, LineChart::CostPerLead).await
}
