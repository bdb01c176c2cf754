use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use leadboard_core::bucket::Granularity;
use leadboard_core::reports::summary::{self, ChartGrouping};

use crate::{error::AppError, state::AppState};

use super::query::{parse_grouping, ReportParams};

/// `groupBy` sets every chart; `volumeGroupBy` and `costPerLeadGroupBy`
/// override it for their charts.
pub(crate) fn chart_grouping(params: &ReportParams) -> Result<ChartGrouping, AppError> {
    let base = parse_grouping(params.group_by.as_deref(), "groupBy", Granularity::Day)?;
    Ok(ChartGrouping {
        base,
        volume: parse_grouping(params.volume_group_by.as_deref(), "volumeGroupBy", base)?,
        cost_per_lead: parse_grouping(
            params.cost_per_lead_group_by.as_deref(),
            "costPerLeadGroupBy",
            base,
        )?,
    })
}

/// `GET /api/top-metrics`: headline totals, engagement and four charts.
#[tracing::instrument(skip(state))]
pub async fn top_metrics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.client_query()?;
    let grouping = chart_grouping(&params)?;
    tracing::debug!(
        client_id = query.client_id,
        start = %query.range.start,
        end = %query.range.end,
        ?grouping,
        "Top metrics"
    );

    let report = summary::top_metrics(state.backend.as_ref(), &query, grouping).await?;
    Ok(Json(json!({ "data": report })))
}
