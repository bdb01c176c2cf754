use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use leadboard_core::bucket::Granularity;
use leadboard_core::reports::composite::{self, CompositeQuery};

use crate::{error::AppError, state::AppState};

use super::query::{parse_grouping, ReportParams};

/// `GET /api/bedbug_composit`: the all-clients composite report.
#[tracing::instrument(skip(state))]
pub async fn bedbug_composit(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = CompositeQuery {
        range: params.range()?,
        volume_grouping: parse_grouping(
            params.volume_group_by.as_deref(),
            "volumeGroupBy",
            Granularity::Day,
        )?,
        cost_per_lead_grouping: parse_grouping(
            params.cost_per_lead_group_by.as_deref(),
            "costPerLeadGroupBy",
            Granularity::Day,
        )?,
        compare: params.compare()?,
    };
    tracing::debug!(?query, "Composite report");

    let report = composite::composite(state.backend.as_ref(), &query).await?;
    Ok(Json(json!({ "data": report })))
}
