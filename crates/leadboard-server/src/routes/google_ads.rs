use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use leadboard_core::reports::google_ads::{self, GoogleAdsView};
use leadboard_core::reports::ClientQuery;

use crate::{error::AppError, state::AppState};

use super::query::{parse_date, validate_date_range, ReportParams};

/// `GET /api/googleads-qlead` (and `/api/googleads-qleads`): Google Ads
/// totals or per-campaign rows. An `end` after today is clamped to today.
#[tracing::instrument(skip(state))]
pub async fn googleads_qlead(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, AppError> {
    let client_id = params.client_id()?;
    let start = parse_date(params.start.as_deref())?;
    let mut end = parse_date(params.end.as_deref())?;
    let today = state.config.today();
    if end > today {
        tracing::debug!(%end, %today, "End date adjusted to today");
        end = today;
    }
    let range = validate_date_range(start, end)?;

    let view = params
        .kind
        .as_deref()
        .map(str::parse::<GoogleAdsView>)
        .transpose()
        .map_err(AppError::BadRequest)?
        .unwrap_or_default();
    let compare = params.compare()?;

    let report = google_ads::google_ads_qleads(
        state.backend.as_ref(),
        &ClientQuery::new(client_id, range),
        view,
        compare,
    )
    .await?;
    Ok(Json(json!({ "data": report })))
}

/// `GET /api/google-ads-qlead-metrics`: totals and campaigns together.
#[tracing::instrument(skip(state))]
pub async fn google_ads_qlead_metrics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.client_query()?;
    let overview = google_ads::google_ads_overview(state.backend.as_ref(), &query).await?;
    Ok(Json(json!({ "data": overview })))
}
