use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::Response,
};

use leadboard_core::bucket::bucket_key;
use leadboard_core::reports::charts::LineChart;
use leadboard_core::series::{ChannelValues, SeriesPoint};

use crate::{error::AppError, state::AppState};

use super::query::ReportParams;
use super::summary::chart_grouping;

/// `GET /api/top-metrics/export`: one top-metrics chart as CSV.
///
/// `chart` picks the series (`volume`, `cost_per_lead`, `cost`, `cpql`); the
/// grouping parameters apply as on `/api/top-metrics`.
/// Response: `Content-Type: text/csv` with `Content-Disposition: attachment`.
#[tracing::instrument(skip(state))]
pub async fn export_top_metrics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Result<Response, AppError> {
    let query = params.client_query()?;
    let chart = params
        .chart
        .as_deref()
        .ok_or_else(|| {
            AppError::BadRequest("chart is required: volume, cost_per_lead, cost or cpql".to_string())
        })?
        .parse::<LineChart>()
        .map_err(AppError::BadRequest)?;
    let granularity = chart_grouping(&params)?.for_chart(chart);

    let points = chart
        .fetch(state.backend.as_ref(), &query, granularity)
        .await?;
    let csv = build_csv(&points).map_err(AppError::Internal)?;

    let filename = format!(
        "{}-{}-{}-{}.csv",
        chart,
        query.client_id,
        bucket_key(&query.range.start),
        bucket_key(&query.range.end)
    );
    build_csv_response(&filename, csv)
}

/// Sanitize a CSV field value against formula injection.
///
/// Spreadsheet apps interpret values that begin with `=`, `+`, `-`, `@`,
/// TAB, or CR as formula expressions. Prepending a single quote (`'`) makes
/// them treat the value as a literal string.
fn sanitize_csv_field(val: &str) -> Cow<'_, str> {
    if val.starts_with(['=', '+', '-', '@', '\t', '\r']) {
        Cow::Owned(format!("'{val}"))
    } else {
        Cow::Borrowed(val)
    }
}

fn build_csv(points: &[SeriesPoint<ChannelValues>]) -> anyhow::Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::with_capacity(points.len().saturating_mul(48)));

    wtr.write_record(["date", "total", "ppc", "lsa", "seo"])
        .map_err(|e| anyhow::anyhow!("csv write_record failed: {e}"))?;

    for point in points {
        let date = bucket_key(&point.date);

        // Only the date is text; amounts are written unquoted.
        wtr.write_record([
            sanitize_csv_field(&date).into_owned(),
            point.fields.total.to_string(),
            point.fields.ppc.to_string(),
            point.fields.lsa.to_string(),
            point.fields.seo.to_string(),
        ])
        .map_err(|e| anyhow::anyhow!("csv write_record failed: {e}"))?;
    }

    wtr.into_inner()
        .map_err(|e| anyhow::anyhow!("csv flush failed: {e}"))
}

fn build_csv_response(filename: &str, csv: Vec<u8>) -> Result<Response, AppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from(csv))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("response build failed: {e}")))
}
