//! Lead-quality reports: per-source counts plus intake, qualification,
//! lead-score and close-score trends.
//!
//! Trend rows are passed through with their period normalized to
//! `YYYY-MM-DD`; the procedures may return several rows per period, so the
//! rows are not filled onto buckets.

use chrono::NaiveDate;
use serde::Serialize;

use super::rows::{QualityPoint, SourceCards};
use super::ClientQuery;
use crate::bucket::{bucket_key, parse_report_date, Granularity};
use crate::rpc::{call_typed, ParamStyle, RpcBackend, RpcError, RpcParams};

const CARDS: &str = "qlead_quality_source";
const INTAKE: &str = "qlead_intakescore_source_linechart";
const PERCENT: &str = "qlead_per_source_linechart";
const LEAD_SCORE: &str = "qlead_leadscore_source_linechart";
const CLOSE_SCORE: &str = "qlead_closescore_source_linechart";

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityTrends {
    pub intake_score: Vec<QualityPoint>,
    pub percent_qualified: Vec<QualityPoint>,
    pub lead_score: Vec<QualityPoint>,
    pub close_score: Vec<QualityPoint>,
}

/// Source cards collapsed to the first row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadQualityReport {
    pub source_cards: SourceCards,
    #[serde(flatten)]
    pub trends: QualityTrends,
}

/// Same content as [`LeadQualityReport`], with every source-card row kept.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadQualityPage {
    pub source_cards: Vec<SourceCards>,
    #[serde(flatten)]
    pub trends: QualityTrends,
}

fn period_date(raw: &str) -> Option<NaiveDate> {
    parse_report_date(raw)
        .ok()
        .or_else(|| raw.get(..10).and_then(|prefix| parse_report_date(prefix).ok()))
}

fn normalize(mut points: Vec<QualityPoint>) -> Vec<QualityPoint> {
    for point in &mut points {
        if let Some(date) = point.period_start.as_deref().and_then(period_date) {
            point.period_start = Some(bucket_key(&date));
        }
    }
    points
}

async fn cards_and_trends(
    backend: &dyn RpcBackend,
    query: &ClientQuery,
    grouping: Option<Granularity>,
) -> Result<(Vec<SourceCards>, QualityTrends), RpcError> {
    let card_params = query.params(ParamStyle::Input);
    let trend_params: RpcParams = match grouping {
        Some(granularity) => query.params(ParamStyle::Input).grouping(granularity),
        None => query.params(ParamStyle::Input),
    };

    let (cards, intake, percent, lead_score, close_score) = tokio::try_join!(
        call_typed::<SourceCards>(backend, CARDS, &card_params),
        call_typed::<QualityPoint>(backend, INTAKE, &trend_params),
        call_typed::<QualityPoint>(backend, PERCENT, &trend_params),
        call_typed::<QualityPoint>(backend, LEAD_SCORE, &trend_params),
        call_typed::<QualityPoint>(backend, CLOSE_SCORE, &trend_params),
    )?;

    Ok((
        cards,
        QualityTrends {
            intake_score: normalize(intake),
            percent_qualified: normalize(percent),
            lead_score: normalize(lead_score),
            close_score: normalize(close_score),
        },
    ))
}

pub async fn lead_quality_by_source(
    backend: &dyn RpcBackend,
    query: &ClientQuery,
    grouping: Granularity,
) -> Result<LeadQualityReport, RpcError> {
    let (cards, trends) = cards_and_trends(backend, query, Some(grouping)).await?;
    Ok(LeadQualityReport {
        source_cards: cards.into_iter().next().unwrap_or_default(),
        trends,
    })
}

/// Uses each procedure's own default grouping.
pub async fn lead_quality_page(
    backend: &dyn RpcBackend,
    query: &ClientQuery,
) -> Result<LeadQualityPage, RpcError> {
    let (source_cards, trends) = cards_and_trends(backend, query, None).await?;
    Ok(LeadQualityPage { source_cards, trends })
}
