//! Google Ads qualified-lead reports.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;

use super::rows::{CampaignRow, GoogleAdsTotals};
use super::{ClientQuery, DateRange};
use crate::period::{metric_changes, resolve_comparison_range, CompareMode, ComparisonMetadata};
use crate::rpc::{call_typed, first_or_default, ParamStyle, RpcBackend, RpcError};

const TOTALS: &str = "googleads_qleads";
const BY_CAMPAIGN: &str = "googleads_qleads_bycampaign";

/// Which half of the Google Ads report to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoogleAdsView {
    #[default]
    Metrics,
    ByCampaign,
}

impl FromStr for GoogleAdsView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metrics" => Ok(Self::Metrics),
            "bycampaign" => Ok(Self::ByCampaign),
            _ => Err(r#"Invalid type parameter. Use "metrics" or "bycampaign""#.to_string()),
        }
    }
}

/// Either the totals (optionally with the comparison period's totals) or
/// the per-campaign rows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GoogleAdsReport {
    #[serde(rename = "sourceMetrics", skip_serializing_if = "Option::is_none")]
    pub source_metrics: Option<GoogleAdsTotals>,
    #[serde(rename = "previousSourceMetrics", skip_serializing_if = "Option::is_none")]
    pub previous_source_metrics: Option<GoogleAdsTotals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<BTreeMap<&'static str, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaigns: Option<Vec<CampaignRow>>,
}

pub async fn google_ads_qleads(
    backend: &dyn RpcBackend,
    query: &ClientQuery,
    view: GoogleAdsView,
    compare: CompareMode,
) -> Result<GoogleAdsReport, RpcError> {
    match view {
        GoogleAdsView::ByCampaign => {
            let params = query.params(ParamStyle::Prefixed);
            let campaigns = call_typed::<CampaignRow>(backend, BY_CAMPAIGN, &params).await?;
            Ok(GoogleAdsReport {
                campaigns: Some(campaigns),
                ..Default::default()
            })
        }
        GoogleAdsView::Metrics => {
            let range = query.range;
            let comparison = resolve_comparison_range(range.start, range.end, compare);
            let params = query.params(ParamStyle::Prefixed);
            let current = first_or_default::<GoogleAdsTotals>(backend, TOTALS, &params);
            let (source_metrics, previous_source_metrics) = match comparison {
                Some(c) => {
                    let previous_query =
                        query.with_range(DateRange::new(c.comparison_start, c.comparison_end));
                    let previous_params = previous_query.params(ParamStyle::Prefixed);
                    let (current, previous) = tokio::try_join!(
                        current,
                        first_or_default::<GoogleAdsTotals>(backend, TOTALS, &previous_params),
                    )?;
                    (current, Some(previous))
                }
                None => (current.await?, None),
            };
            let changes = previous_source_metrics
                .as_ref()
                .map(|previous| metric_changes(&source_metrics, previous));
            Ok(GoogleAdsReport {
                source_metrics: Some(source_metrics),
                previous_source_metrics,
                comparison: comparison.map(|c| c.to_metadata()),
                changes,
                campaigns: None,
            })
        }
    }
}

/// Headline numbers in the shape of the Google Ads page cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleAdsHeadline {
    #[serde(rename = "ppcQLeads")]
    pub ppc_q_leads: f64,
    pub total_spend: f64,
    pub cpql: f64,
}

impl From<GoogleAdsTotals> for GoogleAdsHeadline {
    fn from(totals: GoogleAdsTotals) -> Self {
        Self {
            ppc_q_leads: totals.ppc_qleads,
            total_spend: totals.total_spend,
            cpql: totals.cpql,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleAdsOverview {
    pub metrics: GoogleAdsHeadline,
    pub campaign_data: Vec<CampaignRow>,
}

/// Totals and campaigns in one payload, using the `input_*` procedure
/// arguments.
pub async fn google_ads_overview(
    backend: &dyn RpcBackend,
    query: &ClientQuery,
) -> Result<GoogleAdsOverview, RpcError> {
    let params = query.params(ParamStyle::Input);
    let (totals, campaign_data) = tokio::try_join!(
        first_or_default::<GoogleAdsTotals>(backend, TOTALS, &params),
        call_typed::<CampaignRow>(backend, BY_CAMPAIGN, &params),
    )?;
    Ok(GoogleAdsOverview {
        metrics: totals.into(),
        campaign_data,
    })
}
