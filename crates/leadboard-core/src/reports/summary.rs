//! The per-client overview: headline numbers, call engagement and the four
//! line charts.

use serde::Serialize;

use super::charts::LineChart;
use super::rows::{EngagementTotals, SourceMetrics, TopMetrics};
use super::ClientQuery;
use crate::bucket::Granularity;
use crate::rpc::{first_or_default, ParamStyle, RpcBackend, RpcError};
use crate::series::{ChannelValues, SeriesPoint};

/// Chart granularities. `volume` drives the volume chart, `cost_per_lead`
/// the cost-per-lead and CPQL charts; `base` covers the spend chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChartGrouping {
    pub base: Granularity,
    pub volume: Granularity,
    pub cost_per_lead: Granularity,
}

impl ChartGrouping {
    pub fn uniform(granularity: Granularity) -> Self {
        Self {
            base: granularity,
            volume: granularity,
            cost_per_lead: granularity,
        }
    }

    pub fn for_chart(&self, chart: LineChart) -> Granularity {
        match chart {
            LineChart::Volume => self.volume,
            LineChart::CostPerLead | LineChart::Cpql => self.cost_per_lead,
            LineChart::Cost => self.base,
        }
    }
}

/// Call-handling rates and counts; `None` where nothing was reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EngagementMetrics {
    pub human_engagement_rate: Option<f64>,
    pub ai_forward_rate: Option<f64>,
    pub human_engaged_count: Option<f64>,
    pub human_total_count: Option<f64>,
    pub ai_forward_count: Option<f64>,
    pub ai_total_count: Option<f64>,
}

impl From<EngagementTotals> for EngagementMetrics {
    fn from(totals: EngagementTotals) -> Self {
        Self {
            human_engagement_rate: totals.her_percent,
            ai_forward_rate: totals.aifr_percent,
            human_engaged_count: totals.human_engaged_true,
            human_total_count: totals.total_engagements,
            ai_forward_count: totals.ai_forwarded,
            ai_total_count: totals.total_forwarded,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopMetricsReport {
    #[serde(rename = "topMetrics")]
    pub top_metrics: TopMetrics,
    #[serde(rename = "sourceMetrics")]
    pub source_metrics: SourceMetrics,
    #[serde(rename = "engagementMetrics")]
    pub engagement_metrics: EngagementMetrics,
    pub volume_chart: Vec<SeriesPoint<ChannelValues>>,
    pub cost_per_lead_chart: Vec<SeriesPoint<ChannelValues>>,
    pub cost_chart: Vec<SeriesPoint<ChannelValues>>,
    pub cpql_chart: Vec<SeriesPoint<ChannelValues>>,
}

pub async fn top_metrics(
    backend: &dyn RpcBackend,
    query: &ClientQuery,
    grouping: ChartGrouping,
) -> Result<TopMetricsReport, RpcError> {
    let params = query.params(ParamStyle::Input);
    let chart = |kind: LineChart| kind.fetch(backend, query, grouping.for_chart(kind));

    let (top_metrics, source_metrics, engagement, volume_chart, cost_per_lead_chart, cost_chart, cpql_chart) =
        tokio::try_join!(
            first_or_default::<TopMetrics>(backend, "get_qlead_data", &params),
            first_or_default::<SourceMetrics>(backend, "get_qlead_data_source", &params),
            first_or_default::<EngagementTotals>(backend, "get_call_engagement_metrics", &params),
            chart(LineChart::Volume),
            chart(LineChart::CostPerLead),
            chart(LineChart::Cost),
            chart(LineChart::Cpql),
        )?;

    Ok(TopMetricsReport {
        top_metrics,
        source_metrics,
        engagement_metrics: engagement.into(),
        volume_chart,
        cost_per_lead_chart,
        cost_chart,
        cpql_chart,
    })
}
