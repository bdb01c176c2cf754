//! All-clients composite report: source totals plus volume and cost charts
//! across every client, with paid-search breakdowns.

use std::collections::BTreeMap;

use serde::Serialize;

use super::charts::filled_series;
use super::rows::{CpqlRow, PpcVolumeCostRow, SourceMetrics, VolumeRow};
use super::DateRange;
use crate::bucket::Granularity;
use crate::period::{metric_changes, resolve_comparison_range, CompareMode, ComparisonMetadata};
use crate::rpc::{first_or_default, ParamStyle, RpcBackend, RpcError, RpcParams};
use crate::series::{ChannelValues, CostPer, SeriesPoint, VolumeCost};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeQuery {
    pub range: DateRange,
    /// Granularity of the volume and paid volume/cost charts.
    pub volume_grouping: Granularity,
    /// Granularity of the cost-per-lead and paid cost-per charts.
    pub cost_per_lead_grouping: Granularity,
    pub compare: CompareMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompositeReport {
    #[serde(rename = "sourceMetrics")]
    pub source_metrics: SourceMetrics,
    #[serde(rename = "previousSourceMetrics", skip_serializing_if = "Option::is_none")]
    pub previous_source_metrics: Option<SourceMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonMetadata>,
    /// Percent change per source-metrics field against the comparison period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<BTreeMap<&'static str, f64>>,
    pub volume_chart: Vec<SeriesPoint<ChannelValues>>,
    pub cost_per_lead_chart: Vec<SeriesPoint<ChannelValues>>,
    pub ppc_volume_cost_chart: Vec<SeriesPoint<VolumeCost>>,
    pub ppc_cost_per_chart: Vec<SeriesPoint<CostPer>>,
}

fn window(range: DateRange) -> RpcParams {
    RpcParams::new(ParamStyle::Input).range(range.start, range.end)
}

async fn previous_source_metrics(
    backend: &dyn RpcBackend,
    range: Option<DateRange>,
) -> Result<Option<SourceMetrics>, RpcError> {
    match range {
        Some(range) => {
            first_or_default(backend, "get_qlead_data_source_bedbug", &window(range))
                .await
                .map(Some)
        }
        None => Ok(None),
    }
}

pub async fn composite(backend: &dyn RpcBackend, query: &CompositeQuery) -> Result<CompositeReport, RpcError> {
    let range = query.range;
    let comparison = resolve_comparison_range(range.start, range.end, query.compare);
    let previous_range = comparison.map(|c| DateRange::new(c.comparison_start, c.comparison_end));

    let totals_params = window(range);
    let volume_params = window(range).group_by(query.volume_grouping);
    let cost_params = window(range).group_by(query.cost_per_lead_grouping);
    let volume_buckets = range.buckets(query.volume_grouping);
    let cost_buckets = range.buckets(query.cost_per_lead_grouping);

    let (
        source_metrics,
        previous_source_metrics,
        volume_chart,
        cost_per_lead_chart,
        ppc_volume_cost_chart,
        ppc_cost_per_chart,
    ) = tokio::try_join!(
        first_or_default::<SourceMetrics>(backend, "get_qlead_data_source_bedbug", &totals_params),
        previous_source_metrics(backend, previous_range),
        filled_series(
            backend,
            "get_qleadvolume_linechart_bedbug",
            &volume_params,
            &volume_buckets,
            VolumeRow::channels,
        ),
        filled_series(
            backend,
            "get_qleadcostper_linechart_bedbug",
            &cost_params,
            &cost_buckets,
            CpqlRow::channels,
        ),
        filled_series(
            backend,
            "get_ppc_qleadvolumecost_linebarchart_bedbug",
            &volume_params,
            &volume_buckets,
            PpcVolumeCostRow::volume_cost,
        ),
        filled_series(
            backend,
            "get_ppc_qleadcostper_linechart_bedbug",
            &cost_params,
            &cost_buckets,
            CpqlRow::ppc_cost_per,
        ),
    )?;

    let changes = previous_source_metrics
        .as_ref()
        .map(|previous| metric_changes(&source_metrics, previous));

    Ok(CompositeReport {
        source_metrics,
        previous_source_metrics,
        comparison: comparison.map(|c| c.to_metadata()),
        changes,
        volume_chart,
        cost_per_lead_chart,
        ppc_volume_cost_chart,
        ppc_cost_per_chart,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::reports::testing::{d, range};
    use crate::rpc::memory::MemoryRpcBackend;

    fn query(compare: CompareMode) -> CompositeQuery {
        CompositeQuery {
            range: range("2025-03-01", "2025-03-14"),
            volume_grouping: Granularity::Week,
            cost_per_lead_grouping: Granularity::Day,
            compare,
        }
    }

    #[tokio::test]
    async fn builds_paid_search_charts() {
        let backend = MemoryRpcBackend::new()
            .with_rows(
                "get_qlead_data_source_bedbug",
                json!([{ "qualified_leads": 310, "spend_total": 12000 }]),
            )
            .with_rows(
                "get_ppc_qleadvolumecost_linebarchart_bedbug",
                json!([{ "group_date": "2025-03-03", "qualified_leads_ppc": 12, "spend_ppc": 480.0 }]),
            )
            .with_rows(
                "get_ppc_qleadcostper_linechart_bedbug",
                json!([{ "group_date": "2025-03-05", "cpql_ppc": 38.5, "cpql_all": 99 }]),
            );

        let report = composite(&backend, &query(CompareMode::None)).await.expect("report");

        assert_eq!(report.source_metrics.qualified_leads, 310.0);
        assert!(report.previous_source_metrics.is_none());
        assert!(report.comparison.is_none());
        assert!(report.changes.is_none());

        let weeks: Vec<_> = report.ppc_volume_cost_chart.iter().map(|p| p.date).collect();
        assert_eq!(weeks, vec![d("2025-02-24"), d("2025-03-03"), d("2025-03-10")]);
        assert_eq!(
            report.ppc_volume_cost_chart[1].fields,
            VolumeCost {
                volume: 12.0,
                cost: 480.0
            }
        );
        assert_eq!(report.volume_chart.len(), 3);
        assert_eq!(report.cost_per_lead_chart.len(), 14);
        assert_eq!(report.ppc_cost_per_chart.len(), 14);
        assert_eq!(report.ppc_cost_per_chart[4].fields, CostPer { costper: 38.5 });

        let calls = backend.calls_to("get_qleadvolume_linechart_bedbug");
        assert_eq!(calls[0].params.get("input_group_by"), Some(&json!("week")));
        assert!(calls[0].params.get("input_client_id").is_none());
        assert_eq!(backend.calls_to("get_qlead_data_source_bedbug").len(), 1);
    }

    #[tokio::test]
    async fn previous_period_fetches_earlier_totals() {
        let backend = MemoryRpcBackend::new();
        let report = composite(&backend, &query(CompareMode::PreviousPeriod))
            .await
            .expect("report");

        assert_eq!(report.previous_source_metrics, Some(SourceMetrics::default()));
        let comparison = report.comparison.expect("comparison");
        assert_eq!(comparison.comparison_range, [d("2025-02-15"), d("2025-02-28")]);

        let calls = backend.calls_to("get_qlead_data_source_bedbug");
        assert_eq!(calls.len(), 2);
        assert!(calls
            .iter()
            .any(|call| call.params.get("input_start_date") == Some(&json!("2025-02-15"))));
    }
    #[tokio::test]
    async fn comparison_reports_change_per_field() {
        let backend = MemoryRpcBackend::new().with_rows(
            "get_qlead_data_source_bedbug",
            json!([{ "qualified_leads": 120, "spend_total": 6000, "cpql_total": 50 }]),
        );
        let report = composite(&backend, &query(CompareMode::PreviousYear))
            .await
            .expect("report");

        let changes = report.changes.expect("changes");
        assert_eq!(changes.get("qualified_leads"), Some(&0.0));
        assert_eq!(changes.len(), 12);

        let plain = composite(&backend, &query(CompareMode::None)).await.expect("report");
        let value = serde_json::to_value(&plain).expect("json");
        assert!(value.get("changes").is_none());
    }
}
