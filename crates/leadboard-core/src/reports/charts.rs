//! Per-client line charts, each filled to one point per bucket.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;

use super::rows::{CpqlRow, Dated, SpendRow, VolumeRow};
use super::ClientQuery;
use crate::bucket::{Bucket, Granularity};
use crate::rpc::{call_typed, ParamStyle, RpcBackend, RpcError, RpcParams};
use crate::series::{fill, ChannelValues, SeriesPoint};

/// Call a bucketed procedure and fill its rows onto `buckets`.
pub async fn filled_series<R, F>(
    backend: &dyn RpcBackend,
    function: &str,
    params: &RpcParams,
    buckets: &[Bucket],
    fields_of: fn(&R) -> F,
) -> Result<Vec<SeriesPoint<F>>, RpcError>
where
    R: DeserializeOwned + Dated,
    F: Default,
{
    let rows: Vec<R> = call_typed(backend, function, params).await?;
    Ok(fill(buckets, &rows, R::group_date, fields_of))
}

/// The per-channel line charts of a single client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChart {
    /// Qualified lead volume.
    Volume,
    /// Cost per lead.
    CostPerLead,
    /// Spend.
    Cost,
    /// Cost per qualified lead.
    Cpql,
}

impl LineChart {
    pub const ALL: [LineChart; 4] = [
        LineChart::Volume,
        LineChart::CostPerLead,
        LineChart::Cost,
        LineChart::Cpql,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LineChart::Volume => "volume",
            LineChart::CostPerLead => "cost_per_lead",
            LineChart::Cost => "cost",
            LineChart::Cpql => "cpql",
        }
    }

    pub fn function(self) -> &'static str {
        match self {
            LineChart::Volume => "get_qleadvolume_linechart",
            LineChart::CostPerLead => "get_qleadcostper_linechart",
            LineChart::Cost => "get_cost_line_chart_metrics",
            LineChart::Cpql => "get_cpql_line_chart_metrics",
        }
    }

    pub async fn fetch(
        self,
        backend: &dyn RpcBackend,
        query: &ClientQuery,
        granularity: Granularity,
    ) -> Result<Vec<SeriesPoint<ChannelValues>>, RpcError> {
        let params = query.params(ParamStyle::Input).group_by(granularity);
        let buckets = query.range.buckets(granularity);
        let function = self.function();
        match self {
            LineChart::Volume => {
                filled_series(backend, function, &params, &buckets, VolumeRow::channels).await
            }
            LineChart::CostPerLead | LineChart::Cpql => {
                filled_series(backend, function, &params, &buckets, CpqlRow::channels).await
            }
            LineChart::Cost => {
                filled_series(backend, function, &params, &buckets, SpendRow::channels).await
            }
        }
    }
}

impl fmt::Display for LineChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineChart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|chart| chart.as_str() == s)
            .ok_or_else(|| format!("Invalid chart: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::reports::testing::{client, d};
    use crate::rpc::memory::MemoryRpcBackend;

    #[tokio::test]
    async fn cost_chart_fills_missing_days() {
        let backend = MemoryRpcBackend::new().with_rows(
            "get_cost_line_chart_metrics",
            json!([
                { "group_date": "2025-03-02T00:00:00", "spend_total": 120.5, "spend_ppc": 100, "spend_lsa": "20.5" },
            ]),
        );
        let chart = LineChart::Cost
            .fetch(&backend, &client(9, "2025-03-01", "2025-03-03"), Granularity::Day)
            .await
            .expect("chart");

        assert_eq!(chart.len(), 3);
        assert_eq!(chart[0].date, d("2025-03-01"));
        assert_eq!(chart[0].fields, ChannelValues::default());
        assert_eq!(
            chart[1].fields,
            ChannelValues {
                total: 120.5,
                ppc: 100.0,
                lsa: 20.5,
                seo: 0.0
            }
        );

        let calls = backend.calls_to("get_cost_line_chart_metrics");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].params.get("input_client_id"), Some(&json!(9)));
        assert_eq!(calls[0].params.get("input_group_by"), Some(&json!("day")));
    }

    #[tokio::test]
    async fn weekly_volume_chart_uses_monday_buckets() {
        let backend = MemoryRpcBackend::new().with_rows(
            "get_qleadvolume_linechart",
            json!([
                { "group_date": "2025-01-13", "qualified_leads": 4, "qualified_leads_seo": 4 },
            ]),
        );
        let chart = LineChart::Volume
            .fetch(&backend, &client(1, "2025-01-08", "2025-01-20"), Granularity::Week)
            .await
            .expect("chart");

        let dates: Vec<_> = chart.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d("2025-01-06"), d("2025-01-13"), d("2025-01-20")]);
        assert_eq!(chart[1].fields.total, 4.0);
        assert_eq!(chart[1].fields.seo, 4.0);
        assert_eq!(chart[2].fields, ChannelValues::default());
    }

    #[tokio::test]
    async fn chart_errors_propagate() {
        let backend =
            MemoryRpcBackend::new().with_error("get_cpql_line_chart_metrics", "function does not exist");
        let err = LineChart::Cpql
            .fetch(&backend, &client(1, "2025-01-01", "2025-01-02"), Granularity::Day)
            .await
            .expect_err("rpc error");
        assert_eq!(err.to_string(), "function does not exist");
    }

    #[test]
    fn chart_names_parse() {
        assert_eq!("cost_per_lead".parse::<LineChart>(), Ok(LineChart::CostPerLead));
        assert!("pie".parse::<LineChart>().is_err());
    }
}
