//! Pay-per-lead report: headline numbers, the lead list and a daily chart.

use serde::Serialize;

use super::rows::{PplChartRow, PplMetrics, QualifiedLead};
use super::ClientQuery;
use crate::bucket::parse_report_date;
use crate::rpc::{call_typed, first_or_default, ParamStyle, RpcBackend, RpcError};
use crate::series::{ChannelValues, SeriesPoint};

#[derive(Debug, Clone, Serialize)]
pub struct PplReport {
    pub metrics: PplMetrics,
    pub leads: Vec<QualifiedLead>,
    pub chart: Vec<SeriesPoint<ChannelValues>>,
}

/// The chart procedure only reports a total; rows without a usable date
/// are dropped.
fn chart_points(rows: Vec<PplChartRow>) -> Vec<SeriesPoint<ChannelValues>> {
    rows.into_iter()
        .filter_map(|row| {
            let raw = row.date_key.as_deref()?;
            match parse_report_date(raw) {
                Ok(date) => Some(SeriesPoint {
                    date,
                    fields: ChannelValues {
                        total: row.qualified_leads,
                        ..Default::default()
                    },
                }),
                Err(e) => {
                    tracing::warn!(date_key = raw, error = %e, "Skipping chart row");
                    None
                }
            }
        })
        .collect()
}

pub async fn ppl_report(backend: &dyn RpcBackend, query: &ClientQuery) -> Result<PplReport, RpcError> {
    let params = query.params(ParamStyle::Input);
    let lead_params = query.params(ParamStyle::Prefixed);

    let (metrics, leads, chart_rows) = tokio::try_join!(
        first_or_default::<PplMetrics>(backend, "get_pplmetrics_v3", &params),
        call_typed::<QualifiedLead>(backend, "get_pplmetrics_leads_v3", &lead_params),
        call_typed::<PplChartRow>(backend, "get_pplmetrics_linechartv3", &params),
    )?;

    Ok(PplReport {
        metrics,
        leads,
        chart: chart_points(chart_rows),
    })
}
