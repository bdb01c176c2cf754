//! Row shapes returned by the stored procedures.
//!
//! Every numeric column defaults to 0 (or `None` where the dashboard shows a
//! placeholder instead of zero) at deserialization time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::period::MetricFields;
use crate::series::{ChannelValues, CostPer, VolumeCost};

/// Rows that carry the date of the bucket they aggregate.
pub trait Dated {
    fn group_date(&self) -> Option<&str>;
}

macro_rules! dated {
    ($($ty:ty),* $(,)?) => {
        $(impl Dated for $ty {
            fn group_date(&self) -> Option<&str> {
                self.group_date.as_deref()
            }
        })*
    };
}

/// Headline totals for one client (`get_qlead_data`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopMetrics {
    #[serde(default, deserialize_with = "crate::de::number")]
    pub qualified_leads: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub ppc_leads: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub lsa_leads: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub seo_leads: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub total_spend: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub ppc_spend: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub lsa_spend: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub seo_spend: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub cpql_total: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub cpql_ppc: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub cpql_lsa: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub cpql_seo: f64,
}

/// Qualified leads, spend and CPQL split by source
/// (`get_qlead_data_source`, `get_qlead_data_source_bedbug`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMetrics {
    #[serde(default, deserialize_with = "crate::de::number")]
    pub qualified_leads: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub qualified_leads_ppc: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub qualified_leads_lsa: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub qualified_leads_seo: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub spend_total: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub spend_ppc: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub spend_lsa: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub spend_seo: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub cpql_total: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub cpql_ppc: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub cpql_lsa: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub cpql_seo: f64,
}

impl MetricFields for SourceMetrics {
    fn metric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("qualified_leads", self.qualified_leads),
            ("qualified_leads_ppc", self.qualified_leads_ppc),
            ("qualified_leads_lsa", self.qualified_leads_lsa),
            ("qualified_leads_seo", self.qualified_leads_seo),
            ("spend_total", self.spend_total),
            ("spend_ppc", self.spend_ppc),
            ("spend_lsa", self.spend_lsa),
            ("spend_seo", self.spend_seo),
            ("cpql_total", self.cpql_total),
            ("cpql_ppc", self.cpql_ppc),
            ("cpql_lsa", self.cpql_lsa),
            ("cpql_seo", self.cpql_seo),
        ]
    }
}

/// Call-handling totals (`get_call_engagement_metrics`). Left as `None`
/// when the procedure has nothing to report.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngagementTotals {
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub her_percent: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub aifr_percent: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub human_engaged_true: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub total_engagements: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub ai_forwarded: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub total_forwarded: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VolumeRow {
    #[serde(default, deserialize_with = "crate::de::opt_text")]
    pub group_date: Option<String>,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub qualified_leads: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub qualified_leads_ppc: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub qualified_leads_lsa: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub qualified_leads_seo: f64,
}

impl VolumeRow {
    pub fn channels(&self) -> ChannelValues {
        ChannelValues {
            total: self.qualified_leads,
            ppc: self.qualified_leads_ppc,
            lsa: self.qualified_leads_lsa,
            seo: self.qualified_leads_seo,
        }
    }
}

/// Cost per qualified lead by bucket (`get_qleadcostper_linechart`,
/// `get_cpql_line_chart_metrics` and their composite variants).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CpqlRow {
    #[serde(default, deserialize_with = "crate::de::opt_text")]
    pub group_date: Option<String>,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub cpql_all: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub cpql_ppc: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub cpql_lsa: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub cpql_seo: f64,
}

impl CpqlRow {
    pub fn channels(&self) -> ChannelValues {
        ChannelValues {
            total: self.cpql_all,
            ppc: self.cpql_ppc,
            lsa: self.cpql_lsa,
            seo: self.cpql_seo,
        }
    }

    pub fn ppc_cost_per(&self) -> CostPer {
        CostPer {
            costper: self.cpql_ppc,
        }
    }
}

/// Spend by bucket (`get_cost_line_chart_metrics`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpendRow {
    #[serde(default, deserialize_with = "crate::de::opt_text")]
    pub group_date: Option<String>,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub spend_total: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub spend_ppc: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub spend_lsa: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub spend_seo: f64,
}

impl SpendRow {
    pub fn channels(&self) -> ChannelValues {
        ChannelValues {
            total: self.spend_total,
            ppc: self.spend_ppc,
            lsa: self.spend_lsa,
            seo: self.spend_seo,
        }
    }
}

/// Paid-search leads and spend by bucket
/// (`get_ppc_qleadvolumecost_linebarchart_bedbug`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PpcVolumeCostRow {
    #[serde(default, deserialize_with = "crate::de::opt_text")]
    pub group_date: Option<String>,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub qualified_leads_ppc: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub spend_ppc: f64,
}

impl PpcVolumeCostRow {
    pub fn volume_cost(&self) -> VolumeCost {
        VolumeCost {
            volume: self.qualified_leads_ppc,
            cost: self.spend_ppc,
        }
    }
}

dated!(VolumeRow, CpqlRow, SpendRow, PpcVolumeCostRow);

/// Google Ads totals (`googleads_qleads`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoogleAdsTotals {
    #[serde(default, deserialize_with = "crate::de::number")]
    pub ppc_qleads: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub total_spend: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub cpql: f64,
}

impl MetricFields for GoogleAdsTotals {
    fn metric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("ppc_qleads", self.ppc_qleads),
            ("total_spend", self.total_spend),
            ("cpql", self.cpql),
        ]
    }
}

/// One Google Ads campaign (`googleads_qleads_bycampaign`). Spend and CPQL
/// stay `None` for campaigns without billing data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignRow {
    #[serde(default, deserialize_with = "crate::de::opt_text")]
    pub campaign: Option<String>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub spend: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub qleads: f64,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub cpql: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub avg_leads_score: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub avg_close_score: f64,
}

/// One qualified lead (`get_qualified_leads`, `get_pplmetrics_leads_v3`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualifiedLead {
    #[serde(default, deserialize_with = "crate::de::opt_text")]
    pub first_contact_date: Option<String>,
    #[serde(default, deserialize_with = "crate::de::opt_text")]
    pub customer_phone_number: Option<String>,
    #[serde(default, deserialize_with = "crate::de::opt_text")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "crate::de::opt_text")]
    pub customer_city: Option<String>,
    #[serde(default, deserialize_with = "crate::de::opt_text")]
    pub customer_state: Option<String>,
    #[serde(default, deserialize_with = "crate::de::opt_text")]
    pub service_inquired: Option<String>,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub lead_score_max: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub close_score_max: f64,
    #[serde(default, deserialize_with = "crate::de::flag")]
    pub human_engaged: bool,
    #[serde(default, deserialize_with = "crate::de::opt_text")]
    pub first_source: Option<String>,
}

/// Pay-per-lead headline numbers (`get_pplmetrics_v3`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PplMetrics {
    #[serde(default, deserialize_with = "crate::de::number")]
    pub qualified_leads: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub unique_callers: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub pct_leads_qualified: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PplChartRow {
    #[serde(default, deserialize_with = "crate::de::opt_text")]
    pub date_key: Option<String>,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub qualified_leads: f64,
}

/// Lead counts per source (`qlead_quality_source`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceCards {
    #[serde(default, deserialize_with = "crate::de::number")]
    pub qualified_leads: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub lead_qualified_total: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub ppc_leads: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub lsa_leads: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub seo_leads: f64,
    #[serde(default, deserialize_with = "crate::de::number")]
    pub sfo_leads: f64,
}

/// One period of a lead-quality line chart. The per-source columns differ
/// between procedures, so they are carried as-is next to the period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityPoint {
    #[serde(default, alias = "date", deserialize_with = "crate::de::opt_text")]
    pub period_start: Option<String>,
    #[serde(flatten)]
    pub values: BTreeMap<String, Value>,
}

/// Entry of the client picker (`clients_ffs`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub cr_client_id: Value,
    #[serde(default, deserialize_with = "crate::de::opt_text")]
    pub cr_company_name: Option<String>,
}
