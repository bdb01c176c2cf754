//! Query-string parsing shared by every report route.

use chrono::NaiveDate;
use serde::Deserialize;

use leadboard_core::bucket::{parse_report_date, Granularity};
use leadboard_core::period::CompareMode;
use leadboard_core::reports::{ClientQuery, DateRange};

use crate::error::AppError;

/// Longest accepted reporting window, in days.
pub(crate) const MAX_RANGE_DAYS: i64 = 731;

/// Every parameter a report route may read. All optional at the extractor
/// level so that validation errors come back in the API's error shape.
#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    #[serde(rename = "clientId")]
    pub client_id: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(rename = "groupBy")]
    pub group_by: Option<String>,
    #[serde(rename = "volumeGroupBy")]
    pub volume_group_by: Option<String>,
    #[serde(rename = "costPerLeadGroupBy")]
    pub cost_per_lead_group_by: Option<String>,
    pub grouping: Option<String>,
    pub compare: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub chart: Option<String>,
}

impl ReportParams {
    pub(crate) fn client_id(&self) -> Result<i64, AppError> {
        parse_client_id(self.client_id.as_deref())
    }

    pub(crate) fn range(&self) -> Result<DateRange, AppError> {
        parse_required_range(self.start.as_deref(), self.end.as_deref())
    }

    pub(crate) fn client_query(&self) -> Result<ClientQuery, AppError> {
        Ok(ClientQuery::new(self.client_id()?, self.range()?))
    }

    pub(crate) fn compare(&self) -> Result<CompareMode, AppError> {
        CompareMode::parse(self.compare.as_deref()).map_err(|_| {
            AppError::BadRequest(
                "Invalid compare parameter. Use previous_period or previous_year".to_string(),
            )
        })
    }
}

pub(crate) fn parse_client_id(raw: Option<&str>) -> Result<i64, AppError> {
    raw.map(str::trim)
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| AppError::BadRequest("Invalid clientId parameter".to_string()))
}

pub(crate) fn parse_date(raw: Option<&str>) -> Result<NaiveDate, AppError> {
    raw.and_then(|v| parse_report_date(v).ok())
        .ok_or_else(|| AppError::BadRequest("Invalid date parameters".to_string()))
}

pub(crate) fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<DateRange, AppError> {
    if start > end {
        return Err(AppError::BadRequest(
            "start must be on or before end".to_string(),
        ));
    }
    let range = DateRange::new(start, end);
    if range.days() > MAX_RANGE_DAYS {
        return Err(AppError::BadRequest(format!(
            "date range too large: {} days (max {MAX_RANGE_DAYS})",
            range.days()
        )));
    }
    Ok(range)
}

pub(crate) fn parse_required_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<DateRange, AppError> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    validate_date_range(start, end)
}

/// A `day|week|month` parameter; absent or blank means `default`.
pub(crate) fn parse_grouping(
    raw: Option<&str>,
    field: &str,
    default: Granularity,
) -> Result<Granularity, AppError> {
    Granularity::parse_or(raw, default).map_err(|_| {
        AppError::BadRequest(format!("{field} must be one of: day, week, month"))
    })
}
