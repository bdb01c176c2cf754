//! Calendar bucketing for chart series.
//!
//! Every "by period" report is drawn against a contiguous list of bucket
//! starts so that periods with no source rows still appear on the chart.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Start date of a reporting period. Serialized as `YYYY-MM-DD`.
pub type Bucket = NaiveDate;

const DATE_FMT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    /// ISO weeks, bucketed on Monday.
    Week,
    /// Calendar months, bucketed on the 1st.
    Month,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }

    /// Parse an optional query value, falling back to `default` when absent
    /// or blank.
    pub fn parse_or(raw: Option<&str>, default: Granularity) -> Result<Self, CoreError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(default),
            Some(value) => value.parse(),
        }
    }

    /// Snap `date` back to the start of the bucket containing it.
    pub fn snap(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Week => {
                let offset = u64::from(date.weekday().num_days_from_monday());
                date.checked_sub_days(Days::new(offset)).unwrap_or(date)
            }
            Granularity::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// Start of the bucket following the one that starts at `bucket`.
    fn advance(&self, bucket: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Day => bucket.checked_add_days(Days::new(1)),
            Granularity::Week => bucket.checked_add_days(Days::new(7)),
            Granularity::Month => bucket.checked_add_months(Months::new(1)),
        }
    }
}

impl FromStr for Granularity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            other => Err(CoreError::InvalidGranularity(other.to_string())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every bucket start whose period overlaps `[start, end]`, strictly
/// increasing and without duplicates.
///
/// Returns an empty list when `start > end`.
pub fn bucketize(start: NaiveDate, end: NaiveDate, granularity: Granularity) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut current = start;
    while current <= end {
        let bucket = granularity.snap(current);
        if buckets.last() != Some(&bucket) {
            buckets.push(bucket);
        }
        match granularity.advance(bucket) {
            Some(next) => current = next,
            None => break,
        }
    }
    buckets
}

/// Wire form of a bucket, used as the join key against RPC rows.
pub fn bucket_key(bucket: &Bucket) -> String {
    bucket.format(DATE_FMT).to_string()
}

/// Parse a request date.
///
/// Accepts a plain `YYYY-MM-DD` date or a timestamp (RFC 3339, or naive
/// `YYYY-MM-DDTHH:MM:SS`) which is reduced to its UTC calendar date.
pub fn parse_report_date(raw: &str) -> Result<NaiveDate, CoreError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FMT) {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc).date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts.date());
    }
    Err(CoreError::InvalidDate(trimmed.to_string()))
}
