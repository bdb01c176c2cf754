//! Report composition: parameterized stored-procedure calls reshaped into
//! the payloads the dashboard renders.
//!
//! Every report takes a `&dyn RpcBackend` and already-validated parameters.
//! Reports that need several result sets issue the calls concurrently and
//! fail on the first error.

pub mod charts;
pub mod composite;
pub mod google_ads;
pub mod leads;
pub mod ppl;
pub mod quality;
pub mod rows;
pub mod summary;

use chrono::NaiveDate;
use serde::Serialize;

use crate::bucket::{bucketize, Bucket, Granularity};
use crate::rpc::{ParamStyle, RpcParams};

/// Inclusive reporting window, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn buckets(&self, granularity: Granularity) -> Vec<Bucket> {
        bucketize(self.start, self.end, granularity)
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// A reporting window for one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientQuery {
    pub client_id: i64,
    pub range: DateRange,
}

impl ClientQuery {
    pub fn new(client_id: i64, range: DateRange) -> Self {
        Self { client_id, range }
    }

    /// Client id plus the date window, named in the given style.
    pub fn params(&self, style: ParamStyle) -> RpcParams {
        RpcParams::new(style)
            .client_id(self.client_id)
            .range(self.range.start, self.range.end)
    }

    pub(crate) fn with_range(&self, range: DateRange) -> Self {
        Self {
            client_id: self.client_id,
            range,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use chrono::NaiveDate;

    use super::{ClientQuery, DateRange};

    pub fn d(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
    }

    pub fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(d(start), d(end))
    }

    pub fn client(client_id: i64, start: &str, end: &str) -> ClientQuery {
        ClientQuery::new(client_id, range(start, end))
    }
}
