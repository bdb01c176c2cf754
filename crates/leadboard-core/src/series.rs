//! Dense chart series built from sparse stored-procedure rows.

use std::collections::HashMap;

use serde::Serialize;

use crate::bucket::{bucket_key, Bucket};

/// One chart point: a bucket plus its metric fields, flattened on the wire
/// (`{ "date": "2025-01-06", "total": 3, ... }`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint<F> {
    pub date: Bucket,
    #[serde(flatten)]
    pub fields: F,
}

/// Per-channel values: all sources, paid search, local services ads, organic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChannelValues {
    pub total: f64,
    pub ppc: f64,
    pub lsa: f64,
    pub seo: f64,
}

/// Paid-search lead volume against spend for the same bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VolumeCost {
    pub volume: f64,
    pub cost: f64,
}

/// Paid-search cost per qualified lead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostPer {
    pub costper: f64,
}

/// Join key of a row: the `YYYY-MM-DD` prefix of its date column.
fn date_prefix(key: &str) -> &str {
    key.get(..10).unwrap_or(key)
}

/// Produce one point per bucket, in bucket order.
///
/// The first row whose key starts with the bucket's `YYYY-MM-DD` supplies
/// the fields; buckets without a row get `F::default()`. Rows whose key
/// matches no bucket are ignored.
pub fn fill<R, F, K, V>(buckets: &[Bucket], rows: &[R], key_of: K, fields_of: V) -> Vec<SeriesPoint<F>>
where
    F: Default,
    K: Fn(&R) -> Option<&str>,
    V: Fn(&R) -> F,
{
    let mut by_key: HashMap<&str, &R> = HashMap::with_capacity(rows.len());
    for row in rows {
        if let Some(key) = key_of(row) {
            by_key.entry(date_prefix(key)).or_insert(row);
        }
    }

    buckets
        .iter()
        .map(|bucket| {
            let fields = by_key
                .get(bucket_key(bucket).as_str())
                .map(|row| fields_of(*row))
                .unwrap_or_default();
            SeriesPoint {
                date: *bucket,
                fields,
            }
        })
        .collect()
}
