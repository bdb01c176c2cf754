//! Comparison periods for "change vs previous period" cards.

use std::collections::BTreeMap;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompareMode {
    #[default]
    None,
    PreviousPeriod,
    PreviousYear,
}

impl CompareMode {
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.map(str::trim) {
            None | Some("") | Some("none") => Ok(Self::None),
            Some("previous_period") => Ok(Self::PreviousPeriod),
            Some("previous_year") => Ok(Self::PreviousYear),
            Some(other) => Err(CoreError::InvalidCompareMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonRange {
    pub mode: CompareMode,
    pub primary_start: NaiveDate,
    pub primary_end: NaiveDate,
    pub comparison_start: NaiveDate,
    pub comparison_end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonMetadata {
    pub mode: CompareMode,
    pub primary_range: [NaiveDate; 2],
    pub comparison_range: [NaiveDate; 2],
}

impl ComparisonRange {
    pub fn to_metadata(&self) -> ComparisonMetadata {
        ComparisonMetadata {
            mode: self.mode,
            primary_range: [self.primary_start, self.primary_end],
            comparison_range: [self.comparison_start, self.comparison_end],
        }
    }
}

/// Resolve the range to compare `[start, end]` against.
///
/// `PreviousPeriod` is the same number of days ending the day before
/// `start`; `PreviousYear` shifts both bounds back one calendar year.
/// Returns `None` for `CompareMode::None` or when the shifted range falls
/// outside the representable calendar.
pub fn resolve_comparison_range(
    start: NaiveDate,
    end: NaiveDate,
    mode: CompareMode,
) -> Option<ComparisonRange> {
    if end < start {
        return None;
    }
    let (comparison_start, comparison_end) = match mode {
        CompareMode::None => return None,
        CompareMode::PreviousPeriod => {
            let days = u64::try_from((end - start).num_days()).ok()?;
            let comparison_end = start.checked_sub_days(Days::new(1))?;
            let comparison_start = comparison_end.checked_sub_days(Days::new(days))?;
            (comparison_start, comparison_end)
        }
        CompareMode::PreviousYear => (
            start.checked_sub_months(Months::new(12))?,
            end.checked_sub_months(Months::new(12))?,
        ),
    };
    Some(ComparisonRange {
        mode,
        primary_start: start,
        primary_end: end,
        comparison_start,
        comparison_end,
    })
}

/// Percentage change from `previous` to `current`; 0 when there is no
/// previous value to compare against.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Named numeric fields of a totals row, in a stable order.
pub trait MetricFields {
    fn metric_fields(&self) -> Vec<(&'static str, f64)>;
}

/// Per-field [`percent_change`] between two totals rows.
pub fn metric_changes<M: MetricFields>(current: &M, previous: &M) -> BTreeMap<&'static str, f64> {
    let previous: BTreeMap<_, _> = previous.metric_fields().into_iter().collect();
    current
        .metric_fields()
        .into_iter()
        .map(|(name, value)| {
            let before = previous.get(name).copied().unwrap_or_default();
            (name, percent_change(value, before))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
    }

    #[test]
    fn previous_period_has_same_length_and_ends_day_before() {
        let range = resolve_comparison_range(d("2025-07-01"), d("2025-07-29"), CompareMode::PreviousPeriod)
            .expect("range");
        assert_eq!(range.comparison_end, d("2025-06-30"));
        assert_eq!(range.comparison_start, d("2025-06-02"));
        assert_eq!(
            (range.comparison_end - range.comparison_start).num_days(),
            (range.primary_end - range.primary_start).num_days()
        );
    }

    #[test]
    fn previous_period_of_single_day_is_the_day_before() {
        let range = resolve_comparison_range(d("2025-03-01"), d("2025-03-01"), CompareMode::PreviousPeriod)
            .expect("range");
        assert_eq!(range.comparison_start, d("2025-02-28"));
        assert_eq!(range.comparison_end, d("2025-02-28"));
    }

    #[test]
    fn previous_year_clamps_leap_day() {
        let range = resolve_comparison_range(d("2024-02-29"), d("2024-03-31"), CompareMode::PreviousYear)
            .expect("range");
        assert_eq!(range.comparison_start, d("2023-02-28"));
        assert_eq!(range.comparison_end, d("2023-03-31"));
    }

    #[test]
    fn none_mode_and_reversed_ranges_resolve_to_nothing() {
        assert!(resolve_comparison_range(d("2025-01-01"), d("2025-01-31"), CompareMode::None).is_none());
        assert!(
            resolve_comparison_range(d("2025-02-01"), d("2025-01-01"), CompareMode::PreviousPeriod)
                .is_none()
        );
    }

    #[test]
    fn parse_rejects_unknown_modes() {
        assert_eq!(CompareMode::parse(None), Ok(CompareMode::None));
        assert_eq!(CompareMode::parse(Some("previous_year")), Ok(CompareMode::PreviousYear));
        assert!(CompareMode::parse(Some("custom")).is_err());
    }

    #[test]
    fn percent_change_guards_zero_baseline() {
        assert_eq!(percent_change(10.0, 0.0), 0.0);
        assert_eq!(percent_change(15.0, 10.0), 50.0);
        assert_eq!(percent_change(5.0, 10.0), -50.0);
    }

    struct Totals(f64, f64);

    impl MetricFields for Totals {
        fn metric_fields(&self) -> Vec<(&'static str, f64)> {
            vec![("leads", self.0), ("spend", self.1)]
        }
    }

    #[test]
    fn metric_changes_are_per_field() {
        let changes = metric_changes(&Totals(12.0, 0.0), &Totals(8.0, 400.0));
        assert_eq!(changes.get("leads"), Some(&50.0));
        assert_eq!(changes.get("spend"), Some(&-100.0));
        assert_eq!(changes.len(), 2);
    }
}
