use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid granularity: {0} (expected day, week or month)")]
    InvalidGranularity(String),

    #[error("invalid compare mode: {0} (expected none, previous_period or previous_year)")]
    InvalidCompareMode(String),
}
