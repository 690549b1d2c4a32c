use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Malformed date '{0}': expected format YYYY-MM-DD")]
    MalformedDate(String),

    #[error("Invalid date range: from {from} is after to {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    #[error("Incomplete date range: both from_date and to_date must be supplied, or neither")]
    IncompleteDateRange,
}
