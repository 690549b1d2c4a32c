use chrono::NaiveDate;
use core_types::SoldTrackingMode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error(
        "Schema mismatch for deal '{deal_uid}' on {date}: field '{field}' is required when sold tracking is {mode}"
    )]
    SchemaMismatch {
        deal_uid: String,
        date: NaiveDate,
        field: &'static str,
        mode: SoldTrackingMode,
    },

    #[error("Invalid record for deal '{deal_uid}' on {date}: {reason}")]
    InvalidRecord {
        deal_uid: String,
        date: NaiveDate,
        reason: String,
    },

    #[error("Calculation error: arithmetic overflow in metric '{0}'")]
    Calculation(String),
}
