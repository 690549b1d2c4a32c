use serde::{Deserialize, Serialize};
use std::fmt;

/// Determines how realized disposals are recorded on a deal and therefore which
/// formula set and which record fields apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SoldTrackingMode {
    /// Legacy datasets: disposals are recorded as a volume (`sold_volume`) and the
    /// expected volume applies a fixed fee/slippage multiplier.
    VolumeBased,
    /// Current datasets: disposals are recorded as a currency amount (`sold_amount`)
    /// and converted back to volume through the commitment price.
    #[default]
    AmountBased,
}

impl SoldTrackingMode {
    /// The record field that must be present for this mode.
    pub fn required_field(&self) -> &'static str {
        match self {
            SoldTrackingMode::VolumeBased => "sold_volume",
            SoldTrackingMode::AmountBased => "sold_amount",
        }
    }
}

impl fmt::Display for SoldTrackingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoldTrackingMode::VolumeBased => write!(f, "volume_based"),
            SoldTrackingMode::AmountBased => write!(f, "amount_based"),
        }
    }
}

/// What the aggregator does with a record that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordErrorPolicy {
    /// Abort the whole computation on the first invalid record.
    #[default]
    Fail,
    /// Drop the invalid record, log it, and aggregate the rest.
    Skip,
}

/// How a query treats a date range where only one bound was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DateRangePolicy {
    /// A single bound is ignored and the query runs over all dates.
    #[default]
    Lenient,
    /// Both bounds or neither; a single bound is rejected.
    Strict,
}
