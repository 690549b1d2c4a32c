use crate::error::AnalyticsError;
use crate::formulas::DealMetrics;
use chrono::NaiveDate;
use core_types::RawDealRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sums of every derived metric across all records sharing one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedTotalsRow {
    pub date: NaiveDate,
    pub total_real_volume: Decimal,
    pub total_init_volume: Decimal,
    pub total_effective_volume: Decimal,
    pub total_expected_volume: Decimal,
    pub total_init_amount: Decimal,
    pub total_effective_amount: Decimal,
    pub total_expected_amount: Decimal,
}

impl DerivedTotalsRow {
    /// Creates a zeroed row for `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            total_real_volume: Decimal::ZERO,
            total_init_volume: Decimal::ZERO,
            total_effective_volume: Decimal::ZERO,
            total_expected_volume: Decimal::ZERO,
            total_init_amount: Decimal::ZERO,
            total_effective_amount: Decimal::ZERO,
            total_expected_amount: Decimal::ZERO,
        }
    }

    /// Adds one record's metrics into the running sums.
    pub fn accumulate(&mut self, metrics: &DealMetrics) -> Result<(), AnalyticsError> {
        let add = |total: Decimal, value: Decimal, metric: &str| {
            total
                .checked_add(value)
                .ok_or_else(|| AnalyticsError::Calculation(metric.to_string()))
        };

        self.total_real_volume = add(self.total_real_volume, metrics.real_volume, "total_real_volume")?;
        self.total_init_volume = add(self.total_init_volume, metrics.init_volume, "total_init_volume")?;
        self.total_effective_volume = add(
            self.total_effective_volume,
            metrics.effective_volume,
            "total_effective_volume",
        )?;
        self.total_expected_volume = add(
            self.total_expected_volume,
            metrics.expected_volume,
            "total_expected_volume",
        )?;
        self.total_init_amount = add(self.total_init_amount, metrics.init_amount, "total_init_amount")?;
        self.total_effective_amount = add(
            self.total_effective_amount,
            metrics.effective_amount,
            "total_effective_amount",
        )?;
        self.total_expected_amount = add(
            self.total_expected_amount,
            metrics.expected_amount,
            "total_expected_amount",
        )?;
        Ok(())
    }
}

/// One raw record with its per-deal expected volume attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedDealRow {
    pub deal_uid: String,
    pub date: NaiveDate,
    pub price: Decimal,
    pub volume: Decimal,
    pub init_volume: Decimal,
    pub deal_expected_volume: Decimal,
}

impl DerivedDealRow {
    pub fn from_metrics(record: &RawDealRecord, metrics: &DealMetrics) -> Self {
        Self {
            deal_uid: record.deal_uid.clone(),
            date: record.date,
            price: record.price,
            volume: metrics.real_volume,
            init_volume: metrics.init_volume,
            deal_expected_volume: metrics.deal_expected_volume,
        }
    }
}

/// The state of one deal on the snapshot date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub deal_uid: String,
    pub date: NaiveDate,
    pub deal_sold_volume: Decimal,
    pub deal_expected_volume: Decimal,
    pub deal_effective_amount: Decimal,
    pub deal_sold_amount: Decimal,
    pub deal_expected_amount: Decimal,
}

impl SnapshotRow {
    pub fn from_metrics(record: &RawDealRecord, metrics: &DealMetrics) -> Self {
        Self {
            deal_uid: record.deal_uid.clone(),
            date: record.date,
            deal_sold_volume: metrics.deal_sold_volume,
            deal_expected_volume: metrics.deal_expected_volume,
            deal_effective_amount: metrics.effective_amount,
            deal_sold_amount: metrics.sold_amount,
            deal_expected_amount: metrics.expected_amount,
        }
    }
}
