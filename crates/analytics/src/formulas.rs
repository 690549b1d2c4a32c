//! The metric formula library.
//!
//! Every function here is pure: scalar inputs in, one `Decimal` out. Arithmetic is
//! checked so an overflow surfaces as `AnalyticsError::Calculation` instead of a panic.

use crate::error::AnalyticsError;
use core_types::{RawDealRecord, SoldTrackingMode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fee/slippage factor applied to sold volume by the volume-based formulas.
pub const DEFAULT_VOLUME_MULTIPLIER: Decimal = dec!(1.05);

fn checked_add(a: Decimal, b: Decimal, metric: &str) -> Result<Decimal, AnalyticsError> {
    a.checked_add(b)
        .ok_or_else(|| AnalyticsError::Calculation(metric.to_string()))
}

fn checked_sub(a: Decimal, b: Decimal, metric: &str) -> Result<Decimal, AnalyticsError> {
    a.checked_sub(b)
        .ok_or_else(|| AnalyticsError::Calculation(metric.to_string()))
}

fn checked_mul(a: Decimal, b: Decimal, metric: &str) -> Result<Decimal, AnalyticsError> {
    a.checked_mul(b)
        .ok_or_else(|| AnalyticsError::Calculation(metric.to_string()))
}

/// Divides `numerator` by `denominator`, yielding zero when the denominator is
/// absent or zero.
pub fn guarded_div(
    numerator: Decimal,
    denominator: Option<Decimal>,
) -> Result<Decimal, AnalyticsError> {
    match denominator {
        Some(d) if !d.is_zero() => numerator
            .checked_div(d)
            .ok_or_else(|| AnalyticsError::Calculation("guarded_div".to_string())),
        _ => Ok(Decimal::ZERO),
    }
}

/// `volume + sold_volume`
pub fn effective_volume(volume: Decimal, sold_volume: Decimal) -> Result<Decimal, AnalyticsError> {
    checked_add(volume, sold_volume, "effective_volume")
}

/// `volume + sold_amount / init_price`, with the quotient guarded.
pub fn expected_volume_from_amount(
    volume: Decimal,
    sold_amount: Decimal,
    init_price: Option<Decimal>,
) -> Result<Decimal, AnalyticsError> {
    let recovered = guarded_div(sold_amount, init_price)?;
    checked_add(volume, recovered, "expected_volume")
}

/// `volume + sold_volume * multiplier`
pub fn expected_volume_from_volume(
    volume: Decimal,
    sold_volume: Decimal,
    multiplier: Decimal,
) -> Result<Decimal, AnalyticsError> {
    let adjusted = checked_mul(sold_volume, multiplier, "expected_volume")?;
    checked_add(volume, adjusted, "expected_volume")
}

/// `init_volume * price`
pub fn init_amount(init_volume: Decimal, price: Decimal) -> Result<Decimal, AnalyticsError> {
    checked_mul(init_volume, price, "init_amount")
}

/// `volume * price + sold_amount`
pub fn effective_amount(
    volume: Decimal,
    price: Decimal,
    sold_amount: Decimal,
) -> Result<Decimal, AnalyticsError> {
    let held = checked_mul(volume, price, "effective_amount")?;
    checked_add(held, sold_amount, "effective_amount")
}

/// `expected_volume * price`
pub fn expected_amount(expected_volume: Decimal, price: Decimal) -> Result<Decimal, AnalyticsError> {
    checked_mul(expected_volume, price, "expected_amount")
}

/// `expected_volume - init_volume`
///
/// The committed volume is subtracted from the whole expected volume, whether or
/// not a commitment price was available for the sold-amount conversion.
pub fn deal_expected_volume(
    expected_volume: Decimal,
    init_volume: Decimal,
) -> Result<Decimal, AnalyticsError> {
    checked_sub(expected_volume, init_volume, "deal_expected_volume")
}

/// `volume + sold_volume`
pub fn deal_sold_volume(volume: Decimal, sold_volume: Decimal) -> Result<Decimal, AnalyticsError> {
    checked_add(volume, sold_volume, "deal_sold_volume")
}

/// Every derived figure for a single raw record.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DealMetrics {
    pub real_volume: Decimal,
    pub init_volume: Decimal,
    pub effective_volume: Decimal,
    pub expected_volume: Decimal,
    pub init_amount: Decimal,
    pub sold_amount: Decimal,
    pub effective_amount: Decimal,
    pub expected_amount: Decimal,
    pub deal_expected_volume: Decimal,
    pub deal_sold_volume: Decimal,
}

/// The formula variant in force, with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormulaSet {
    mode: SoldTrackingMode,
    volume_multiplier: Decimal,
}

impl Default for FormulaSet {
    fn default() -> Self {
        Self::amount_based()
    }
}

impl FormulaSet {
    pub fn new(mode: SoldTrackingMode, volume_multiplier: Decimal) -> Self {
        Self {
            mode,
            volume_multiplier,
        }
    }

    pub fn amount_based() -> Self {
        Self::new(SoldTrackingMode::AmountBased, DEFAULT_VOLUME_MULTIPLIER)
    }

    pub fn volume_based(volume_multiplier: Decimal) -> Self {
        Self::new(SoldTrackingMode::VolumeBased, volume_multiplier)
    }

    pub fn mode(&self) -> SoldTrackingMode {
        self.mode
    }

    pub fn volume_multiplier(&self) -> Decimal {
        self.volume_multiplier
    }

    /// Checks the record against the data-model invariants and the fields the
    /// active mode requires.
    pub fn validate(&self, record: &RawDealRecord) -> Result<(), AnalyticsError> {
        if record.volume < Decimal::ZERO {
            return Err(invalid(record, format!("negative volume {}", record.volume)));
        }
        if record.price < Decimal::ZERO {
            return Err(invalid(record, format!("negative price {}", record.price)));
        }

        let present = match self.mode {
            SoldTrackingMode::VolumeBased => record.sold_volume.is_some(),
            SoldTrackingMode::AmountBased => record.sold_amount.is_some(),
        };
        if !present {
            return Err(AnalyticsError::SchemaMismatch {
                deal_uid: record.deal_uid.clone(),
                date: record.date,
                field: self.mode.required_field(),
                mode: self.mode,
            });
        }
        Ok(())
    }

    /// Validates the record and computes every derived figure for it.
    pub fn derive(&self, record: &RawDealRecord) -> Result<DealMetrics, AnalyticsError> {
        self.validate(record)?;

        let volume = record.volume;
        let price = record.price;
        let init_volume = record.init_volume.unwrap_or_default();
        let sold_volume = record.sold_volume.unwrap_or_default();

        let (expected_volume, sold_amount) = match self.mode {
            SoldTrackingMode::AmountBased => {
                let sold_amount = record.sold_amount.unwrap_or_default();
                let expected =
                    expected_volume_from_amount(volume, sold_amount, record.init_price)?;
                (expected, sold_amount)
            }
            SoldTrackingMode::VolumeBased => {
                let expected =
                    expected_volume_from_volume(volume, sold_volume, self.volume_multiplier)?;
                let sold_amount = match record.sold_amount {
                    Some(amount) => amount,
                    None => checked_mul(sold_volume, price, "sold_amount")?,
                };
                (expected, sold_amount)
            }
        };

        Ok(DealMetrics {
            real_volume: volume,
            init_volume,
            effective_volume: effective_volume(volume, sold_volume)?,
            expected_volume,
            init_amount: init_amount(init_volume, price)?,
            sold_amount,
            effective_amount: effective_amount(volume, price, sold_amount)?,
            expected_amount: expected_amount(expected_volume, price)?,
            deal_expected_volume: deal_expected_volume(expected_volume, init_volume)?,
            deal_sold_volume: deal_sold_volume(volume, sold_volume)?,
        })
    }
}

fn invalid(record: &RawDealRecord, reason: String) -> AnalyticsError {
    AnalyticsError::InvalidRecord {
        deal_uid: record.deal_uid.clone(),
        date: record.date,
        reason,
    }
}
