use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The date format accepted on every external date input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One transaction observation for one deal on one date.
///
/// Optional fields mirror what the document store may omit. Whether an absent
/// field is defaulted or rejected depends on the active `SoldTrackingMode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDealRecord {
    pub deal_uid: String,
    pub date: NaiveDate,
    pub keyword: String,
    pub volume: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub init_volume: Option<Decimal>,
    #[serde(default)]
    pub init_price: Option<Decimal>,
    #[serde(default)]
    pub sold_volume: Option<Decimal>,
    #[serde(default)]
    pub sold_amount: Option<Decimal>,
}

impl RawDealRecord {
    /// Creates a record with only the always-present fields set.
    pub fn new(
        deal_uid: impl Into<String>,
        date: NaiveDate,
        keyword: impl Into<String>,
        volume: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            deal_uid: deal_uid.into(),
            date,
            keyword: keyword.into(),
            volume,
            price,
            init_volume: None,
            init_price: None,
            sold_volume: None,
            sold_amount: None,
        }
    }

    pub fn with_init(mut self, init_volume: Decimal, init_price: Decimal) -> Self {
        self.init_volume = Some(init_volume);
        self.init_price = Some(init_price);
        self
    }

    pub fn with_sold_volume(mut self, sold_volume: Decimal) -> Self {
        self.sold_volume = Some(sold_volume);
        self
    }

    pub fn with_sold_amount(mut self, sold_amount: Decimal) -> Self {
        self.sold_amount = Some(sold_amount);
        self
    }
}

/// An inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, CoreError> {
        if from > to {
            return Err(CoreError::InvalidDateRange { from, to });
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Parses an ISO `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| CoreError::MalformedDate(input.to_string()))
}
