//! # Deal Valuation Analytics
//!
//! This crate turns raw deal records into derived volume and valuation tables.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O and no knowledge of the record store. It depends only on
//!   `core-types`.
//! - **Stateless Calculation:** `Aggregator` holds only the active `FormulaSet` and the
//!   record error policy. It can be shared freely across concurrent requests.
//!
//! ## Public API
//!
//! - `formulas`: the per-record metric functions and `FormulaSet`, which applies them
//!   under a `SoldTrackingMode`.
//! - `Aggregator`: `compute_totals`, `compute_deal_series`, `compute_snapshot`.
//! - `DerivedTotalsRow`, `DerivedDealRow`, `SnapshotRow`: the output rows.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

pub mod engine;
pub mod error;
pub mod formulas;
pub mod report;

pub use engine::{AggregateTables, Aggregator};
pub use error::AnalyticsError;
pub use formulas::{DealMetrics, FormulaSet, DEFAULT_VOLUME_MULTIPLIER};
pub use report::{DerivedDealRow, DerivedTotalsRow, SnapshotRow};
