use crate::error::AnalyticsError;
use crate::formulas::{DealMetrics, FormulaSet};
use crate::report::{DerivedDealRow, DerivedTotalsRow, SnapshotRow};
use chrono::NaiveDate;
use core_types::{RawDealRecord, RecordErrorPolicy};
use std::collections::BTreeMap;

/// The three tables derived from one record set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateTables {
    pub totals: Vec<DerivedTotalsRow>,
    pub deal_series: Vec<DerivedDealRow>,
    pub snapshot: Vec<SnapshotRow>,
}

/// A stateless calculator that turns raw deal records into derived tables.
///
/// Every record is validated and derived before any summation, so a date group is
/// either complete over the accepted records or the whole call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    formulas: FormulaSet,
    policy: RecordErrorPolicy,
}

impl Aggregator {
    pub fn new(formulas: FormulaSet, policy: RecordErrorPolicy) -> Self {
        Self { formulas, policy }
    }

    pub fn formulas(&self) -> &FormulaSet {
        &self.formulas
    }

    pub fn policy(&self) -> RecordErrorPolicy {
        self.policy
    }

    /// Groups records by date and sums each derived metric per group.
    ///
    /// Output is ascending by date with one row per distinct date. Duplicate
    /// observations of the same deal on the same date each contribute.
    pub fn compute_totals(
        &self,
        records: &[RawDealRecord],
    ) -> Result<Vec<DerivedTotalsRow>, AnalyticsError> {
        let derived = self.derive_all(records)?;
        totals_from(&derived)
    }

    /// One row per record, in input order.
    pub fn compute_deal_series(
        &self,
        records: &[RawDealRecord],
    ) -> Result<Vec<DerivedDealRow>, AnalyticsError> {
        let derived = self.derive_all(records)?;
        Ok(series_from(&derived))
    }

    /// Per-deal rows for records dated exactly `as_of`, ascending by deal uid.
    ///
    /// No matching record is a valid empty result. The whole record set goes through
    /// the error policy first, so this agrees with the snapshot of `compute_all`.
    pub fn compute_snapshot(
        &self,
        records: &[RawDealRecord],
        as_of: NaiveDate,
    ) -> Result<Vec<SnapshotRow>, AnalyticsError> {
        let derived = self.derive_all(records)?;
        Ok(snapshot_from(&derived, as_of))
    }

    /// Derives every record once and builds all three tables from the result.
    ///
    /// With no `as_of` date the snapshot is empty.
    pub fn compute_all(
        &self,
        records: &[RawDealRecord],
        as_of: Option<NaiveDate>,
    ) -> Result<AggregateTables, AnalyticsError> {
        let derived = self.derive_all(records)?;
        let snapshot = match as_of {
            Some(date) => snapshot_from(&derived, date),
            None => Vec::new(),
        };
        Ok(AggregateTables {
            totals: totals_from(&derived)?,
            deal_series: series_from(&derived),
            snapshot,
        })
    }

    /// Applies the formula set to each record under the configured error policy.
    fn derive_all<'a>(
        &self,
        records: &'a [RawDealRecord],
    ) -> Result<Vec<(&'a RawDealRecord, DealMetrics)>, AnalyticsError> {
        let mut derived = Vec::with_capacity(records.len());
        let mut first_error = None;
        let mut rejected = 0usize;

        for record in records {
            match self.formulas.derive(record) {
                Ok(metrics) => derived.push((record, metrics)),
                Err(e) => match self.policy {
                    RecordErrorPolicy::Fail => return Err(e),
                    RecordErrorPolicy::Skip => {
                        tracing::warn!(
                            deal_uid = %record.deal_uid,
                            date = %record.date,
                            error = %e,
                            "Skipping invalid deal record."
                        );
                        rejected += 1;
                        first_error.get_or_insert(e);
                    }
                },
            }
        }

        if derived.is_empty() {
            // Every record was rejected, so the mismatch affects the whole set.
            if let Some(e) = first_error {
                return Err(e);
            }
        }
        if rejected > 0 {
            tracing::warn!(
                rejected,
                accepted = derived.len(),
                "Some deal records were excluded from aggregation."
            );
        }
        Ok(derived)
    }
}

fn totals_from(
    derived: &[(&RawDealRecord, DealMetrics)],
) -> Result<Vec<DerivedTotalsRow>, AnalyticsError> {
    let mut groups: BTreeMap<NaiveDate, DerivedTotalsRow> = BTreeMap::new();
    for (record, metrics) in derived {
        groups
            .entry(record.date)
            .or_insert_with(|| DerivedTotalsRow::new(record.date))
            .accumulate(metrics)?;
    }
    tracing::debug!(groups = groups.len(), records = derived.len(), "Computed date totals.");
    Ok(groups.into_values().collect())
}

fn series_from(derived: &[(&RawDealRecord, DealMetrics)]) -> Vec<DerivedDealRow> {
    derived
        .iter()
        .map(|(record, metrics)| DerivedDealRow::from_metrics(record, metrics))
        .collect()
}

fn snapshot_from(derived: &[(&RawDealRecord, DealMetrics)], as_of: NaiveDate) -> Vec<SnapshotRow> {
    let mut rows: Vec<SnapshotRow> = derived
        .iter()
        .filter(|(record, _)| record.date == as_of)
        .map(|(record, metrics)| SnapshotRow::from_metrics(record, metrics))
        .collect();
    // Stable, so duplicate observations keep their input order.
    rows.sort_by(|a, b| a.deal_uid.cmp(&b.deal_uid));
    rows
}
