use crate::error::QueryError;
use analytics::{Aggregator, DerivedDealRow, DerivedTotalsRow, FormulaSet, SnapshotRow};
use chrono::NaiveDate;
use configuration::Config;
use core_types::{parse_date, CoreError, DateRange, DateRangePolicy};
use database::RecordStore;
use serde::Serialize;

/// Everything the presentation layer receives for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub keyword: String,
    pub date_range: Option<DateRange>,
    /// The date the snapshot was taken for, if any records were available.
    pub as_of_date: Option<NaiveDate>,
    pub totals: Vec<DerivedTotalsRow>,
    pub deal_series: Vec<DerivedDealRow>,
    pub snapshot: Vec<SnapshotRow>,
}

#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub default_keyword: String,
    pub date_range_policy: DateRangePolicy,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            default_keyword: "Bitcoin".to_string(),
            date_range_policy: DateRangePolicy::Lenient,
        }
    }
}

/// Orchestrates one store read and the aggregation over its result.
pub struct QueryFacade<S: RecordStore> {
    store: S,
    aggregator: Aggregator,
    options: QueryOptions,
}

impl<S: RecordStore> QueryFacade<S> {
    pub fn new(store: S, aggregator: Aggregator, options: QueryOptions) -> Self {
        Self {
            store,
            aggregator,
            options,
        }
    }

    /// Builds a facade with the formula variant, error policy and query defaults
    /// taken from `config`.
    pub fn from_config(store: S, config: &Config) -> Self {
        let formulas = FormulaSet::new(
            config.formulas.sold_tracking,
            config.formulas.volume_multiplier,
        );
        let aggregator = Aggregator::new(formulas, config.formulas.record_errors);
        let options = QueryOptions {
            default_keyword: config.query.default_keyword.clone(),
            date_range_policy: config.query.date_range_policy,
        };
        Self::new(store, aggregator, options)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs a query for `keyword` over an optional date range.
    ///
    /// Dates are ISO `YYYY-MM-DD` strings and are parsed before the store is touched.
    /// An empty keyword means the configured default. The snapshot is taken for
    /// `to_date` whenever it is given, even if the range itself is dropped by the
    /// lenient policy. Without `to_date` it is taken for the latest fetched date.
    #[tracing::instrument(skip(self))]
    pub async fn run_query(
        &self,
        keyword: &str,
        from_date: Option<&str>,
        to_date: Option<&str>,
    ) -> Result<QueryResult, QueryError> {
        let keyword = match keyword.trim() {
            "" => self.options.default_keyword.as_str(),
            k => k,
        };
        let from = from_date.map(parse_date).transpose()?;
        let to = to_date.map(parse_date).transpose()?;
        let date_range = resolve_range(from, to, self.options.date_range_policy)?;

        let records = self.store.fetch(keyword, date_range).await?;

        let as_of_date = to.or_else(|| records.iter().map(|r| r.date).max());
        let tables = self.aggregator.compute_all(&records, as_of_date)?;

        tracing::info!(
            keyword,
            records = records.len(),
            totals = tables.totals.len(),
            snapshot = tables.snapshot.len(),
            "Query complete."
        );

        Ok(QueryResult {
            keyword: keyword.to_string(),
            date_range,
            as_of_date,
            totals: tables.totals,
            deal_series: tables.deal_series,
            snapshot: tables.snapshot,
        })
    }
}

/// Applies the single-bound policy to already parsed bounds.
pub fn resolve_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    policy: DateRangePolicy,
) -> Result<Option<DateRange>, CoreError> {
    match (from, to) {
        (Some(from), Some(to)) => DateRange::new(from, to).map(Some),
        (None, None) => Ok(None),
        _ => match policy {
            DateRangePolicy::Strict => Err(CoreError::IncompleteDateRange),
            DateRangePolicy::Lenient => {
                tracing::warn!(?from, ?to, "Only one date bound supplied; querying all dates.");
                Ok(None)
            }
        },
    }
}
