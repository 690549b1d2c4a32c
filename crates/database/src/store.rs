use crate::error::DbError;
use async_trait::async_trait;
use core_types::{DateRange, RawDealRecord};
use std::sync::atomic::{AtomicUsize, Ordering};

/// The read-only interface the query layer uses to obtain raw deal records.
///
/// Implementations filter by exact keyword equality and, when given, an inclusive
/// date range. The order of the returned records is unspecified.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch(
        &self,
        keyword: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<RawDealRecord>, DbError>;
}

/// A `RecordStore` over a fixed in-memory record set.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: Vec<RawDealRecord>,
    fetches: AtomicUsize,
}

impl InMemoryStore {
    pub fn new(records: Vec<RawDealRecord>) -> Self {
        Self {
            records,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of `fetch` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn fetch(
        &self,
        keyword: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<RawDealRecord>, DbError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .records
            .iter()
            .filter(|r| r.keyword == keyword)
            .filter(|r| range.is_none_or(|bounds| bounds.contains(r.date)))
            .cloned()
            .collect())
    }
}
