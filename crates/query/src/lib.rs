//! # Deal Valuation Query Facade
//!
//! Given a keyword and an optional date range, reads the matching raw records from a
//! `RecordStore` once and derives the totals, deal-series and snapshot tables from
//! that single in-memory set.

pub mod error;
pub mod facade;

pub use error::QueryError;
pub use facade::{resolve_range, QueryFacade, QueryOptions, QueryResult};
