//! # Deal Record Store
//!
//! This crate is the read side of the raw deal records, plus the write path used to
//! load them.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All SQL lives here. The rest of the application sees only the
//!   `RecordStore` trait, so the query layer can run against Postgres or an
//!   in-memory record set.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and it uses a
//!   connection pool (`PgPool`) constructed once and injected into `DbRepository`.
//!
//! ## Public API
//!
//! - `connect` / `run_migrations`: pool setup and schema migrations.
//! - `RecordStore`: the fetch interface consumed by the query facade.
//! - `DbRepository`: the Postgres implementation.
//! - `InMemoryStore`: a fixed record set, used in tests.
//! - `DbError`: the specific error types that can be returned from this crate.

pub mod connection;
pub mod error;
pub mod repository;
pub mod store;

pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::{DbDealRecord, DbRepository};
pub use store::{InMemoryStore, RecordStore};
