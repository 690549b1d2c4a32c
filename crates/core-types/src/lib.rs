pub mod enums;
pub mod error;
pub mod records;

// Re-export the core types to provide a clean public API.
pub use enums::{DateRangePolicy, RecordErrorPolicy, SoldTrackingMode};
pub use error::CoreError;
pub use records::{parse_date, DateRange, RawDealRecord, DATE_FORMAT};
