use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid request: {0}")]
    Request(#[from] core_types::CoreError),

    #[error("Record store error: {0}")]
    Store(#[from] database::DbError),

    #[error("Aggregation error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),
}
