use core_types::{DateRangePolicy, RecordErrorPolicy, SoldTrackingMode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional; an absent section takes its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub query: QuerySettings,
    pub formulas: FormulaSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

/// Defaults and hardening switches for incoming queries.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    /// The keyword used when a request does not name one.
    pub default_keyword: String,
    /// Whether a request with a single date bound runs unfiltered or is rejected.
    pub date_range_policy: DateRangePolicy,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_keyword: "Bitcoin".to_string(),
            date_range_policy: DateRangePolicy::Lenient,
        }
    }
}

/// Selects the formula variant and how invalid records are handled.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormulaSettings {
    pub sold_tracking: SoldTrackingMode,
    /// Fee/slippage factor on sold volume. Only used when `sold_tracking` is
    /// `volume_based`.
    pub volume_multiplier: Decimal,
    pub record_errors: RecordErrorPolicy,
}

impl Default for FormulaSettings {
    fn default() -> Self {
        Self {
            sold_tracking: SoldTrackingMode::AmountBased,
            volume_multiplier: dec!(1.05),
            record_errors: RecordErrorPolicy::Fail,
        }
    }
}

/// Connection pool settings. The URL itself comes from `DATABASE_URL`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, e.g. `info` or `query=debug,analytics=debug`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "dealval".to_string(),
        }
    }
}
