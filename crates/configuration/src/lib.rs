use crate::error::ConfigError;
use rust_decimal::Decimal;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{Config, DatabaseSettings, FormulaSettings, LoggingSettings, QuerySettings};

/// Prefix for environment overrides, e.g. `DEALVAL__QUERY__DEFAULT_KEYWORD=Ethereum`.
pub const ENV_PREFIX: &str = "DEALVAL";

/// Loads the application configuration.
///
/// The file at `path` is optional; missing keys fall back to defaults. Environment
/// variables with the `DEALVAL__` prefix override file values.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    tracing::debug!(
        path = %path.display(),
        default_keyword = %config.query.default_keyword,
        date_range_policy = ?config.query.date_range_policy,
        sold_tracking = %config.formulas.sold_tracking,
        volume_multiplier = %config.formulas.volume_multiplier,
        record_errors = ?config.formulas.record_errors,
        "Configuration loaded."
    );

    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.query.default_keyword.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "query.default_keyword must not be empty".to_string(),
        ));
    }
    if config.formulas.volume_multiplier <= Decimal::ZERO {
        return Err(ConfigError::ValidationError(format!(
            "formulas.volume_multiplier must be positive, got {}",
            config.formulas.volume_multiplier
        )));
    }
    if config.database.max_connections == 0 {
        return Err(ConfigError::ValidationError(
            "database.max_connections must be at least 1".to_string(),
        ));
    }
    Ok(())
}
