//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `HEARTH_LEDGER_` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use hearth_ledger::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod quest_schedule;

pub use error::{ConfigError, ValidationError};
pub use quest_schedule::{QuestScheduleConfig, WeekStart};

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the Hearth Ledger core.
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Quest period boundaries (timezone offset, rollover hour, week start)
    #[serde(default)]
    pub quest_schedule: QuestScheduleConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `HEARTH_LEDGER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `HEARTH_LEDGER__QUEST_SCHEDULE__UTC_OFFSET_MINUTES=480`
    ///   -> `quest_schedule.utc_offset_minutes = 480`
    /// - `HEARTH_LEDGER__QUEST_SCHEDULE__WEEK_START=sunday`
    ///   -> `quest_schedule.week_start = Sunday`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("HEARTH_LEDGER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.quest_schedule.validate()?;
        Ok(())
    }
}
