//! Application configuration management.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Environment variable prefix for configuration overrides.
const ENV_PREFIX: &str = "DIVVY";

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Split engine configuration.
    pub split: SplitConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Which participants absorb the leftover cents of an equal split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EqualRemainder {
    /// The first participant in list order takes the whole remainder.
    #[default]
    FirstParticipant,
    /// Leftover cents go one each to participants from the front of the list.
    Spread,
}

/// Split engine configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Allowed deviation of the percentage sum from 100.
    pub percentage_tolerance: Decimal,
    /// Remainder rule for equal splits.
    pub equal_remainder: EqualRemainder,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            percentage_tolerance: default_percentage_tolerance(),
            equal_remainder: EqualRemainder::default(),
        }
    }
}

fn default_percentage_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "divvy=info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(Self::environment())
            .build()?;

        config.try_deserialize::<Self>()?.validated()
    }

    /// Loads configuration from one explicit file, with environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(Self::environment())
            .build()?;

        config.try_deserialize::<Self>()?.validated()
    }

    /// Rejects values the engine cannot work with.
    fn validated(self) -> Result<Self, config::ConfigError> {
        if self.split.percentage_tolerance < Decimal::ZERO {
            return Err(config::ConfigError::Message(format!(
                "split.percentage_tolerance must not be negative, got {}",
                self.split.percentage_tolerance
            )));
        }
        Ok(self)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
    }
}
