//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings. Every
//! section is optional and defaults to a 32-participant league: two
//! categories of four groups, 17 games over 18 slots.
//!
//! # Example
//!
//! ```no_run
//! use matchweek::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("matchweek.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use crate::adapter::solver::SolverConfig;
use crate::domain::{ConstraintConfig, RepairConfig, SeasonFormat};
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Season format driving matchup generation.
    #[serde(default)]
    pub season: SeasonFormat,

    /// Slot assignment constraints.
    #[serde(default)]
    pub constraints: ConstraintConfig,

    /// Repair pass limits.
    #[serde(default)]
    pub repair: RepairConfig,

    /// Options handed to the MIP backend.
    #[serde(default)]
    pub solver: SolverConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// Checks that values are within ranges the engine can work with.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: "must be \"pretty\" or \"json\"".to_string(),
            }
            .into());
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "level" }.into());
        }

        let season = &self.season;
        let constraints = &self.constraints;
        if season.games_per_participant == 0 {
            return Err(ConfigError::InvalidValue {
                field: "games_per_participant",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if constraints.slots == 0 {
            return Err(ConfigError::InvalidValue {
                field: "slots",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if season.games_per_participant > constraints.slots {
            return Err(ConfigError::InvalidValue {
                field: "games_per_participant",
                reason: format!("must not exceed slots ({})", constraints.slots),
            }
            .into());
        }
        if constraints.max_per_slot == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_per_slot",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if let Some(window) = constraints.bye_window {
            if window.start == 0 || window.start > window.end || window.end > constraints.slots {
                return Err(ConfigError::InvalidValue {
                    field: "bye_window",
                    reason: format!("must satisfy 1 <= start <= end <= {}", constraints.slots),
                }
                .into());
            }
        }
        if constraints.max_cross_category_per_slot == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_cross_category_per_slot",
                reason: "must be greater than 0 when set".to_string(),
            }
            .into());
        }

        if self.repair.max_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_iterations",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.solver.threads == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "threads",
                reason: "must be greater than 0 when set".to_string(),
            }
            .into());
        }
        if self.solver.time_limit_secs.is_some_and(|t| !(t > 0.0)) {
            return Err(ConfigError::InvalidValue {
                field: "time_limit_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self
            .solver
            .mip_rel_gap
            .is_some_and(|g| !(0.0..=1.0).contains(&g))
        {
            return Err(ConfigError::InvalidValue {
                field: "mip_rel_gap",
                reason: "must be between 0 and 1".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
