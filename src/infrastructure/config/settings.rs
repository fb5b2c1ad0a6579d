//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates the problem, solver and
//! logging settings. Configuration is loaded from a TOML file; every section
//! and field is optional.
//!
//! # Example
//!
//! ```no_run
//! use subsetcut::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("subsetcut.toml")?;
//!     config.init_logging();
//!     let options = config.solve_options();
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use crate::application::{SolveOptions, WarmStart};
use crate::domain::Loss;
use crate::error::{ConfigError, Result};
use crate::infrastructure::environment;

/// Problem definition: which loss, how many features, how much ridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemConfig {
    pub loss: Loss,
    /// Maximum number of selected features.
    pub k: usize,
    /// Ridge parameter; larger means weaker regularization.
    pub gamma: f64,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            loss: Loss::default(),
            k: 5,
            gamma: 1.0,
        }
    }
}

/// Search limits and warm start settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Wall-clock budget in seconds.
    pub time_limit_secs: f64,

    /// Relative optimality gap at which the search may stop.
    pub gap_tolerance: f64,

    /// Worker threads. When unset, discovered from the environment.
    pub threads: Option<usize>,

    /// Seed for the random warm start.
    pub seed: Option<u64>,

    pub warm_start: WarmStart,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: 60.0,
            gap_tolerance: 0.0,
            threads: None,
            seed: None,
            warm_start: WarmStart::default(),
        }
    }
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub problem: ProblemConfig,

    #[serde(default)]
    pub solver: SolverConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
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
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Check that values are within acceptable ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if !self.logging.is_known_format() {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("expected \"pretty\" or \"json\", got {:?}", self.logging.format),
            }
            .into());
        }
        if !(self.problem.gamma.is_finite() && self.problem.gamma > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "gamma",
                reason: "must be finite and greater than 0".to_string(),
            }
            .into());
        }
        if !(self.solver.time_limit_secs.is_finite() && self.solver.time_limit_secs >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "time_limit_secs",
                reason: "must be finite and 0 or greater".to_string(),
            }
            .into());
        }
        if !(0.0..=1.0).contains(&self.solver.gap_tolerance) {
            return Err(ConfigError::InvalidValue {
                field: "gap_tolerance",
                reason: "must be between 0 and 1".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize the tracing subscriber from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Per-solve options derived from the `[solver]` section, with the
    /// thread count resolved against the environment.
    #[must_use]
    pub fn solve_options(&self) -> SolveOptions {
        SolveOptions {
            initial_support: None,
            time_limit: Duration::from_secs_f64(self.solver.time_limit_secs),
            gap_tolerance: self.solver.gap_tolerance,
            threads: environment::resolve_threads(self.solver.threads),
            seed: self.solver.seed,
            warm_start: self.solver.warm_start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.problem.k, 5);
        assert_eq!(config.solver.time_limit_secs, 60.0);
    }

    #[test]
    fn parses_all_sections() {
        let toml = r#"
[logging]
level = "debug"
format = "json"

[problem]
loss = "logistic"
k = 3
gamma = 0.5

[solver]
time_limit_secs = 2.5
gap_tolerance = 0.01
threads = 2
seed = 42
warm_start = "correlation"
"#;
        let config = Config::parse_toml(toml).unwrap();
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.problem.loss, Loss::Logistic);
        assert_eq!(config.problem.k, 3);
        assert_eq!(config.solver.threads, Some(2));
        assert_eq!(config.solver.warm_start, WarmStart::Correlation);

        let options = config.solve_options();
        assert_eq!(options.time_limit, Duration::from_millis(2500));
        assert_eq!(options.seed, Some(42));
        assert_eq!(options.gap_tolerance, 0.01);
    }

    #[test]
    fn rejects_bad_values() {
        let cases = [
            ("[problem]\ngamma = 0.0\n", "gamma"),
            ("[solver]\ngap_tolerance = 1.5\n", "gap_tolerance"),
            ("[solver]\ntime_limit_secs = -1.0\n", "time_limit_secs"),
            ("[logging]\nformat = \"xml\"\n", "format"),
        ];
        for (toml, expected) in cases {
            match Config::parse_toml(toml) {
                Err(Error::Config(ConfigError::InvalidValue { field, .. })) => {
                    assert_eq!(field, expected);
                }
                other => panic!("expected invalid {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn unknown_loss_is_a_parse_error() {
        let err = Config::parse_toml("[problem]\nloss = \"huber\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
