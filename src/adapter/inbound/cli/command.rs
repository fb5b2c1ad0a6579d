//! Command-line interface definitions.
//!
//! Defines the CLI structure for the subsetcut binary using `clap`: solving a
//! dataset, generating synthetic data and checking configuration files.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::Loss;

/// Cardinality-constrained sparse regression by outer approximation
#[derive(Parser, Debug)]
#[command(name = "subsetcut")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select at most k features of a dataset and fit them
    Solve(SolveArgs),

    /// Write a synthetic dataset with known informative features
    Synthetic(SyntheticArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `subsetcut config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate a configuration file for correctness.
    Validate(ConfigPathArg),
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
}

/// Path to a configuration file.
#[derive(Args, Debug)]
pub struct ConfigPathArg {
    /// TOML configuration file
    #[arg(long, default_value = "subsetcut.toml")]
    pub config: PathBuf,
}

/// Arguments for `subsetcut solve`.
///
/// Command-line values override the `[problem]` and `[solver]` sections of
/// the configuration file.
#[derive(Args, Debug)]
pub struct SolveArgs {
    /// TOML configuration file; defaults apply when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON dataset: {"x": [[...], ...], "y": [...]}
    #[arg(long)]
    pub data: PathBuf,

    /// Loss function [least_squares, logistic, squared_hinge]
    #[arg(long)]
    pub loss: Option<Loss>,

    /// Maximum number of selected features
    #[arg(long)]
    pub k: Option<usize>,

    /// Ridge parameter
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Wall-clock budget in seconds
    #[arg(long)]
    pub time_limit: Option<f64>,

    /// Relative optimality gap tolerance
    #[arg(long)]
    pub gap_tolerance: Option<f64>,

    /// Worker threads for the master solver
    #[arg(long)]
    pub threads: Option<usize>,

    /// Seed for the random warm start
    #[arg(long)]
    pub seed: Option<u64>,

    /// Initial support, comma separated (e.g. 0,3,7)
    #[arg(long, value_delimiter = ',')]
    pub initial_support: Option<Vec<usize>>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `subsetcut synthetic`.
#[derive(Args, Debug)]
pub struct SyntheticArgs {
    /// Number of samples
    #[arg(long, default_value_t = 100)]
    pub n: usize,

    /// Number of features
    #[arg(long, default_value_t = 10)]
    pub p: usize,

    /// Informative features, comma separated
    #[arg(long, value_delimiter = ',', default_value = "0,3")]
    pub informative: Vec<usize>,

    /// Magnitude of the true coefficients
    #[arg(long, default_value_t = 2.0)]
    pub amplitude: f64,

    /// Standard deviation of the additive noise
    #[arg(long, default_value_t = 0.1)]
    pub noise: f64,

    /// Random seed
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Produce +1/-1 targets for this loss
    #[arg(long, default_value = "least_squares")]
    pub loss: Loss,

    /// Output file; stdout when omitted
    #[arg(long)]
    pub out: Option<PathBuf>,
}
