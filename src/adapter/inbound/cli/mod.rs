//! CLI module graph.

pub mod command;
pub mod config;
pub mod output;
pub mod solve;
pub mod synthetic;

use command::{Cli, Commands, ConfigCommand};

/// Dispatch a parsed command line.
///
/// # Errors
///
/// Returns the first failure of the selected subcommand, with context.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Solve(args) => solve::execute(&args),
        Commands::Synthetic(args) => synthetic::execute(&args),
        Commands::Config(ConfigCommand::Validate(args)) => config::validate(&args),
        Commands::Config(ConfigCommand::Show(args)) => config::show(&args),
    }
}
