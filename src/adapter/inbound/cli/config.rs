//! Handlers for `subsetcut config`.

use anyhow::Context;

use super::command::ConfigPathArg;
use super::output;
use crate::infrastructure::config::Config;

/// Load and validate a configuration file, reporting the first problem.
pub fn validate(args: &ConfigPathArg) -> anyhow::Result<()> {
    Config::load(&args.config)
        .with_context(|| format!("invalid configuration {}", args.config.display()))?;
    output::success(&format!("{} is valid", args.config.display()));
    Ok(())
}

/// Print the effective configuration with defaults filled in.
pub fn show(args: &ConfigPathArg) -> anyhow::Result<()> {
    let config = Config::load(&args.config)
        .with_context(|| format!("invalid configuration {}", args.config.display()))?;
    let rendered = toml::to_string_pretty(&config).context("failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}
