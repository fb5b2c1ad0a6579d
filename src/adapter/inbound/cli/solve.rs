//! Handler for the `solve` command.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use super::command::SolveArgs;
use super::output;
use crate::adapter::outbound::{HighsSolver, RidgeOracle};
use crate::application::OuterApproximation;
use crate::domain::{Dataset, DatasetFile};
use crate::infrastructure::config::Config;

/// Execute the solve command.
pub fn execute(args: &SolveArgs) -> anyhow::Result<()> {
    let config = effective_config(args)?;
    config.init_logging();

    let data = read_dataset(&args.data)?;
    info!(
        path = %args.data.display(),
        samples = data.n_samples(),
        features = data.n_features(),
        "Loaded dataset"
    );

    let mut options = config.solve_options();
    if let Some(indices) = &args.initial_support {
        options = options.with_initial_support(indices.clone());
    }

    let ridge = Arc::new(RidgeOracle::default());
    let driver = OuterApproximation::new(Arc::new(HighsSolver::new()), ridge.clone(), ridge);
    let fit = driver
        .solve(
            config.problem.loss,
            &data,
            config.problem.k,
            config.problem.gamma,
            &options,
        )
        .context("solve failed")?;

    if args.json {
        output::fit_json(&fit).context("failed to serialize result")?;
    } else {
        output::fit(&fit);
    }
    Ok(())
}

/// Configuration file (or defaults) with command-line overrides applied.
fn effective_config(args: &SolveArgs) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("invalid configuration {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(loss) = args.loss {
        config.problem.loss = loss;
    }
    if let Some(k) = args.k {
        config.problem.k = k;
    }
    if let Some(gamma) = args.gamma {
        config.problem.gamma = gamma;
    }
    if let Some(secs) = args.time_limit {
        config.solver.time_limit_secs = secs;
    }
    if let Some(tol) = args.gap_tolerance {
        config.solver.gap_tolerance = tol;
    }
    if args.threads.is_some() {
        config.solver.threads = args.threads;
    }
    if args.seed.is_some() {
        config.solver.seed = args.seed;
    }

    config.validate().context("invalid command-line override")?;
    Ok(config)
}

fn read_dataset(path: &Path) -> anyhow::Result<Dataset> {
    let file =
        File::open(path).with_context(|| format!("failed to open dataset {}", path.display()))?;
    let raw: DatasetFile = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse dataset {}", path.display()))?;
    raw.into_dataset()
        .with_context(|| format!("invalid dataset {}", path.display()))
}
