//! Handler for the `synthetic` command.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::Context;

use super::command::SyntheticArgs;
use super::output;
use crate::application::SyntheticSpec;
use crate::domain::DatasetFile;

/// Generate a dataset and write it as JSON.
pub fn execute(args: &SyntheticArgs) -> anyhow::Result<()> {
    let spec = SyntheticSpec {
        n: args.n,
        p: args.p,
        informative: args.informative.clone(),
        amplitude: args.amplitude,
        noise: args.noise,
        seed: args.seed,
    };
    let data = spec.generate(args.loss).context("invalid synthetic recipe")?;
    let file = DatasetFile::from(&data);

    match &args.out {
        Some(path) => {
            let handle = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(handle);
            serde_json::to_writer(&mut writer, &file)?;
            writer.flush()?;
            output::success(&format!(
                "wrote {} x {} dataset to {}",
                data.n_samples(),
                data.n_features(),
                path.display()
            ));
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            serde_json::to_writer(&mut writer, &file)?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}
