//! `cluster-manager diff`: show unified diffs for what generate would write.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use kubecare_core::EnvironmentContext;
use kubecare_sync::{default_output_dir, diff_repository};

/// Arguments for `cluster-manager diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Directory to compare against. Defaults to `<repo>/manifests`.
    #[arg(long, short, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

impl DiffArgs {
    pub fn run(self, env: &EnvironmentContext) -> Result<()> {
        let output = self.output.unwrap_or_else(|| default_output_dir(env));
        let diffs = diff_repository(env, &output)
            .with_context(|| format!("diff failed against {}", output.display()))?;

        if diffs.is_empty() {
            println!("No differences in {}.", output.display());
            return Ok(());
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        Ok(())
    }
}
