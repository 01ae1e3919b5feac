//! `cluster-manager generate`: resolve, render and write every manifest.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use kubecare_core::EnvironmentContext;
use kubecare_sync::{default_output_dir, render_repository, to_stream, write_all, WriteResult};

/// Arguments for `cluster-manager generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output directory. Defaults to `<repo>/manifests`.
    #[arg(long, short, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Show what would be written without actually writing any files.
    #[arg(long, conflicts_with = "stdout")]
    pub dry_run: bool,

    /// Print every manifest as one YAML stream instead of writing files.
    #[arg(long)]
    pub stdout: bool,
}

impl GenerateArgs {
    pub fn run(self, env: &EnvironmentContext) -> Result<()> {
        let rendered = render_repository(env).context("generate failed")?;

        if self.stdout {
            print!("{}", to_stream(&rendered));
            return Ok(());
        }

        let output = self.output.unwrap_or_else(|| default_output_dir(env));
        let results = write_all(&rendered, &output, self.dry_run)
            .with_context(|| format!("failed to write manifests to {}", output.display()))?;

        if results.is_empty() {
            println!("No clusters found under {}.", env.repo_path.join("clusters").display());
        }
        for r in &results {
            print_results(&r.cluster.0, &r.writes, self.dry_run);
        }
        Ok(())
    }
}

fn print_results(cluster: &str, writes: &[WriteResult], dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let changed = writes.iter().filter(|r| r.is_change()).count();
    let unchanged = writes.len() - changed;

    let verb = if dry_run { "would write" } else { "written" };
    println!(
        "{prefix}{} '{cluster}' ({changed} {verb}, {unchanged} unchanged)",
        "✓".green()
    );

    for r in writes {
        match r {
            WriteResult::Written { path } => println!("  ✎  {}", path.display()),
            WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
            WriteResult::Unchanged { path } => println!("  ·  {}", path.display().to_string().bright_black()),
        }
    }
}
