//! cluster-manager: render Argo CD manifests from cluster and addon YAML.
//!
//! # Usage
//!
//! ```text
//! cluster-manager [--repo <dir>] [--base <dir>] [--repo-url <url>] [-v] <command>
//!
//! cluster-manager generate [--output <dir>] [--dry-run] [--stdout]
//! cluster-manager diff [--output <dir>]
//! cluster-manager resolve [--cluster <id>] [--json]
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use commands::{diff::DiffArgs, generate::GenerateArgs, resolve::ResolveArgs};
use kubecare_core::{context::executable_dir, EnvironmentContext};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "cluster-manager",
    version,
    about = "Generate Argo CD applications and projects from cluster configurations",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve every cluster and write its manifests.
    Generate(GenerateArgs),

    /// Show a unified diff of what generate would write.
    Diff(DiffArgs),

    /// Print the resolved application records.
    Resolve(ResolveArgs),
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Configuration repository holding `clusters/`. Defaults to the current directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub repo: Option<PathBuf>,

    /// Directory holding the bundled `addons/`. Defaults to the executable's directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub base: Option<PathBuf>,

    /// Repository URL used when nothing else sets one. Defaults to the git remote.
    #[arg(long, global = true, value_name = "URL")]
    pub repo_url: Option<String>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    pub fn environment(&self) -> Result<EnvironmentContext> {
        let repo = match &self.repo {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("could not determine current directory")?,
        };
        let base = match &self.base {
            Some(dir) => dir.clone(),
            None => executable_dir().context("could not determine executable directory")?,
        };
        Ok(EnvironmentContext::new(base, repo, self.repo_url.clone()))
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);
    let env = cli.global.environment()?;
    tracing::debug!(
        repo = %env.repo_path.display(),
        base = %env.base_path.display(),
        repo_url = %env.repo_url,
        "environment"
    );
    match cli.command {
        Commands::Generate(args) => args.run(&env),
        Commands::Diff(args) => args.run(&env),
        Commands::Resolve(args) => args.run(&env),
    }
}
