//! `cluster-manager resolve`: print resolved application records.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use kubecare_core::{loader, EnvironmentContext, ResolvedApplication, ResolvedProject};
use kubecare_resolver::{resolve_cluster, ResolvedCluster};
use kubecare_sync::pipeline::renderer_for;

/// Arguments for `cluster-manager resolve`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Only resolve the cluster in `clusters/<ID>`.
    #[arg(long, value_name = "ID")]
    pub cluster: Option<String>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ClusterJson {
    cluster: String,
    project: ResolvedProject,
    applications: Vec<ResolvedApplication>,
}

#[derive(Tabled)]
struct ApplicationRow {
    #[tabled(rename = "kind")]
    kind: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "namespace")]
    namespace: String,
    #[tabled(rename = "source")]
    source: String,
    #[tabled(rename = "revision")]
    revision: String,
    #[tabled(rename = "auto sync")]
    auto_sync: bool,
    #[tabled(rename = "cascade delete")]
    cascade_delete: bool,
}

impl ResolveArgs {
    pub fn run(self, env: &EnvironmentContext) -> Result<()> {
        let mut entries = loader::scan_clusters(&env.repo_path)
            .context("failed to scan clusters; is --repo pointing at a configuration repository?")?;
        if let Some(wanted) = self.cluster.as_deref() {
            entries.retain(|e| e.id.0 == wanted);
            if entries.is_empty() {
                bail!("no cluster '{wanted}' under {}", env.repo_path.join("clusters").display());
            }
        }

        let renderer = renderer_for(env)?;
        let mut report = Vec::with_capacity(entries.len());
        for entry in &entries {
            let cluster = resolve_cluster(entry, env)
                .with_context(|| format!("resolve failed for cluster '{}'", entry.id))?;
            let generator = renderer
                .objects_generator(&cluster)
                .with_context(|| format!("objects generator failed for cluster '{}'", entry.id))?;
            report.push(cluster_json(cluster, generator));
        }

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize resolve JSON")?
            );
            return Ok(());
        }

        print_table(report);
        Ok(())
    }
}

fn cluster_json(cluster: ResolvedCluster, generator: ResolvedApplication) -> ClusterJson {
    let ResolvedCluster {
        id,
        project,
        kustomize_applications,
        helm_applications,
        ..
    } = cluster;
    let mut applications = kustomize_applications;
    applications.extend(helm_applications);
    applications.push(generator);
    ClusterJson {
        cluster: id.0,
        project,
        applications,
    }
}

fn print_table(report: Vec<ClusterJson>) {
    println!(
        "cluster-manager v{} | {} clusters | {} applications",
        env!("CARGO_PKG_VERSION"),
        report.len(),
        report.iter().map(|c| c.applications.len()).sum::<usize>(),
    );
    if report.is_empty() {
        println!("No clusters found.");
        return;
    }

    for cluster in report {
        println!(
            "{} {}",
            cluster.cluster.to_uppercase().bold(),
            format!("→ {}", cluster.project.server).bright_black()
        );
        let rows: Vec<ApplicationRow> = cluster
            .applications
            .into_iter()
            .map(|app| ApplicationRow {
                kind: app.kind.to_string(),
                source: if app.path.is_empty() {
                    app.repo_url
                } else {
                    format!("{} ({})", app.repo_url, app.path)
                },
                revision: app.target_revision,
                name: app.name,
                namespace: app.namespace,
                auto_sync: app.auto_sync,
                cascade_delete: app.cascade_delete,
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }
}
