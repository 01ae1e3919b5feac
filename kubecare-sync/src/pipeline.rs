//! Whole-repository pipeline shared by `generate` and `diff`.
//!
//! Every cluster is resolved and rendered before anything touches the output
//! directory, so a failing cluster leaves no partial output behind.

use std::path::{Path, PathBuf};

use tracing::info;

use kubecare_core::{ClusterId, EnvironmentContext};
use kubecare_renderer::{Manifest, Renderer};
use kubecare_resolver::resolve_all;

use crate::error::SyncError;
use crate::writer::{atomic_write, WriteResult};

/// Directory under the repository holding user template overrides.
pub const TEMPLATES_DIR: &str = "templates";

/// Default output directory under the repository.
pub const MANIFESTS_DIR: &str = "manifests";

/// All rendered manifests of one cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterManifests {
    pub cluster: ClusterId,
    pub manifests: Vec<Manifest>,
}

/// Outcome of writing one cluster's manifests.
#[derive(Debug)]
pub struct GenerateClusterResult {
    pub cluster: ClusterId,
    pub writes: Vec<WriteResult>,
}

pub fn default_output_dir(env: &EnvironmentContext) -> PathBuf {
    env.repo_path.join(MANIFESTS_DIR)
}

/// Renderer with the embedded templates plus `<repo>/templates` overrides.
pub fn renderer_for(env: &EnvironmentContext) -> Result<Renderer, SyncError> {
    Ok(Renderer::with_templates(&env.repo_path.join(TEMPLATES_DIR))?)
}

/// Resolve and render every cluster of the repository.
pub fn render_repository(env: &EnvironmentContext) -> Result<Vec<ClusterManifests>, SyncError> {
    let clusters = resolve_all(env)?;
    let renderer = renderer_for(env)?;
    clusters
        .iter()
        .map(|cluster| -> Result<ClusterManifests, SyncError> {
            info!(cluster = %cluster.id, "evaluated cluster");
            Ok(ClusterManifests {
                cluster: cluster.id.clone(),
                manifests: renderer.render_cluster(cluster)?,
            })
        })
        .collect()
}

/// Render everything, then write it under `output_dir`.
pub fn generate(
    env: &EnvironmentContext,
    output_dir: &Path,
    dry_run: bool,
) -> Result<Vec<GenerateClusterResult>, SyncError> {
    let rendered = render_repository(env)?;
    write_all(&rendered, output_dir, dry_run)
}

pub fn write_all(
    rendered: &[ClusterManifests],
    output_dir: &Path,
    dry_run: bool,
) -> Result<Vec<GenerateClusterResult>, SyncError> {
    let mut results = Vec::with_capacity(rendered.len());
    for cluster in rendered {
        let mut writes = Vec::with_capacity(cluster.manifests.len());
        for manifest in &cluster.manifests {
            writes.push(atomic_write(
                &output_dir.join(&manifest.path),
                &manifest.content,
                dry_run,
            )?);
        }
        results.push(GenerateClusterResult {
            cluster: cluster.cluster.clone(),
            writes,
        });
    }
    Ok(results)
}

/// Concatenate every manifest into one multi-document YAML stream.
pub fn to_stream(rendered: &[ClusterManifests]) -> String {
    let mut out = String::new();
    for manifest in rendered.iter().flat_map(|c| c.manifests.iter()) {
        out.push_str("---\n");
        out.push_str(&format!("# Source: {}\n", manifest.path.display()));
        out.push_str(&manifest.content);
        if !manifest.content.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}
