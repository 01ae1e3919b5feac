//! Repository layout, cluster scanning, and YAML loading.
//!
//! # Repository layout
//!
//! ```text
//! <repo>/
//!   addons/
//!     <addon>.yaml            (repository-wide addon overrides)
//!   clusters/
//!     <cluster>/
//!       cluster.yaml          (one per cluster; directories without it are skipped)
//!       addons/
//!         <addon>.yaml        (per-cluster addon overrides)
//!       <include>.yaml        (optional include files referenced by apps)
//! <tool base>/
//!   addons/
//!     <addon>.yaml            (bundled addon defaults)
//! ```

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::{io_err, ResolveError};
use crate::types::{ClusterConfig, ClusterId};

pub const CLUSTERS_DIR: &str = "clusters";
pub const CLUSTER_FILE: &str = "cluster.yaml";
pub const ADDONS_DIR: &str = "addons";

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<repo>/clusters/<cluster>/`; pure, no I/O.
pub fn cluster_dir(repo: &Path, cluster: &ClusterId) -> PathBuf {
    repo.join(CLUSTERS_DIR).join(&cluster.0)
}

/// `<repo>/clusters/<cluster>/cluster.yaml`; pure, no I/O.
pub fn cluster_file(repo: &Path, cluster: &ClusterId) -> PathBuf {
    cluster_dir(repo, cluster).join(CLUSTER_FILE)
}

/// `<dir>/addons/<addon>.yaml`; pure, no I/O.
pub fn addon_file_in(dir: &Path, addon: &str) -> PathBuf {
    dir.join(ADDONS_DIR).join(format!("{addon}.yaml"))
}

// ---------------------------------------------------------------------------
// 2. Generic YAML loading
// ---------------------------------------------------------------------------

/// Read and parse a YAML file.
///
/// Returns `ResolveError::Io` if the file cannot be read and
/// `ResolveError::MalformedInput` (with path + line context) if it is not
/// valid YAML for `T`.
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ResolveError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    parse_yaml(path, &contents)
}

/// Parse YAML text that was read from `path`.
///
/// A whitespace-only document is treated as an empty mapping.
pub fn parse_yaml<T: DeserializeOwned>(path: &Path, contents: &str) -> Result<T, ResolveError> {
    let document = if contents.trim().is_empty() { "{}" } else { contents };
    serde_yaml::from_str(document).map_err(|e| ResolveError::MalformedInput {
        path: path.to_path_buf(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// 3. Cluster scanning
// ---------------------------------------------------------------------------

/// A cluster directory that contains a `cluster.yaml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterEntry {
    pub id: ClusterId,
    pub config_path: PathBuf,
}

/// List cluster directories under `<repo>/clusters/`, sorted by name.
///
/// Non-directories are ignored. Directories without a `cluster.yaml` are
/// skipped, not an error. A missing `clusters/` directory is an I/O error:
/// there is nothing to generate from.
pub fn scan_clusters(repo: &Path) -> Result<Vec<ClusterEntry>, ResolveError> {
    let dir = repo.join(CLUSTERS_DIR);
    let mut entries: Vec<_> = std::fs::read_dir(&dir)
        .map_err(|e| io_err(&dir, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut clusters = Vec::new();
    for entry in entries {
        let id = ClusterId::from(entry.file_name().to_string_lossy().into_owned());
        let config_path = entry.path().join(CLUSTER_FILE);
        tracing::info!("evaluating {}", config_path.display());
        if !config_path.is_file() {
            tracing::info!("no cluster file detected in {}, skipping directory", id);
            continue;
        }
        clusters.push(ClusterEntry { id, config_path });
    }
    Ok(clusters)
}

/// Load `clusters/<id>/cluster.yaml`.
pub fn load_cluster_config(entry: &ClusterEntry) -> Result<ClusterConfig, ResolveError> {
    read_yaml(&entry.config_path)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
