//! Loader error-message and cluster-scanning integration tests.

use assert_fs::prelude::*;
use kubecare_core::{
    loader::{self, ClusterEntry},
    types::{AddonDefinition, ClusterId},
    ResolveError,
};
use predicates::prelude::predicate;

fn entry(repo: &assert_fs::TempDir, id: &str) -> ClusterEntry {
    let id = ClusterId::from(id);
    ClusterEntry {
        config_path: loader::cluster_file(repo.path(), &id),
        id,
    }
}

// ---------------------------------------------------------------------------
// 1. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn load_corrupt_cluster_yaml_returns_malformed_input_with_path() {
    let repo = assert_fs::TempDir::new().expect("tempdir");
    repo.child("clusters/prod/cluster.yaml")
        .write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = loader::load_cluster_config(&entry(&repo, "prod")).unwrap_err();
    assert!(matches!(err, ResolveError::MalformedInput { .. }), "got: {err}");
    let msg = err.to_string();
    assert!(msg.contains("cluster.yaml"), "must contain file path, got: {msg}");
}

#[test]
fn load_wrong_shape_returns_malformed_input() {
    let repo = assert_fs::TempDir::new().expect("tempdir");
    repo.child("clusters/prod/cluster.yaml")
        .write_str("- this is a list, not a mapping\n")
        .expect("write");

    let err = loader::load_cluster_config(&entry(&repo, "prod")).unwrap_err();
    assert!(matches!(err, ResolveError::MalformedInput { .. }), "got: {err}");
}

#[cfg(unix)]
#[test]
fn unreadable_file_is_io_error() {
    let repo = assert_fs::TempDir::new().expect("tempdir");
    // A directory where a file is expected cannot be read as text.
    repo.child("clusters/prod/cluster.yaml").create_dir_all().expect("mkdir");

    let err = loader::load_cluster_config(&entry(&repo, "prod")).unwrap_err();
    assert!(matches!(err, ResolveError::Io { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Full documents
// ---------------------------------------------------------------------------

#[test]
fn addon_definition_with_overlays_loads() {
    let repo = assert_fs::TempDir::new().expect("tempdir");
    let file = repo.child("addons/ingress-nginx.yaml");
    file.write_str(
        r#"
name: ingress-nginx
repoUrl: https://kubernetes.github.io/ingress-nginx
path: ingress-nginx
namespace: ingress
targetRevision: 4.10.0
values:
  controller:
    replicaCount: 2
valueFiles: [base.yaml]
settings:
  domain: example.com
overlayDefinitions:
  metrics:
    controller:
      metrics:
        enabled: true
"#,
    )
    .expect("write");

    let addon: AddonDefinition = loader::read_yaml(file.path()).expect("load");
    assert_eq!(addon.namespace.as_deref(), Some("ingress"));
    assert_eq!(addon.value_files, ["base.yaml"]);
    assert!(addon.overlay_definitions.contains_key("metrics"));
    assert_eq!(addon.settings["domain"], "example.com");
}

#[test]
fn scan_reports_only_clusters_with_config() {
    let repo = assert_fs::TempDir::new().expect("tempdir");
    repo.child("clusters/staging/cluster.yaml").write_str("cluster: {name: staging}\n").unwrap();
    repo.child("clusters/prod/cluster.yaml").write_str("cluster: {name: prod}\n").unwrap();
    repo.child("clusters/scratch/notes.txt").write_str("wip\n").unwrap();

    let clusters = loader::scan_clusters(repo.path()).expect("scan");
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].id, ClusterId::from("prod"));
    assert_eq!(clusters[1].id, ClusterId::from("staging"));
    repo.child("clusters/scratch/cluster.yaml").assert(predicate::path::missing());
}
