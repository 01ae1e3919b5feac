//! Domain types for cluster configuration, addons, and resolved records.
//!
//! Input types mirror the YAML files users write: every field is optional at
//! parse time and defaults are decided during resolution. Output types
//! (`Resolved*`) carry no optionals and are what the renderer consumes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

/// String → string map used for settings and Helm parameters.
///
/// Ordered so that rendered parameters and substitution are deterministic.
pub type StringMap = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Directory name of a cluster under `<repo>/clusters/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterId(pub String);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ClusterId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ClusterId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Cluster configuration (input)
// ---------------------------------------------------------------------------

/// Cluster-wide defaults from the `cluster:` block of `cluster.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    #[serde(default)]
    pub name: String,
    /// Kubernetes API server URL used as the Argo CD destination.
    #[serde(default)]
    pub server: String,
    pub repo_url: Option<String>,
    pub cascade_delete: Option<bool>,
    pub auto_sync: Option<bool>,
    #[serde(default)]
    pub settings: StringMap,
}

/// One `clusters/<id>/cluster.yaml` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    #[serde(default)]
    pub cluster: ClusterSpec,
    #[serde(default)]
    pub kustomize_applications: Vec<KustomizeApplicationSpec>,
    #[serde(default)]
    pub helm_applications: Vec<HelmApplicationSpec>,
}

/// A Kustomize-backed application as declared by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KustomizeApplicationSpec {
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub path: Option<String>,
    pub repo_url: Option<String>,
    pub target_revision: Option<String>,
    pub cascade_delete: Option<bool>,
    pub auto_sync: Option<bool>,
}

/// A Helm-backed application as declared by the user (or by an include file).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmApplicationSpec {
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub path: Option<String>,
    pub repo_url: Option<String>,
    pub target_revision: Option<String>,
    pub cascade_delete: Option<bool>,
    pub auto_sync: Option<bool>,
    /// Identifier of the addon supplying defaults.
    pub addon: Option<String>,
    /// Path of a file, relative to the cluster directory, layered over this spec.
    pub include: Option<String>,
    pub release_name: Option<String>,
    pub oauth2_proxy_ingress_host: Option<String>,
    #[serde(default)]
    pub values: Mapping,
    pub value_files: Option<Vec<String>>,
    #[serde(default)]
    pub settings: StringMap,
    #[serde(default)]
    pub parameters: StringMap,
    /// Overlay names requested from the addon catalog, applied in order.
    pub overlays: Option<Vec<String>>,
}

impl HelmApplicationSpec {
    /// A human-readable label for error messages, before the name is resolved.
    pub fn label(&self, index: usize) -> String {
        self.name
            .as_deref()
            .or(self.addon.as_deref())
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("helmApplications[{index}]"))
    }
}

// ---------------------------------------------------------------------------
// Addon definition (input)
// ---------------------------------------------------------------------------

/// Defaults for a named Helm addon, loaded from `addons/<id>.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonDefinition {
    pub name: Option<String>,
    pub repo_url: Option<String>,
    pub path: Option<String>,
    pub namespace: Option<String>,
    pub release_name: Option<String>,
    pub target_revision: Option<String>,
    pub oauth2_proxy_ingress_host: Option<String>,
    #[serde(default)]
    pub values: Mapping,
    #[serde(default)]
    pub value_files: Vec<String>,
    #[serde(default)]
    pub settings: StringMap,
    #[serde(default)]
    pub parameters: StringMap,
    /// Catalog of optional value fragments, keyed by overlay name.
    #[serde(default)]
    pub overlay_definitions: BTreeMap<String, Mapping>,
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Process-wide, read-only facts about where the tool runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentContext {
    /// Directory of the tool itself; holds the bundled `addons/`.
    pub base_path: PathBuf,
    /// Root of the repository holding `clusters/` and `addons/`.
    pub repo_path: PathBuf,
    /// Git remote URL of the repository, empty when unknown.
    pub repo_url: String,
}

// ---------------------------------------------------------------------------
// Resolved records (output)
// ---------------------------------------------------------------------------

/// Which Argo CD source type an application renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationKind {
    Kustomize,
    Helm,
}

impl fmt::Display for ApplicationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationKind::Kustomize => write!(f, "kustomize"),
            ApplicationKind::Helm => write!(f, "helm"),
        }
    }
}

/// A fully-determined application, ready for templating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedApplication {
    pub kind: ApplicationKind,
    pub name: String,
    /// Argo CD project; always the cluster name.
    pub project: String,
    pub namespace: String,
    pub server: String,
    pub repo_url: String,
    pub path: String,
    pub target_revision: String,
    pub cascade_delete: bool,
    pub auto_sync: bool,
    /// Empty for Kustomize applications.
    pub release_name: String,
    /// Serialized Helm values with settings substituted; empty when none.
    pub values: String,
    pub value_files: Vec<String>,
    pub parameters: StringMap,
    pub oauth2_proxy_ingress_host: String,
}

/// A role attached to a project. Reserved; projects are emitted without roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRole {
    pub name: String,
    pub policies: Vec<String>,
}

/// One Argo CD project per cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedProject {
    pub name: String,
    pub server: String,
    pub roles: Vec<ProjectRole>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_config_parses_camel_case_keys() {
        let yaml = r#"
cluster:
  name: prod
  server: https://kubernetes.default.svc
  repoUrl: git@example.com:infra.git
  cascadeDelete: true
  settings:
    domain: example.com
kustomizeApplications:
  - name: dashboards
    path: apps/dashboards
helmApplications:
  - addon: ingress-nginx
    valueFiles: [values-prod.yaml]
    overlays: [metrics]
    oauth2ProxyIngressHost: grafana.%SETTINGS_domain
"#;
        let cfg: ClusterConfig = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(cfg.cluster.name, "prod");
        assert_eq!(cfg.cluster.cascade_delete, Some(true));
        assert_eq!(cfg.cluster.auto_sync, None);
        assert_eq!(cfg.cluster.settings["domain"], "example.com");
        assert_eq!(cfg.kustomize_applications[0].path.as_deref(), Some("apps/dashboards"));
        let helm = &cfg.helm_applications[0];
        assert_eq!(helm.addon.as_deref(), Some("ingress-nginx"));
        assert_eq!(helm.overlays.as_deref(), Some(&["metrics".to_string()][..]));
        assert_eq!(
            helm.oauth2_proxy_ingress_host.as_deref(),
            Some("grafana.%SETTINGS_domain")
        );
        assert!(helm.values.is_empty());
    }

    #[test]
    fn empty_document_fields_default() {
        let cfg: ClusterConfig = serde_yaml::from_str("cluster: {}\n").expect("parse");
        assert!(cfg.kustomize_applications.is_empty());
        assert!(cfg.helm_applications.is_empty());
        assert_eq!(cfg.cluster.name, "");
    }

    #[test]
    fn helm_label_prefers_name_then_addon() {
        let mut spec = HelmApplicationSpec::default();
        assert_eq!(spec.label(3), "helmApplications[3]");
        spec.addon = Some("loki".into());
        assert_eq!(spec.label(3), "loki");
        spec.name = Some("logs".into());
        assert_eq!(spec.label(3), "logs");
    }

    #[test]
    fn application_kind_display() {
        assert_eq!(ApplicationKind::Helm.to_string(), "helm");
        assert_eq!(ClusterId::from("prod").to_string(), "prod");
    }
}
