//! Resolution of one whole cluster directory.

use std::collections::HashSet;

use kubecare_core::{
    loader::{self, ClusterEntry},
    ClusterConfig, ClusterId, EnvironmentContext, ResolveError, ResolvedApplication,
    ResolvedProject,
};

use crate::application::{resolve_helm, resolve_kustomize, resolve_project, ClusterScope};
use crate::objects::{self, ObjectsGeneratorValues};

/// Every resolved record of one cluster.
///
/// The objects-generator application is not included: its values are
/// rendered from [`ResolvedCluster::objects`] by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCluster {
    pub id: ClusterId,
    pub project: ResolvedProject,
    pub kustomize_applications: Vec<ResolvedApplication>,
    pub helm_applications: Vec<ResolvedApplication>,
    pub objects: ObjectsGeneratorValues,
}

impl ResolvedCluster {
    /// Kustomize then Helm applications, in declaration order.
    pub fn applications(&self) -> impl Iterator<Item = &ResolvedApplication> {
        self.kustomize_applications
            .iter()
            .chain(self.helm_applications.iter())
    }
}

/// Resolve an already-parsed cluster configuration.
///
/// Errors are wrapped with the failing application's label; the caller adds
/// the cluster context.
pub fn resolve_config(
    id: &ClusterId,
    config: &ClusterConfig,
    env: &EnvironmentContext,
) -> Result<ResolvedCluster, ResolveError> {
    let scope = ClusterScope { id, config, env };
    let project = resolve_project(scope)?;

    let kustomize_applications = config
        .kustomize_applications
        .iter()
        .enumerate()
        .map(|(i, app)| {
            resolve_kustomize(app, scope).map_err(|e| {
                let label = app
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("kustomizeApplications[{i}]"));
                e.in_application(label)
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let helm_applications = config
        .helm_applications
        .iter()
        .enumerate()
        .map(|(i, app)| resolve_helm(app, scope).map_err(|e| e.in_application(app.label(i))))
        .collect::<Result<Vec<_>, _>>()?;

    check_application_names(kustomize_applications.iter().chain(helm_applications.iter()))?;

    let objects = objects::collect(kustomize_applications.iter().chain(helm_applications.iter()));

    Ok(ResolvedCluster {
        id: id.clone(),
        project,
        kustomize_applications,
        helm_applications,
        objects,
    })
}

/// Why `name` cannot be a manifest file name, if it cannot.
fn invalid_name_reason(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name is a relative directory")
    } else if name.contains(['/', '\\', '\0']) {
        Some("name contains a path separator or NUL")
    } else {
        None
    }
}

/// Every application name must be a single path component and unique within
/// the cluster, the objects generator's name included.
fn check_application_names<'a>(
    apps: impl IntoIterator<Item = &'a ResolvedApplication>,
) -> Result<(), ResolveError> {
    let mut seen: HashSet<&str> = HashSet::from([objects::OBJECTS_GENERATOR_APP_NAME]);
    for app in apps {
        let name = app.name.as_str();
        if let Some(reason) = invalid_name_reason(name) {
            return Err(ResolveError::InvalidApplicationName {
                name: name.to_owned(),
                reason,
            });
        }
        if !seen.insert(name) {
            return Err(ResolveError::DuplicateApplication {
                application: name.to_owned(),
            });
        }
    }
    Ok(())
}

/// Load `cluster.yaml` for `entry` and resolve it.
pub fn resolve_cluster(
    entry: &ClusterEntry,
    env: &EnvironmentContext,
) -> Result<ResolvedCluster, ResolveError> {
    let config = loader::load_cluster_config(entry).map_err(|e| e.in_cluster(entry.id.0.clone()))?;
    resolve_config(&entry.id, &config, env).map_err(|e| e.in_cluster(entry.id.0.clone()))
}

/// Scan `<repo>/clusters` and resolve every cluster in directory order.
///
/// Fails fast on the first error.
pub fn resolve_all(env: &EnvironmentContext) -> Result<Vec<ResolvedCluster>, ResolveError> {
    loader::scan_clusters(&env.repo_path)?
        .iter()
        .map(|entry| resolve_cluster(entry, env))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn env() -> EnvironmentContext {
        EnvironmentContext {
            base_path: PathBuf::from("/nonexistent/base"),
            repo_path: PathBuf::from("/nonexistent/repo"),
            repo_url: String::new(),
        }
    }

    #[test]
    fn namespaces_collected_from_both_kinds() {
        let config: ClusterConfig = serde_yaml::from_str(
            r#"
cluster: {name: prod, server: "https://k8s"}
kustomizeApplications:
  - name: team-a-app
    namespace: team-a
helmApplications:
  - name: dns
    namespace: kube-system
"#,
        )
        .unwrap();
        let cluster = resolve_config(&ClusterId::from("prod"), &config, &env()).unwrap();
        assert_eq!(cluster.objects.namespaces, ["team-a"]);
        assert_eq!(cluster.applications().count(), 2);
    }

    fn resolve(yaml: &str) -> Result<ResolvedCluster, ResolveError> {
        let config: ClusterConfig = serde_yaml::from_str(yaml).unwrap();
        resolve_config(&ClusterId::from("prod"), &config, &env())
    }

    #[test]
    fn same_name_across_kinds_is_rejected() {
        let err = resolve(
            "cluster: {name: prod, server: s}\nkustomizeApplications:\n  - name: web\n    path: kust\nhelmApplications:\n  - name: web\n",
        )
        .unwrap_err();
        assert!(
            matches!(&err, ResolveError::DuplicateApplication { application } if application == "web"),
            "got: {err}"
        );
    }

    #[test]
    fn objects_generator_name_is_reserved() {
        let err = resolve(
            "cluster: {name: prod, server: s}\nhelmApplications:\n  - name: kubecare-objects-generator\n",
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::DuplicateApplication { .. }), "got: {err}");
    }

    #[test]
    fn names_that_leave_the_output_dir_are_rejected() {
        for name in ["../../../escaped", "a/b", "..", "a\\b"] {
            let yaml = format!(
                "cluster: {{name: prod, server: s}}\nkustomizeApplications:\n  - name: '{name}'\n"
            );
            let err = resolve(&yaml).unwrap_err();
            assert!(
                matches!(&err, ResolveError::InvalidApplicationName { name: n, .. } if n == name),
                "{name}: got {err}"
            );
        }
    }

    #[test]
    fn dotted_names_are_allowed() {
        resolve("cluster: {name: prod, server: s}\nhelmApplications:\n  - name: grafana.v2\n")
            .expect("dots inside a name are fine");
    }

    #[test]
    fn failing_application_is_named() {
        let config: ClusterConfig = serde_yaml::from_str(
            "cluster: {name: prod, server: s}\nhelmApplications:\n  - name: ok\n  - namespace: x\n",
        )
        .unwrap();
        let err = resolve_config(&ClusterId::from("prod"), &config, &env()).unwrap_err();
        assert!(
            matches!(&err, ResolveError::Application { application, .. } if application == "helmApplications[1]"),
            "got: {err}"
        );
    }
}
