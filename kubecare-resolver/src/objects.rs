//! The synthetic objects-generator application.
//!
//! Every cluster gets one extra Helm application that creates the namespaces
//! used by its other applications and the oauth2-proxy ingresses they ask for.

use serde::{Deserialize, Serialize};

use kubecare_core::{ApplicationKind, ResolvedApplication, ResolvedProject, StringMap};

pub const OBJECTS_GENERATOR_APP_NAME: &str = "kubecare-objects-generator";
pub const OBJECTS_GENERATOR_REPO_URL: &str =
    "https://github.com/kubecare/cluster-manager-objects-generator.git";
pub const OBJECTS_GENERATOR_PATH: &str = "chart";
pub const OBJECTS_GENERATOR_NAMESPACE: &str = "kube-system";

/// Namespaces the objects generator never creates.
pub const RESERVED_NAMESPACES: &[&str] = &["default", "kube-system"];

/// An ingress routed through oauth2-proxy for one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Oauth2ProxyIngress {
    pub name: String,
    pub namespace: String,
    pub host: String,
}

/// Input of the `objects-generator-values.yaml` template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectsGeneratorValues {
    pub namespaces: Vec<String>,
    pub oauth2_proxy_ingresses: Vec<Oauth2ProxyIngress>,
}

/// Fold a cluster's resolved applications into namespace and ingress lists.
///
/// Namespaces are distinct, in first-seen order, and exclude the reserved
/// ones. Ingresses come from every application with a non-empty ingress host.
pub fn collect<'a>(apps: impl IntoIterator<Item = &'a ResolvedApplication>) -> ObjectsGeneratorValues {
    apps.into_iter()
        .fold(ObjectsGeneratorValues::default(), |mut acc, app| {
            let ns = app.namespace.as_str();
            if !RESERVED_NAMESPACES.contains(&ns) && !acc.namespaces.iter().any(|n| n == ns) {
                acc.namespaces.push(ns.to_owned());
            }
            if !app.oauth2_proxy_ingress_host.is_empty() {
                acc.oauth2_proxy_ingresses.push(Oauth2ProxyIngress {
                    name: app.name.clone(),
                    namespace: app.namespace.clone(),
                    host: app.oauth2_proxy_ingress_host.clone(),
                });
            }
            acc
        })
}

/// The generator application for `project`, carrying pre-rendered `values`.
pub fn generator_application(project: &ResolvedProject, values: String) -> ResolvedApplication {
    ResolvedApplication {
        kind: ApplicationKind::Helm,
        name: OBJECTS_GENERATOR_APP_NAME.to_owned(),
        project: project.name.clone(),
        namespace: OBJECTS_GENERATOR_NAMESPACE.to_owned(),
        server: project.server.clone(),
        repo_url: OBJECTS_GENERATOR_REPO_URL.to_owned(),
        path: OBJECTS_GENERATOR_PATH.to_owned(),
        target_revision: String::new(),
        cascade_delete: true,
        auto_sync: true,
        release_name: OBJECTS_GENERATOR_APP_NAME.to_owned(),
        values,
        value_files: Vec::new(),
        parameters: StringMap::new(),
        oauth2_proxy_ingress_host: String::new(),
    }
}
