//! Template contexts: serializable view models built from resolved records.

use serde::{Deserialize, Serialize};

use kubecare_core::{ResolvedApplication, ResolvedProject, StringMap};
use kubecare_resolver::ObjectsGeneratorValues;

use crate::error::RenderError;

/// Column at which the `values: |` block scalar body starts in `app-helm.yaml`.
pub const VALUES_INDENT: usize = 8;

/// Rendering payload for both application templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationCtx {
    pub name: String,
    pub project: String,
    pub namespace: String,
    pub server: String,
    pub repo_url: String,
    pub path: String,
    pub target_revision: String,
    pub cascade_delete: bool,
    pub auto_sync: bool,
    pub release_name: String,
    /// Helm values, already indented for the block scalar. Empty when none.
    pub values: String,
    pub value_files: Vec<String>,
    pub parameters: StringMap,
}

impl ApplicationCtx {
    pub fn from_application(app: &ResolvedApplication) -> Self {
        ApplicationCtx {
            name: app.name.clone(),
            project: app.project.clone(),
            namespace: app.namespace.clone(),
            server: app.server.clone(),
            repo_url: app.repo_url.clone(),
            path: app.path.clone(),
            target_revision: app.target_revision.clone(),
            cascade_delete: app.cascade_delete,
            auto_sync: app.auto_sync,
            release_name: app.release_name.clone(),
            values: indent_block(&app.values, VALUES_INDENT),
            value_files: app.value_files.clone(),
            parameters: app.parameters.clone(),
        }
    }

    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCtx {
    pub name: String,
    pub policies: Vec<String>,
}

/// Rendering payload for `project.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCtx {
    pub name: String,
    pub server: String,
    pub roles: Vec<RoleCtx>,
}

impl ProjectCtx {
    pub fn from_project(project: &ResolvedProject) -> Self {
        ProjectCtx {
            name: project.name.clone(),
            server: project.server.clone(),
            roles: project
                .roles
                .iter()
                .map(|r| RoleCtx {
                    name: r.name.clone(),
                    policies: r.policies.clone(),
                })
                .collect(),
        }
    }

    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngressCtx {
    pub name: String,
    pub namespace: String,
    pub host: String,
}

/// Rendering payload for `objects-generator-values.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectsGeneratorCtx {
    pub namespaces: Vec<String>,
    pub oauth2_proxy_ingresses: Vec<IngressCtx>,
}

impl ObjectsGeneratorCtx {
    pub fn from_values(values: &ObjectsGeneratorValues) -> Self {
        ObjectsGeneratorCtx {
            namespaces: values.namespaces.clone(),
            oauth2_proxy_ingresses: values
                .oauth2_proxy_ingresses
                .iter()
                .map(|i| IngressCtx {
                    name: i.name.clone(),
                    namespace: i.namespace.clone(),
                    host: i.host.clone(),
                })
                .collect(),
        }
    }

    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

/// Prefix every non-blank line of `text` with `width` spaces.
///
/// Trailing newlines are dropped; the template supplies its own line breaks.
pub fn indent_block(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.trim_end_matches('\n')
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubecare_core::{ApplicationKind, ProjectRole};
    use kubecare_resolver::Oauth2ProxyIngress;

    fn helm_app() -> ResolvedApplication {
        ResolvedApplication {
            kind: ApplicationKind::Helm,
            name: "grafana".into(),
            project: "prod".into(),
            namespace: "monitoring".into(),
            server: "https://k8s".into(),
            repo_url: "https://charts".into(),
            path: "grafana".into(),
            target_revision: "7.3.0".into(),
            cascade_delete: false,
            auto_sync: true,
            release_name: "grafana".into(),
            values: "replicas: 3\ningress:\n  enabled: true\n".into(),
            value_files: vec!["prod.yaml".into()],
            parameters: StringMap::new(),
            oauth2_proxy_ingress_host: "grafana.example.com".into(),
        }
    }

    #[test]
    fn values_are_indented_for_block_scalar() {
        let ctx = ApplicationCtx::from_application(&helm_app());
        assert_eq!(
            ctx.values,
            "        replicas: 3\n        ingress:\n          enabled: true"
        );
    }

    #[test]
    fn empty_values_stay_empty() {
        let mut app = helm_app();
        app.values = String::new();
        assert_eq!(ApplicationCtx::from_application(&app).values, "");
    }

    #[test]
    fn blank_lines_carry_no_padding() {
        assert_eq!(indent_block("a: 1\n\nb: 2\n", 2), "  a: 1\n\n  b: 2");
    }

    #[test]
    fn project_roles_carried_over() {
        let project = ResolvedProject {
            name: "prod".into(),
            server: "https://k8s".into(),
            roles: vec![ProjectRole {
                name: "ci".into(),
                policies: vec!["p, proj:prod:ci, applications, sync, prod/*, allow".into()],
            }],
        };
        let ctx = ProjectCtx::from_project(&project);
        assert_eq!(ctx.roles.len(), 1);
        assert_eq!(ctx.roles[0].name, "ci");
        ctx.to_tera_context().expect("context conversion");
    }

    #[test]
    fn objects_ctx_mirrors_values() {
        let values = ObjectsGeneratorValues {
            namespaces: vec!["team-a".into()],
            oauth2_proxy_ingresses: vec![Oauth2ProxyIngress {
                name: "grafana".into(),
                namespace: "monitoring".into(),
                host: "grafana.example.com".into(),
            }],
        };
        let ctx = ObjectsGeneratorCtx::from_values(&values);
        assert_eq!(ctx.namespaces, ["team-a"]);
        assert_eq!(ctx.oauth2_proxy_ingresses[0].host, "grafana.example.com");
    }
}
