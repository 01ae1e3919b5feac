//! Resolution of declared applications and projects into resolved records.

use serde_yaml::Mapping;

use kubecare_core::{
    loader,
    values::{concat_value_files, merge_mappings},
    AddonDefinition, ApplicationKind, ClusterConfig, ClusterId, EnvironmentContext,
    HelmApplicationSpec, KustomizeApplicationSpec, ResolveError, ResolvedApplication,
    ResolvedProject, StringMap,
};

use crate::addon;
use crate::fallback::{resolve_bool_with_default, resolve_string, resolve_string_with_default};
use crate::overlay::apply_overlays;
use crate::settings::{merge_settings, substitute};

pub const DEFAULT_NAMESPACE: &str = "default";

/// Everything an application needs from its surrounding cluster.
#[derive(Debug, Clone, Copy)]
pub struct ClusterScope<'a> {
    pub id: &'a ClusterId,
    pub config: &'a ClusterConfig,
    pub env: &'a EnvironmentContext,
}

impl ClusterScope<'_> {
    /// Argo CD project name: the declared cluster name, else the directory id.
    pub fn project_name(&self) -> Result<String, ResolveError> {
        resolve_string(
            "cluster.name",
            [Some(self.config.cluster.name.as_str()), Some(self.id.0.as_str())],
        )
    }

    /// Destination API server; required.
    pub fn server(&self) -> Result<String, ResolveError> {
        resolve_string("cluster.server", [Some(self.config.cluster.server.as_str())])
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// One project per cluster, with no roles.
pub fn resolve_project(scope: ClusterScope<'_>) -> Result<ResolvedProject, ResolveError> {
    Ok(ResolvedProject {
        name: scope.project_name()?,
        server: scope.server()?,
        roles: Vec::new(),
    })
}

// ---------------------------------------------------------------------------
// Kustomize
// ---------------------------------------------------------------------------

/// Resolve a Kustomize application. No addon and no value merging involved.
pub fn resolve_kustomize(
    app: &KustomizeApplicationSpec,
    scope: ClusterScope<'_>,
) -> Result<ResolvedApplication, ResolveError> {
    let cluster = &scope.config.cluster;

    let cascade_delete = resolve_bool_with_default(false, [app.cascade_delete, cluster.cascade_delete]);
    let auto_sync = resolve_bool_with_default(true, [app.auto_sync, cluster.auto_sync]);
    let repo_url = resolve_string_with_default(
        "",
        [
            app.repo_url.as_deref(),
            cluster.repo_url.as_deref(),
            Some(scope.env.repo_url.as_str()),
        ],
    );
    let name = resolve_string("name", [app.name.as_deref()])?;
    let namespace = resolve_string_with_default(
        DEFAULT_NAMESPACE,
        [app.namespace.as_deref(), app.name.as_deref()],
    );
    let target_revision = resolve_string_with_default("", [app.target_revision.as_deref()]);
    let path = resolve_string_with_default("", [app.path.as_deref()]);

    Ok(ResolvedApplication {
        kind: ApplicationKind::Kustomize,
        name,
        project: scope.project_name()?,
        namespace,
        server: scope.server()?,
        repo_url,
        path,
        target_revision,
        cascade_delete,
        auto_sync,
        release_name: String::new(),
        values: String::new(),
        value_files: Vec::new(),
        parameters: StringMap::new(),
        oauth2_proxy_ingress_host: String::new(),
    })
}

// ---------------------------------------------------------------------------
// Helm
// ---------------------------------------------------------------------------

/// Layer an include file over an inline spec.
///
/// Fields present in `include` replace inline ones. `values` are deep-merged
/// with the include on top; `settings` and `parameters` are merged key-wise
/// with the include winning; lists are replaced when the include declares them.
pub fn layer_include(inline: HelmApplicationSpec, include: HelmApplicationSpec) -> HelmApplicationSpec {
    HelmApplicationSpec {
        name: include.name.or(inline.name),
        namespace: include.namespace.or(inline.namespace),
        path: include.path.or(inline.path),
        repo_url: include.repo_url.or(inline.repo_url),
        target_revision: include.target_revision.or(inline.target_revision),
        cascade_delete: include.cascade_delete.or(inline.cascade_delete),
        auto_sync: include.auto_sync.or(inline.auto_sync),
        addon: include.addon.or(inline.addon),
        // The include has been consumed; includes do not chain.
        include: inline.include,
        release_name: include.release_name.or(inline.release_name),
        oauth2_proxy_ingress_host: include
            .oauth2_proxy_ingress_host
            .or(inline.oauth2_proxy_ingress_host),
        values: merge_mappings(inline.values, include.values),
        value_files: include.value_files.or(inline.value_files),
        settings: merge_settings([&inline.settings, &include.settings]),
        parameters: merge_settings([&inline.parameters, &include.parameters]),
        overlays: include.overlays.or(inline.overlays),
    }
}

/// Load `<repo>/clusters/<cluster>/<include>` when declared and layer it over `app`.
pub fn apply_include(
    app: &HelmApplicationSpec,
    scope: ClusterScope<'_>,
) -> Result<HelmApplicationSpec, ResolveError> {
    let Some(include) = app.include.as_deref().filter(|s| !s.is_empty()) else {
        return Ok(app.clone());
    };
    let path = loader::cluster_dir(&scope.env.repo_path, scope.id).join(include);
    tracing::debug!("including {}", path.display());
    let included: HelmApplicationSpec = loader::read_yaml(&path)?;
    Ok(layer_include(app.clone(), included))
}

/// Resolve a Helm application: include, addon, fallbacks, merges, overlays,
/// then settings substitution on the serialized values.
pub fn resolve_helm(
    app: &HelmApplicationSpec,
    scope: ClusterScope<'_>,
) -> Result<ResolvedApplication, ResolveError> {
    let app = apply_include(app, scope)?;

    let addon = match app.addon.as_deref().filter(|s| !s.is_empty()) {
        Some(id) => addon::load_addon(scope.env, id, scope.id)?,
        None => AddonDefinition::default(),
    };

    let cluster = &scope.config.cluster;

    let cascade_delete = resolve_bool_with_default(false, [app.cascade_delete, cluster.cascade_delete]);
    let auto_sync = resolve_bool_with_default(true, [app.auto_sync, cluster.auto_sync]);
    let repo_url = resolve_string_with_default(
        "",
        [
            app.repo_url.as_deref(),
            addon.repo_url.as_deref(),
            cluster.repo_url.as_deref(),
            Some(scope.env.repo_url.as_str()),
        ],
    );
    let name = resolve_string(
        "name",
        [app.name.as_deref(), addon.name.as_deref(), app.addon.as_deref()],
    )?;
    let release_name = resolve_string_with_default(
        &name,
        [
            app.release_name.as_deref(),
            addon.release_name.as_deref(),
            app.name.as_deref(),
            app.addon.as_deref(),
        ],
    );
    let namespace = resolve_string_with_default(
        DEFAULT_NAMESPACE,
        [app.namespace.as_deref(), addon.namespace.as_deref()],
    );
    let target_revision = resolve_string_with_default(
        "",
        [app.target_revision.as_deref(), addon.target_revision.as_deref()],
    );
    let ingress_host = resolve_string_with_default(
        "",
        [
            app.oauth2_proxy_ingress_host.as_deref(),
            addon.oauth2_proxy_ingress_host.as_deref(),
        ],
    );
    let path = resolve_string_with_default("", [app.path.as_deref(), addon.path.as_deref()]);

    let values = merge_mappings(addon.values.clone(), app.values.clone());
    let values = apply_overlays(
        values,
        &addon.overlay_definitions,
        app.overlays.as_deref().unwrap_or_default(),
    );

    let value_files = concat_value_files(app.value_files.as_deref().unwrap_or_default(), &addon.value_files);
    let settings = merge_settings([&addon.settings, &cluster.settings, &app.settings]);
    let parameters = merge_settings([&addon.parameters, &app.parameters]);

    let values = substitute(&serialize_values(&values)?, &settings);
    let oauth2_proxy_ingress_host = substitute(&ingress_host, &settings);

    Ok(ResolvedApplication {
        kind: ApplicationKind::Helm,
        name,
        project: scope.project_name()?,
        namespace,
        server: scope.server()?,
        repo_url,
        path,
        target_revision,
        cascade_delete,
        auto_sync,
        release_name,
        values,
        value_files,
        parameters,
        oauth2_proxy_ingress_host,
    })
}

/// YAML text for a values mapping; an empty mapping serializes to "".
pub fn serialize_values(values: &Mapping) -> Result<String, ResolveError> {
    if values.is_empty() {
        return Ok(String::new());
    }
    serde_yaml::to_string(values).map_err(ResolveError::Serialize)
}
