//! Tera rendering engine: [`ManifestKind`], [`TemplateEngine`] and [`Renderer`].
//!
//! # Output layout
//!
//! Paths are relative to the output directory.
//!
//! | Manifest                | Output path                              |
//! |-------------------------|------------------------------------------|
//! | Kustomize application   | `<cluster>/applications/<name>.yaml`     |
//! | Helm application        | `<cluster>/applications/<name>.yaml`     |
//! | Project                 | `<cluster>/project.yaml`                 |
//!
//! The objects-generator values are rendered in memory and embedded into the
//! generator application; they have no file of their own.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tera::Tera;
use tracing::debug;

use kubecare_core::{ApplicationKind, ClusterId, ResolvedApplication, ResolvedProject};
use kubecare_resolver::{objects, ObjectsGeneratorValues, ResolvedCluster};

use crate::context::{ApplicationCtx, ObjectsGeneratorCtx, ProjectCtx};
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates, baked into the binary via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("shared/_sync_policy.tera", include_str!("templates/_partials/sync_policy.tera")),
    ("app-kustomize.yaml.tera", include_str!("templates/app-kustomize.yaml.tera")),
    ("app-helm.yaml.tera", include_str!("templates/app-helm.yaml.tera")),
    ("project.yaml.tera", include_str!("templates/project.yaml.tera")),
    (
        "objects-generator-values.yaml.tera",
        include_str!("templates/objects-generator-values.yaml.tera"),
    ),
];

// ---------------------------------------------------------------------------
// Template overrides
// ---------------------------------------------------------------------------

/// Files in `dir` named like an embedded template. Any other file is ignored.
fn load_overrides(dir: &Path) -> Result<Vec<(&'static str, String)>, RenderError> {
    let mut overrides = Vec::new();
    for (name, _) in TPLS {
        let path = dir.join(name);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                debug!(template = *name, path = %path.display(), "using template override");
                overrides.push((*name, content));
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(source) => return Err(RenderError::Io { path, source }),
        }
    }
    Ok(overrides)
}

fn build_tera(override_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: BTreeMap<&str, String> = TPLS
        .iter()
        .map(|(name, content)| (*name, (*content).to_string()))
        .collect();
    if let Some(dir) = override_dir {
        templates.extend(load_overrides(dir)?);
    }

    let mut tera = Tera::default();
    tera.add_raw_templates(templates)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// ManifestKind
// ---------------------------------------------------------------------------

/// Every template the renderer knows how to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    KustomizeApplication,
    HelmApplication,
    Project,
    ObjectsGeneratorValues,
}

impl ManifestKind {
    pub fn template_name(&self) -> &'static str {
        match self {
            ManifestKind::KustomizeApplication   => "app-kustomize.yaml.tera",
            ManifestKind::HelmApplication        => "app-helm.yaml.tera",
            ManifestKind::Project                => "project.yaml.tera",
            ManifestKind::ObjectsGeneratorValues => "objects-generator-values.yaml.tera",
        }
    }

    pub fn for_application(kind: ApplicationKind) -> Self {
        match kind {
            ApplicationKind::Kustomize => ManifestKind::KustomizeApplication,
            ApplicationKind::Helm => ManifestKind::HelmApplication,
        }
    }
}

/// Relative output path of an application manifest.
pub fn application_path(cluster: &ClusterId, app_name: &str) -> PathBuf {
    PathBuf::from(&cluster.0)
        .join("applications")
        .join(format!("{app_name}.yaml"))
}

/// Relative output path of a cluster's project manifest.
pub fn project_path(cluster: &ClusterId) -> PathBuf {
    PathBuf::from(&cluster.0).join("project.yaml")
}

/// One rendered file, addressed relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub path: PathBuf,
    pub content: String,
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine with optional user overrides.
///
/// `override_dir` may hold files that replace the embedded defaults of the
/// same relative name, e.g. `app-helm.yaml.tera` or `shared/_sync_policy.tera`.
/// Other files there are ignored.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new(override_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(override_dir)?;
        Ok(TemplateEngine { tera })
    }

    pub fn render_application(&self, app: &ResolvedApplication) -> Result<String, RenderError> {
        let ctx = ApplicationCtx::from_application(app).to_tera_context()?;
        let name = ManifestKind::for_application(app.kind).template_name();
        Ok(self.tera.render(name, &ctx)?)
    }

    pub fn render_project(&self, project: &ResolvedProject) -> Result<String, RenderError> {
        let ctx = ProjectCtx::from_project(project).to_tera_context()?;
        Ok(self.tera.render(ManifestKind::Project.template_name(), &ctx)?)
    }

    pub fn render_objects_values(
        &self,
        values: &ObjectsGeneratorValues,
    ) -> Result<String, RenderError> {
        let ctx = ObjectsGeneratorCtx::from_values(values).to_tera_context()?;
        Ok(self
            .tera
            .render(ManifestKind::ObjectsGeneratorValues.template_name(), &ctx)?)
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Renders every manifest of a resolved cluster.
///
/// Create once with [`Renderer::new`] or [`Renderer::with_templates`] and reuse.
pub struct Renderer {
    engine: TemplateEngine,
}

impl Renderer {
    /// Embedded templates only.
    pub fn new() -> Result<Self, RenderError> {
        Ok(Renderer { engine: TemplateEngine::new(None)? })
    }

    /// Embedded templates overridden by any `.tera` files under `dir`.
    pub fn with_templates(dir: &Path) -> Result<Self, RenderError> {
        Ok(Renderer { engine: TemplateEngine::new(Some(dir))? })
    }

    pub fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    /// The cluster's objects-generator application with its values rendered.
    pub fn objects_generator(&self, cluster: &ResolvedCluster) -> Result<ResolvedApplication, RenderError> {
        let values = self.engine.render_objects_values(&cluster.objects)?;
        Ok(objects::generator_application(&cluster.project, values))
    }

    /// Project, Kustomize applications, Helm applications, then the objects
    /// generator, in that order.
    pub fn render_cluster(&self, cluster: &ResolvedCluster) -> Result<Vec<Manifest>, RenderError> {
        let generator = self.objects_generator(cluster)?;

        let mut manifests = Vec::with_capacity(cluster.applications().count() + 2);
        manifests.push(Manifest {
            path: project_path(&cluster.id),
            content: self.engine.render_project(&cluster.project)?,
        });
        for app in cluster.applications().chain(std::iter::once(&generator)) {
            manifests.push(Manifest {
                path: application_path(&cluster.id, &app.name),
                content: self.engine.render_application(app)?,
            });
        }
        debug!(cluster = %cluster.id, count = manifests.len(), "rendered cluster");
        Ok(manifests)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
