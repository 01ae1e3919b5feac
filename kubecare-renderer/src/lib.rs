//! # kubecare-renderer
//!
//! Tera-based template engine that renders Argo CD `Application` and
//! `AppProject` manifests from resolved cluster records.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kubecare_renderer::Renderer;
//! use kubecare_resolver::ResolvedCluster;
//!
//! fn render_all(clusters: &[ResolvedCluster]) {
//!     if let Ok(renderer) = Renderer::new() {
//!         for cluster in clusters {
//!             if let Ok(manifests) = renderer.render_cluster(cluster) {
//!                 for manifest in manifests {
//!                     println!("{}: {} bytes", manifest.path.display(), manifest.content.len());
//!                 }
//!             }
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::{ApplicationCtx, ObjectsGeneratorCtx, ProjectCtx};
pub use engine::{application_path, project_path, Manifest, ManifestKind, Renderer, TemplateEngine};
pub use error::RenderError;
