//! # kubecare-resolver
//!
//! The configuration resolution engine: turns cluster declarations, addon
//! definitions and include files into fully-resolved application and project
//! records. Pure apart from reading the YAML files it is pointed at.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kubecare_core::EnvironmentContext;
//! use kubecare_resolver::resolve_all;
//!
//! fn print_all(env: &EnvironmentContext) {
//!     if let Ok(clusters) = resolve_all(env) {
//!         for cluster in clusters {
//!             for app in cluster.applications() {
//!                 println!("{}/{} -> {}", cluster.id, app.name, app.namespace);
//!             }
//!         }
//!     }
//! }
//! ```

pub mod addon;
pub mod application;
pub mod cluster;
pub mod fallback;
pub mod objects;
pub mod overlay;
pub mod settings;

pub use application::{resolve_helm, resolve_kustomize, resolve_project, ClusterScope};
pub use cluster::{resolve_all, resolve_cluster, resolve_config, ResolvedCluster};
pub use objects::{ObjectsGeneratorValues, Oauth2ProxyIngress};
