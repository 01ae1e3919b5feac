//! kubecare core library: domain types, structural merge, loading, errors.
//!
//! - [`types`]: cluster, application, addon and resolved record types
//! - [`values`]: right-biased deep merge over `serde_yaml::Value`
//! - [`loader`]: repository layout, cluster scanning, YAML loading
//! - [`context`]: [`EnvironmentContext`] construction and git remote lookup
//! - [`error`]: [`ResolveError`]

pub mod context;
pub mod error;
pub mod loader;
pub mod types;
pub mod values;

pub use error::ResolveError;
pub use types::{
    AddonDefinition, ApplicationKind, ClusterConfig, ClusterId, ClusterSpec, EnvironmentContext,
    HelmApplicationSpec, KustomizeApplicationSpec, ProjectRole, ResolvedApplication,
    ResolvedProject, StringMap,
};
