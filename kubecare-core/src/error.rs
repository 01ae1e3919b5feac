//! Error types for kubecare-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading and resolving cluster configuration.
///
/// Every variant is fatal for the run: callers propagate it up to the binary,
/// which reports it and exits.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A fallback chain without a default ran out of candidates.
    #[error("missing required field `{field}`")]
    MissingRequiredField { field: String },

    /// No addon file at any of the candidate locations.
    #[error("unable to load Helm addon `{addon}`: no definition found (searched {})", display_paths(.searched))]
    MissingAddonDefinition { addon: String, searched: Vec<PathBuf> },

    /// YAML parse error; includes file path and line context from serde_yaml.
    #[error("failed to parse {path}: {source}")]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Read failure other than "does not exist" semantics handled by callers.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two applications of one cluster resolve to the same name, or one
    /// takes the objects generator's reserved name.
    #[error("application name `{application}` is used more than once in this cluster")]
    DuplicateApplication { application: String },

    /// An application name that cannot be used as a manifest file name.
    #[error("invalid application name `{name}`: {reason}")]
    InvalidApplicationName { name: String, reason: &'static str },

    /// Serializing a merged values structure back to YAML failed.
    #[error("failed to serialize values: {0}")]
    Serialize(#[source] serde_yaml::Error),

    /// Names the application whose resolution failed.
    #[error("application `{application}`: {source}")]
    Application {
        application: String,
        #[source]
        source: Box<ResolveError>,
    },

    /// Names the cluster whose resolution failed.
    #[error("cluster `{cluster}`: {source}")]
    Cluster {
        cluster: String,
        #[source]
        source: Box<ResolveError>,
    },
}

impl ResolveError {
    /// Convenience constructor for [`ResolveError::MissingRequiredField`].
    pub fn missing(field: impl Into<String>) -> Self {
        ResolveError::MissingRequiredField { field: field.into() }
    }

    /// Wrap `self` with the name of the application being resolved.
    pub fn in_application(self, application: impl Into<String>) -> Self {
        ResolveError::Application {
            application: application.into(),
            source: Box::new(self),
        }
    }

    /// Wrap `self` with the id of the cluster being resolved.
    pub fn in_cluster(self, cluster: impl Into<String>) -> Self {
        ResolveError::Cluster {
            cluster: cluster.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with application/cluster context stripped.
    pub fn root(&self) -> &ResolveError {
        match self {
            ResolveError::Application { source, .. } | ResolveError::Cluster { source, .. } => {
                source.root()
            }
            other => other,
        }
    }
}

/// Convenience constructor for [`ResolveError::Io`].
pub fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ResolveError {
    ResolveError::Io {
        path: path.into(),
        source,
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_addon_lists_every_candidate() {
        let err = ResolveError::MissingAddonDefinition {
            addon: "cert-manager".to_string(),
            searched: vec![PathBuf::from("/a/cert-manager.yaml"), PathBuf::from("/b/cert-manager.yaml")],
        };
        let msg = err.to_string();
        assert!(msg.contains("cert-manager"));
        assert!(msg.contains("/a/cert-manager.yaml, /b/cert-manager.yaml"));
    }

    #[test]
    fn context_wrappers_name_cluster_and_application() {
        let err = ResolveError::missing("name")
            .in_application("web")
            .in_cluster("prod");
        assert_eq!(
            err.to_string(),
            "cluster `prod`: application `web`: missing required field `name`"
        );
        assert!(matches!(err.root(), ResolveError::MissingRequiredField { field } if field == "name"));
    }

    #[test]
    fn duplicate_application_names_the_cluster() {
        let err = ResolveError::DuplicateApplication { application: "web".into() }.in_cluster("prod");
        assert_eq!(
            err.to_string(),
            "cluster `prod`: application name `web` is used more than once in this cluster"
        );
    }
}
