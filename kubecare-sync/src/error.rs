//! Error types for kubecare-sync.

use std::path::PathBuf;

use thiserror::Error;

use kubecare_core::ResolveError;
use kubecare_renderer::RenderError;

/// All errors that can arise from a generate or diff run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A cluster failed to resolve.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
