//! # kubecare-sync
//!
//! Whole-repository generation: resolve every cluster, render every manifest,
//! then write them with hash-gated atomic writes.
//!
//! Call [`generate`] to write manifests, [`diff_repository`] to compare the
//! rendered output against what is on disk, or [`render_repository`] and
//! [`to_stream`] to print everything as one YAML stream.

pub mod diff;
pub mod error;
pub mod pipeline;
pub mod writer;

pub use diff::{diff_repository, FileDiff};
pub use error::SyncError;
pub use pipeline::{
    default_output_dir, generate, render_repository, to_stream, write_all, ClusterManifests,
    GenerateClusterResult,
};
pub use writer::{atomic_write, WriteResult};
