//! Atomic, hash-gated manifest writer.
//!
//! ## `atomic_write` protocol
//!
//! 1. Normalise line endings and SHA-256 hash the rendered content.
//! 2. Hash whatever is on disk at the target path, if anything.
//! 3. Skip when both digests match.
//! 4. Write to `<path>.kubecare.tmp`.
//! 5. Rename to the final path (atomic on POSIX).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{io_err, SyncError};

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped; the on-disk content already matches.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn is_change(&self) -> bool {
        !matches!(self, WriteResult::Unchanged { .. })
    }
}

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

pub(crate) fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}

/// Digest of the file at `path`, or `None` when it does not exist.
fn existing_digest(path: &Path) -> Result<Option<String>, SyncError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(sha256_hex(&bytes))),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_err(path, err)),
    }
}

// ---------------------------------------------------------------------------
// atomic_write
// ---------------------------------------------------------------------------

/// Atomically write a single rendered file unless its content is unchanged.
pub fn atomic_write(path: &Path, content: &str, dry_run: bool) -> Result<WriteResult, SyncError> {
    let tmp = PathBuf::from(format!("{}.kubecare.tmp", path.display()));
    atomic_write_with_tmp(path, content, dry_run, &tmp)
}

fn atomic_write_with_tmp(
    path: &Path,
    content: &str,
    dry_run: bool,
    tmp: &Path,
) -> Result<WriteResult, SyncError> {
    let normalized = normalize_line_endings(content);
    let content = normalized.as_str();

    let digest = sha256_hex(content.as_bytes());
    if existing_digest(path)?.as_deref() == Some(digest.as_str()) {
        tracing::debug!("unchanged: {}", path.display());
        return Ok(WriteResult::Unchanged {
            path: path.to_path_buf(),
        });
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
