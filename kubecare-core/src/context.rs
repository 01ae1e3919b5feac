//! Construction of the process-wide [`EnvironmentContext`].

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{io_err, ResolveError};
use crate::types::EnvironmentContext;

/// Best-effort `git config --get remote.origin.url` inside `repo`.
///
/// Any failure (git missing, not a repository, no remote) yields an empty
/// string; the URL is only the last fallback for `repoUrl`.
pub fn git_remote_url(repo: &Path) -> String {
    match Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["config", "--get", "remote.origin.url"])
        .output()
    {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }
        Ok(output) => {
            tracing::debug!("git remote lookup exited with {}", output.status);
            String::new()
        }
        Err(e) => {
            tracing::debug!("git remote lookup failed: {e}");
            String::new()
        }
    }
}

/// Directory containing the running executable.
pub fn executable_dir() -> Result<PathBuf, ResolveError> {
    let exe = std::env::current_exe().map_err(|e| io_err("<current executable>", e))?;
    let exe = exe.canonicalize().map_err(|e| io_err(&exe, e))?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

impl EnvironmentContext {
    /// Build a context from explicit parts. `repo_url: None` triggers the git lookup.
    pub fn new(base_path: PathBuf, repo_path: PathBuf, repo_url: Option<String>) -> Self {
        let repo_url = repo_url.unwrap_or_else(|| git_remote_url(&repo_path));
        EnvironmentContext {
            base_path,
            repo_path,
            repo_url,
        }
    }

    /// Context for the current process: base = executable directory,
    /// repo = current working directory.
    pub fn detect() -> Result<Self, ResolveError> {
        let base = executable_dir()?;
        let repo = std::env::current_dir().map_err(|e| io_err(".", e))?;
        Ok(Self::new(base, repo, None))
    }
}
