//! Unified diff between rendered manifests and the output directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use kubecare_core::EnvironmentContext;

use crate::error::{io_err, SyncError};
use crate::pipeline::render_repository;
use crate::writer::normalize_line_endings;

/// A single rendered file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// Path relative to the output directory.
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Render what `generate` would write and compare it to the files on disk.
///
/// No files are written. Files that would be created diff against empty
/// content; files on disk that nothing renders are not reported.
pub fn diff_repository(
    env: &EnvironmentContext,
    output_dir: &Path,
) -> Result<Vec<FileDiff>, SyncError> {
    let rendered = render_repository(env)?;

    let mut diffs = Vec::new();
    for manifest in rendered.iter().flat_map(|c| c.manifests.iter()) {
        let content = normalize_line_endings(&manifest.content);
        let existing = read_existing_or_empty(&output_dir.join(&manifest.path))?;
        if existing == content {
            continue;
        }

        let old_header = format!("a/{}", manifest.path.display());
        let new_header = format!("b/{}", manifest.path.display());
        let unified = TextDiff::from_lines(&existing, &content)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string();

        diffs.push(FileDiff {
            path: manifest.path.clone(),
            unified_diff: unified,
        });
    }
    Ok(diffs)
}

fn read_existing_or_empty(path: &Path) -> Result<String, SyncError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(normalize_line_endings(&content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::pipeline::generate;

    use super::*;

    fn setup() -> (TempDir, EnvironmentContext) {
        let repo = TempDir::new().expect("repo");
        let dir = repo.path().join("clusters").join("prod");
        fs::create_dir_all(&dir).expect("mkdir");
        fs::write(
            dir.join("cluster.yaml"),
            "cluster: {name: prod, server: \"https://k8s\"}\nkustomizeApplications:\n  - name: team-a\n    namespace: team-a\n    path: apps/team-a\n",
        )
        .expect("cluster.yaml");
        let env = EnvironmentContext {
            base_path: repo.path().join("base"),
            repo_path: repo.path().to_path_buf(),
            repo_url: "https://git.example.com/infra.git".into(),
        };
        (repo, env)
    }

    #[test]
    fn no_diffs_after_clean_generate() {
        let (repo, env) = setup();
        let out = repo.path().join("manifests");
        generate(&env, &out, false).expect("generate");

        let diffs = diff_repository(&env, &out).expect("diff");
        assert!(diffs.is_empty(), "generated repo should have no diff");
    }

    #[test]
    fn missing_output_diffs_every_file() {
        let (repo, env) = setup();
        let diffs = diff_repository(&env, &repo.path().join("manifests")).expect("diff");
        // project, team-a, objects generator
        assert_eq!(diffs.len(), 3);
        assert!(!repo.path().join("manifests").exists(), "diff must not write");
    }

    #[test]
    fn local_edit_produces_unified_diff() {
        let (repo, env) = setup();
        let out = repo.path().join("manifests");
        generate(&env, &out, false).expect("generate");

        let target = out.join("prod/applications/team-a.yaml");
        let edited = fs::read_to_string(&target)
            .expect("read")
            .replace("apps/team-a", "apps/hand-edited");
        fs::write(&target, edited).expect("write");

        let diffs = diff_repository(&env, &out).expect("diff");
        assert_eq!(diffs.len(), 1);
        let diff = &diffs[0];
        assert!(diff.unified_diff.contains("--- a/prod/applications/team-a.yaml"));
        assert!(diff.unified_diff.contains("+++ b/prod/applications/team-a.yaml"));
        assert!(diff.unified_diff.contains("-    path: apps/hand-edited"));
        assert!(diff.unified_diff.contains("+    path: apps/team-a"));
    }
}
