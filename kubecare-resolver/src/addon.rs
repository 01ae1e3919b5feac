//! Addon source selection.
//!
//! | Precedence | Location                                  |
//! |------------|-------------------------------------------|
//! | 1          | `<repo>/clusters/<cluster>/addons/<id>.yaml` |
//! | 2          | `<repo>/addons/<id>.yaml`                 |
//! | 3          | `<tool base>/addons/<id>.yaml`            |

use std::path::PathBuf;

use kubecare_core::{
    loader::{self, addon_file_in},
    AddonDefinition, ClusterId, EnvironmentContext, ResolveError,
};

/// Where an addon definition was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddonSource {
    Cluster,
    Repository,
    Bundled,
}

/// Candidate addon files in precedence order.
pub fn addon_candidates(
    env: &EnvironmentContext,
    addon: &str,
    cluster: &ClusterId,
) -> [(AddonSource, PathBuf); 3] {
    [
        (
            AddonSource::Cluster,
            addon_file_in(&loader::cluster_dir(&env.repo_path, cluster), addon),
        ),
        (AddonSource::Repository, addon_file_in(&env.repo_path, addon)),
        (AddonSource::Bundled, addon_file_in(&env.base_path, addon)),
    ]
}

/// Pick the first existing regular file among the candidates.
///
/// Returns `ResolveError::MissingAddonDefinition` naming the addon and every
/// searched path when none exists.
pub fn select_addon_file(
    env: &EnvironmentContext,
    addon: &str,
    cluster: &ClusterId,
) -> Result<(AddonSource, PathBuf), ResolveError> {
    let candidates = addon_candidates(env, addon, cluster);
    if let Some(found) = candidates.iter().find(|(_, path)| path.is_file()) {
        tracing::debug!("addon `{addon}` from {:?} source {}", found.0, found.1.display());
        return Ok(found.clone());
    }
    Err(ResolveError::MissingAddonDefinition {
        addon: addon.to_owned(),
        searched: candidates.into_iter().map(|(_, path)| path).collect(),
    })
}

/// Select and parse the definition for `addon`.
pub fn load_addon(
    env: &EnvironmentContext,
    addon: &str,
    cluster: &ClusterId,
) -> Result<AddonDefinition, ResolveError> {
    let (_, path) = select_addon_file(env, addon, cluster)?;
    loader::read_yaml(&path)
}
