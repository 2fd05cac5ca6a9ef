//! The `clean` operation: remove every fixture a manifest declares.
//!
//! What gets removed is derived from the manifest, never from whatever
//! happens to be on disk.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::Fixtures;
use crate::ops::normalize::load_fixtures;
use crate::sources::SymlinkManager;
use crate::util::fs::{is_symlink, remove_dir_all_if_exists};
use crate::util::FixturesContext;

/// Load the manifest for `ctx` and remove everything it declares.
pub fn clean(ctx: &FixturesContext) -> Result<Vec<PathBuf>> {
    let fixtures = load_fixtures(ctx)?;
    clean_fixtures(&fixtures)
}

/// Remove repository and forge module targets recursively, then the
/// symlinks themselves (never what they point to).
///
/// Returns the paths that existed and were removed.
pub fn clean_fixtures(fixtures: &Fixtures) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    let fetched = fixtures
        .repositories
        .values()
        .chain(fixtures.forge_modules.values());
    for spec in fetched {
        let target = &spec.target;
        if target.exists() || is_symlink(target) {
            tracing::debug!("Removing {}", target.display());
            remove_dir_all_if_exists(target)?;
            removed.push(target.clone());
        }
    }

    let symlinks = SymlinkManager::new();
    for entry in fixtures.symlinks.values() {
        if is_symlink(&entry.link) {
            symlinks.remove(entry)?;
            removed.push(entry.link.clone());
        }
    }

    Ok(removed)
}
