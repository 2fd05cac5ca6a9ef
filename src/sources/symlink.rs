//! Symlink fixtures.
//!
//! A relative target is kept relative, so it resolves against the link's
//! own directory. Windows gets a directory junction instead of a symlink,
//! since creating symlinks there usually needs elevated privileges.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::core::SymlinkEntry;
use crate::util::fs::{ensure_dir, is_symlink, remove_link};

/// Creates and removes symlink fixtures.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymlinkManager;

impl SymlinkManager {
    pub fn new() -> Self {
        SymlinkManager
    }

    /// Create `entry.link` pointing at `entry.target`.
    ///
    /// Does nothing when the link already exists, whatever it points to.
    pub fn materialize(&self, entry: &SymlinkEntry) -> Result<()> {
        let link = entry.link.as_path();
        if is_symlink(link) {
            tracing::debug!("Symlink {} already exists", link.display());
            return Ok(());
        }

        if let Some(parent) = link.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }

        if link.is_dir() {
            bail!(
                "cannot create symlink {}: a directory is in the way",
                link.display()
            );
        }
        if link.exists() {
            fs::remove_file(link)
                .with_context(|| format!("failed to remove: {}", link.display()))?;
        }

        tracing::info!("Linking {}", entry);
        create_link(&entry.target, link)
            .with_context(|| format!("failed to create symlink {}", entry))
    }

    /// Remove `entry.link` only; the target is never touched.
    pub fn remove(&self, entry: &SymlinkEntry) -> Result<()> {
        tracing::debug!("Removing symlink {}", entry.link.display());
        remove_link(&entry.link)
    }
}

#[cfg(unix)]
fn create_link(target: &Path, link: &Path) -> Result<()> {
    crate::util::fs::symlink_dir(target, link)?;
    Ok(())
}

#[cfg(windows)]
fn create_link(target: &Path, link: &Path) -> Result<()> {
    use crate::util::process::ProcessBuilder;

    // Junctions need an absolute target.
    let target = match link.parent() {
        Some(parent) if target.is_relative() => parent.join(target),
        _ => target.to_path_buf(),
    };

    if crate::util::fs::symlink_dir(&target, link).is_ok() {
        return Ok(());
    }

    ProcessBuilder::new("cmd")
        .args(["/C", "mklink", "/J"])
        .arg(link)
        .arg(&target)
        .exec_and_check()?;
    Ok(())
}
