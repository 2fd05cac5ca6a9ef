//! Filesystem utilities.

use std::fs;
use std::io;
use std::path::{Component, Path};

use anyhow::{bail, Context, Result};
use tempfile::TempDir;

/// Remove a directory and all its contents, if it exists.
///
/// A symlink at `path` is removed without touching what it points to.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to stat: {}", path.display()));
        }
    };

    if meta.is_dir() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    } else {
        remove_link(path)?;
    }
    Ok(())
}

/// Remove a file or link, ignoring a missing path.
pub fn remove_link(path: &Path) -> Result<()> {
    let result = fs::remove_file(path);

    // Directory junctions and directory symlinks need remove_dir on Windows.
    #[cfg(windows)]
    let result = result.or_else(|_| fs::remove_dir(path));

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("failed to remove: {}", path.display())),
    }
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))
}

/// Check whether `path` is itself a symlink (or junction).
pub fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// Replace `root` with the contents of `root/subdir`, discarding everything
/// else under `root`.
///
/// The subdirectory is first renamed into a staging directory next to
/// `root`. If putting it back fails, the staging directory is kept on disk
/// and the error names it.
pub fn hoist_subdir(root: &Path, subdir: &Path) -> Result<()> {
    if !subdir
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        bail!(
            "subdirectory {} must be a relative path inside {}",
            subdir.display(),
            root.display()
        );
    }

    let source = root.join(subdir);
    if !source.is_dir() {
        bail!(
            "subdirectory {} does not exist in {}",
            subdir.display(),
            root.display()
        );
    }

    let parent = root
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let staging = tempfile::Builder::new()
        .prefix(".fixture-subdir-")
        .tempdir_in(parent)
        .with_context(|| format!("failed to create staging directory in {}", parent.display()))?;
    let staged = staging.path().join("tree");

    fs::rename(&source, &staged).with_context(|| {
        format!(
            "failed to move {} to {}",
            source.display(),
            staged.display()
        )
    })?;

    replace_with_staged(staging, &staged, root)
}

/// Swap `root` for the tree at `staged`, which lives inside `staging`.
fn replace_with_staged(staging: TempDir, staged: &Path, root: &Path) -> Result<()> {
    let moved = remove_dir_all_if_exists(root).and_then(|()| {
        fs::rename(staged, root).with_context(|| {
            format!("failed to move {} to {}", staged.display(), root.display())
        })
    });

    if let Err(e) = moved {
        let kept = staging.keep();
        return Err(e.context(format!(
            "the fetched subdirectory was left in {}",
            kept.join("tree").display()
        )));
    }
    Ok(())
}

/// Create a directory symlink (platform-aware).
#[cfg(unix)]
pub fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
pub fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}
