//! Repository backend trait - common interface for all source control systems.

use std::path::Path;

use anyhow::{bail, Result};

use crate::core::{FetchSpec, Scm};
use crate::sources::{GitBackend, MercurialBackend};
use crate::util::fs::{hoist_subdir, remove_dir_all_if_exists};

/// What a repository download ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Fresh clone into a missing target
    Cloned,
    /// Existing working copy updated in place
    Updated,
    /// Existing working copy pointed at another remote; removed and cloned
    Recloned,
}

/// A source control backend that can populate a working copy.
pub trait Backend: Send + Sync {
    /// Get the backend name for display.
    fn name(&self) -> &str;

    /// Clone `remote` into `target`.
    ///
    /// Clones shallowly unless an exact `reference` is pinned.
    fn clone_repo(
        &self,
        remote: &str,
        target: &Path,
        branch: Option<&str>,
        reference: Option<&str>,
        flags: &[String],
    ) -> Result<()>;

    /// Bring an existing working copy up to date with its remote.
    fn update(&self, target: &Path) -> Result<()>;

    /// Force the working copy to `reference`; a no-op without one.
    fn pin_to_revision(&self, target: &Path, reference: Option<&str>) -> Result<()>;

    /// Check whether the working copy at `target` tracks a remote other than
    /// `remote`.
    fn remote_url_changed(&self, target: &Path, remote: &str) -> bool;

    /// Clone or update `spec.target`, pin it, and hoist `spec.subdir`.
    fn download(&self, spec: &FetchSpec) -> Result<DownloadOutcome> {
        let target = spec.target.as_path();
        let mut outcome = DownloadOutcome::Cloned;
        let mut can_update = false;

        if target.is_dir() {
            if self.remote_url_changed(target, &spec.remote) {
                tracing::warn!(
                    "Remote for {} has changed, recloning repository",
                    target.display()
                );
                remove_dir_all_if_exists(target)?;
                outcome = DownloadOutcome::Recloned;
            } else {
                can_update = true;
            }
        }

        if can_update {
            tracing::info!("Updating {}", target.display());
            self.update(target)?;
            outcome = DownloadOutcome::Updated;
        } else {
            tracing::info!("Cloning {} into {}", spec.remote, target.display());
            self.clone_repo(
                &spec.remote,
                target,
                spec.branch.as_deref(),
                spec.pinned_ref(),
                &spec.flags,
            )?;
            if !target.exists() {
                bail!(
                    "failed to clone repository {} into {}",
                    spec.remote,
                    target.display()
                );
            }
        }

        self.pin_to_revision(target, spec.pinned_ref())?;

        if let Some(ref subdir) = spec.subdir {
            hoist_subdir(target, subdir)?;
        }

        Ok(outcome)
    }
}

/// Create the backend for a source control system.
pub fn backend_for(scm: Scm) -> Box<dyn Backend> {
    match scm {
        Scm::Git => Box::new(GitBackend::new()),
        Scm::Mercurial => Box::new(MercurialBackend::new()),
    }
}
