//! Mercurial backend.

use std::path::Path;

use anyhow::{Context, Result};

use crate::sources::Backend;
use crate::util::process::ProcessBuilder;

/// A backend driving the `hg` executable.
#[derive(Debug, Clone, Default)]
pub struct MercurialBackend;

impl MercurialBackend {
    pub fn new() -> Self {
        MercurialBackend
    }

    fn hg(&self) -> ProcessBuilder {
        ProcessBuilder::new("hg")
    }

    /// The command used to clone; exposed for inspection.
    pub fn clone_command(
        &self,
        remote: &str,
        target: &Path,
        branch: Option<&str>,
        flags: &[String],
    ) -> ProcessBuilder {
        let mut cmd = self.hg().arg("clone");
        if let Some(branch) = branch {
            cmd = cmd.args(["-b", branch]);
        }
        cmd.args(flags).arg(remote).arg(target)
    }
}

impl Backend for MercurialBackend {
    fn name(&self) -> &str {
        "hg"
    }

    // Mercurial has no shallow clones; the reference only matters for pinning.
    fn clone_repo(
        &self,
        remote: &str,
        target: &Path,
        branch: Option<&str>,
        _reference: Option<&str>,
        flags: &[String],
    ) -> Result<()> {
        self.clone_command(remote, target, branch, flags)
            .exec_and_check()
            .with_context(|| format!("failed to clone {} into {}", remote, target.display()))?;
        Ok(())
    }

    fn update(&self, target: &Path) -> Result<()> {
        self.hg()
            .arg("pull")
            .cwd(target)
            .exec_and_check()
            .with_context(|| format!("failed to update {}", target.display()))?;
        Ok(())
    }

    fn pin_to_revision(&self, target: &Path, reference: Option<&str>) -> Result<()> {
        let Some(reference) = reference else {
            return Ok(());
        };

        self.hg()
            .args(["update", "--clean", "-r", reference])
            .cwd(target)
            .exec_and_check()
            .with_context(|| format!("invalid ref {} for {}", reference, target.display()))?;
        Ok(())
    }

    // Drift detection is not implemented for Mercurial.
    fn remote_url_changed(&self, _target: &Path, _remote: &str) -> bool {
        false
    }
}
