//! Git backend - fixtures from git repositories.
//!
//! Clone, fetch and reset go through the `git` command line so that
//! per-fixture flags are passed straight through. Read-only queries of the
//! local working copy (origin URL, shallowness) use libgit2.

use std::path::Path;

use anyhow::{Context, Result};
use git2::Repository;

use crate::sources::Backend;
use crate::util::process::ProcessBuilder;

/// The remote compared for drift detection.
const ORIGIN: &str = "origin";

/// A backend driving the `git` executable.
#[derive(Debug, Clone, Default)]
pub struct GitBackend;

impl GitBackend {
    pub fn new() -> Self {
        GitBackend
    }

    // Workers have no terminal; fail instead of waiting for credentials.
    fn git(&self) -> ProcessBuilder {
        ProcessBuilder::new("git").env("GIT_TERMINAL_PROMPT", "0")
    }

    /// The recorded URL of the `origin` remote, if the working copy has one.
    pub fn remote_url(&self, target: &Path) -> Option<String> {
        let repo = Repository::open(target).ok()?;
        let remote = repo.find_remote(ORIGIN).ok()?;
        remote.url().map(str::to_string)
    }

    /// Check whether the working copy only holds truncated history.
    pub fn is_shallow(&self, target: &Path) -> bool {
        match Repository::open(target) {
            Ok(repo) => repo.is_shallow(),
            Err(_) => target.join(".git").join("shallow").is_file(),
        }
    }
}

impl Backend for GitBackend {
    fn name(&self) -> &str {
        "git"
    }

    fn clone_repo(
        &self,
        remote: &str,
        target: &Path,
        branch: Option<&str>,
        reference: Option<&str>,
        flags: &[String],
    ) -> Result<()> {
        let mut cmd = self.git().arg("clone");
        // A pinned ref may be anywhere in history
        if reference.is_none() {
            cmd = cmd.args(["--depth", "1"]);
        }
        if let Some(branch) = branch {
            cmd = cmd.args(["-b", branch]);
        }
        cmd = cmd.args(flags).arg(remote).arg(target);

        cmd.exec_and_check()
            .with_context(|| format!("failed to clone {} into {}", remote, target.display()))?;
        Ok(())
    }

    fn update(&self, target: &Path) -> Result<()> {
        let mut cmd = self.git().arg("fetch").cwd(target);
        if self.is_shallow(target) {
            cmd = cmd.arg("--unshallow");
        }

        cmd.exec_and_check()
            .with_context(|| format!("failed to update {}", target.display()))?;
        Ok(())
    }

    fn pin_to_revision(&self, target: &Path, reference: Option<&str>) -> Result<()> {
        let Some(reference) = reference else {
            return Ok(());
        };

        self.git()
            .args(["reset", "--hard", reference])
            .cwd(target)
            .exec_and_check()
            .with_context(|| format!("invalid ref {} for {}", reference, target.display()))?;
        Ok(())
    }

    fn remote_url_changed(&self, target: &Path, remote: &str) -> bool {
        self.remote_url(target).as_deref() != Some(remote)
    }
}
