//! Forge modules - fixtures installed by `puppet module install`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::{FetchSpec, Metadata};
use crate::util::process::ProcessBuilder;

/// What a forge install ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The requested module was already present
    UpToDate,
    /// The installer ran
    Installed,
}

/// Installs forge modules through the Puppet module tool.
#[derive(Debug, Clone)]
pub struct ForgeInstaller {
    program: PathBuf,
}

impl Default for ForgeInstaller {
    fn default() -> Self {
        ForgeInstaller {
            program: PathBuf::from("puppet"),
        }
    }
}

impl ForgeInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different `puppet` executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        ForgeInstaller {
            program: program.into(),
        }
    }

    /// The directory modules are installed into: the parent of the
    /// fixture's target.
    pub fn install_root(spec: &FetchSpec) -> &Path {
        spec.target.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Check whether `spec.target` already holds the requested module.
    pub fn is_up_to_date(&self, spec: &FetchSpec) -> bool {
        let target = spec.target.as_path();
        if !target.is_dir() {
            return false;
        }

        let Some(wanted) = spec.pinned_ref() else {
            tracing::debug!("Module {} already up to date", target.display());
            return true;
        };

        match Metadata::load(&target.join("metadata.json")).and_then(|m| m.version().map(str::to_string)) {
            Ok(version) if version == wanted => {
                tracing::debug!("Module {} already up to date ({})", target.display(), wanted);
                true
            }
            Ok(version) => {
                tracing::debug!(
                    "Module {} version {} != {}; updating",
                    target.display(),
                    version,
                    wanted
                );
                false
            }
            Err(_) => {
                tracing::warn!(
                    "Unable to detect module version for {}; updating",
                    target.display()
                );
                false
            }
        }
    }

    /// Build the install command for `spec`.
    pub fn install_command(&self, spec: &FetchSpec) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.program).args(["module", "install"]);
        if let Some(version) = spec.pinned_ref() {
            cmd = cmd.args(["--version", version]);
        }
        cmd.args(&spec.flags)
            .args(["--ignore-dependencies", "--force", "--target-dir"])
            .arg(Self::install_root(spec))
            .arg(&spec.remote)
    }

    /// Install the module unless it is already present.
    pub fn install(&self, spec: &FetchSpec) -> Result<InstallOutcome> {
        if self.is_up_to_date(spec) {
            return Ok(InstallOutcome::UpToDate);
        }

        let root = Self::install_root(spec);
        tracing::info!("Installing {} into {}", spec.remote, root.display());

        self.install_command(spec).exec_and_check().with_context(|| {
            format!(
                "failed to install module {} to {}",
                spec.remote,
                root.display()
            )
        })?;
        Ok(InstallOutcome::Installed)
    }
}
