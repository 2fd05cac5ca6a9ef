//! Host tool version compatibility.
//!
//! Manifest entries may carry a `puppet_version` range; an entry is only
//! kept when the installed Puppet (or OpenVox) version lies in that range.
//! The installed version is looked up lazily, the first time a range is
//! actually evaluated, and cached for the rest of the invocation.

pub mod host;
pub mod version;

use std::cell::OnceCell;

use semver::Version;

use crate::core::FixtureError;

pub use host::{GemLookup, HostVersionLookup, HOST_TOOLS};
pub use version::{parse_version_lenient, VersionRange};

/// Decides whether an entry with a `puppet_version` range is included.
pub trait VersionFilter {
    fn includes(&self, range: &str) -> Result<bool, FixtureError>;
}

/// Filter that accepts every range without consulting the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyVersion;

impl VersionFilter for AnyVersion {
    fn includes(&self, _range: &str) -> Result<bool, FixtureError> {
        Ok(true)
    }
}

/// Filter against the installed Puppet version.
pub struct PuppetVersionFilter<L> {
    lookup: L,
    installed: OnceCell<Version>,
}

impl<L: HostVersionLookup> PuppetVersionFilter<L> {
    pub fn new(lookup: L) -> Self {
        PuppetVersionFilter {
            lookup,
            installed: OnceCell::new(),
        }
    }

    /// The installed host tool version, looked up on first use.
    pub fn installed_version(&self) -> Result<&Version, FixtureError> {
        if let Some(version) = self.installed.get() {
            return Ok(version);
        }

        let version = self.detect()?;
        Ok(self.installed.get_or_init(|| version))
    }

    fn detect(&self) -> Result<Version, FixtureError> {
        for tool in HOST_TOOLS {
            match self.lookup.installed_version(tool) {
                Ok(Some(raw)) => match parse_version_lenient(&raw) {
                    Some(version) => {
                        tracing::debug!("Found {} {}", tool, version);
                        return Ok(version);
                    }
                    None => tracing::warn!("Ignoring unparsable {} version `{}`", tool, raw),
                },
                Ok(None) => {}
                Err(e) => tracing::debug!("Failed to look up {}: {:#}", tool, e),
            }
        }

        Err(FixtureError::HostToolMissing {
            tried: HOST_TOOLS.iter().map(|t| t.to_string()).collect(),
        })
    }
}

impl<L: HostVersionLookup> VersionFilter for PuppetVersionFilter<L> {
    fn includes(&self, range: &str) -> Result<bool, FixtureError> {
        let parsed = VersionRange::parse(range).map_err(|message| {
            FixtureError::InvalidVersionRange {
                range: range.to_string(),
                message,
            }
        })?;
        let installed = self.installed_version()?;
        Ok(parsed.includes(installed))
    }
}
