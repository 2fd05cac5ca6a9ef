//! Installed host tool detection.

use anyhow::Result;

use crate::util::process::{find_executable, ProcessBuilder};

/// Host tool gems that provide Puppet, in lookup order. First match wins.
pub const HOST_TOOLS: [&str; 2] = ["openvox", "puppet"];

/// Looks up the installed version of a host tool package.
pub trait HostVersionLookup {
    /// Return the installed version of `name`, or `None` if not installed.
    fn installed_version(&self, name: &str) -> Result<Option<String>>;
}

/// Looks up installed gems through `gem list`.
#[derive(Debug, Clone, Default)]
pub struct GemLookup;

impl HostVersionLookup for GemLookup {
    fn installed_version(&self, name: &str) -> Result<Option<String>> {
        let Some(gem) = find_executable("gem") else {
            tracing::debug!("`gem` not found in PATH");
            return Ok(None);
        };

        let stdout = ProcessBuilder::new(gem)
            .args(["list", "--local", "--exact", name])
            .stdout_if_success()?;

        Ok(stdout.and_then(|out| parse_gem_list(&out, name)))
    }
}

/// Extract the newest version of `name` from `gem list` output such as
/// `puppet (8.4.0, default: 7.28.0)`.
pub fn parse_gem_list(output: &str, name: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let rest = line.trim().strip_prefix(name)?.trim_start();
        let versions = rest.strip_prefix('(')?.strip_suffix(')')?;
        versions
            .split(',')
            .map(|v| v.trim().trim_start_matches("default:").trim())
            .find(|v| !v.is_empty())
            .map(|v| v.split_whitespace().next().unwrap_or(v).to_string())
    })
}
