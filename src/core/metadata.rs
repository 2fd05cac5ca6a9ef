//! Puppet module metadata (`metadata.json`).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::util::fs::read_to_string;

/// The subset of `metadata.json` we care about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    version: Option<String>,
}

impl Metadata {
    /// Load module metadata from a file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            bail!("no module metadata at {}", path.display());
        }

        let contents = read_to_string(path)?;
        Self::parse(&contents)
            .with_context(|| format!("failed to read module metadata at {}", path.display()))
    }

    /// Parse module metadata from JSON text.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// The full module name, e.g. `puppetlabs-stdlib`.
    pub fn name(&self) -> Result<&str> {
        match self.name.as_deref() {
            Some(n) if !n.is_empty() => Ok(n),
            _ => bail!("no module name found"),
        }
    }

    /// The module version.
    pub fn version(&self) -> Result<&str> {
        match self.version.as_deref() {
            Some(v) if !v.is_empty() => Ok(v),
            _ => bail!("no module version found"),
        }
    }
}

/// Identity of the module whose fixtures are being prepared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleIdentity {
    /// Short module name, used as the self-symlink name.
    pub name: String,

    /// Module source directory.
    pub path: PathBuf,
}

impl ModuleIdentity {
    /// Derive the identity of the module rooted at `source_dir`.
    ///
    /// A missing or malformed `metadata.json` is not fatal; the name then
    /// comes from the directory name instead.
    pub fn detect(source_dir: &Path) -> Self {
        let from_metadata = Metadata::load(&source_dir.join("metadata.json"))
            .and_then(|m| m.name().map(short_name));

        let name = match from_metadata {
            Ok(name) => name,
            Err(e) => {
                tracing::debug!("{:#}; using directory name", e);
                let dir_name = source_dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                short_name(&dir_name)
            }
        };

        ModuleIdentity {
            name,
            path: source_dir.to_path_buf(),
        }
    }
}

/// Strip the author prefix: `puppetlabs-stdlib` and `puppetlabs/stdlib` both
/// become `stdlib`.
pub fn short_name(full: &str) -> String {
    full.rsplit(['-', '/']).next().unwrap_or(full).to_string()
}
