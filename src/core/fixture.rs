//! Normalized fixture records.
//!
//! These are produced once by the manifest normalizer and are read-only
//! afterwards. Each [`FetchSpec`] is consumed by exactly one download job.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::error::FixtureError;

/// Fixture category, as named under the `fixtures` key of the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Symlinks,
    ForgeModules,
    Repositories,
}

impl Category {
    /// All categories, in the order they are normalized and cleaned.
    pub const ALL: [Category; 3] = [
        Category::Symlinks,
        Category::ForgeModules,
        Category::Repositories,
    ];

    /// The manifest key for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Symlinks => "symlinks",
            Category::ForgeModules => "forge_modules",
            Category::Repositories => "repositories",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source control system used for a repository fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scm {
    #[default]
    Git,
    Mercurial,
}

impl Scm {
    /// The canonical manifest spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scm::Git => "git",
            Scm::Mercurial => "hg",
        }
    }
}

impl fmt::Display for Scm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "git" => Ok(Scm::Git),
            "hg" | "mercurial" => Ok(Scm::Mercurial),
            other => Err(other.to_string()),
        }
    }
}

/// One resolved unit of fetch work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSpec {
    /// Remote URL, or `namespace-name` coordinate for forge modules.
    pub remote: String,

    /// Directory the fixture is materialized into.
    pub target: PathBuf,

    /// Source control system. `None` for forge modules.
    pub scm: Option<Scm>,

    /// Exact revision or tag; a module version for forge modules.
    pub reference: Option<String>,

    /// Branch to start from when cloning.
    pub branch: Option<String>,

    /// Extra backend-specific command line arguments.
    pub flags: Vec<String>,

    /// Path inside the fetched tree to hoist up to `target`.
    pub subdir: Option<PathBuf>,
}

impl FetchSpec {
    /// Create a spec with everything but remote and target left unset.
    pub fn new(remote: impl Into<String>, target: impl Into<PathBuf>) -> Self {
        FetchSpec {
            remote: remote.into(),
            target: target.into(),
            scm: None,
            reference: None,
            branch: None,
            flags: Vec::new(),
            subdir: None,
        }
    }

    /// Set the source control system.
    pub fn with_scm(mut self, scm: Scm) -> Self {
        self.scm = Some(scm);
        self
    }

    /// Pin to a revision.
    pub fn with_ref(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Start from a branch.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Set the extra flags.
    pub fn with_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags = flags.into_iter().map(Into::into).collect();
        self
    }

    /// Hoist a subdirectory to the target.
    pub fn with_subdir(mut self, subdir: impl Into<PathBuf>) -> Self {
        self.subdir = Some(subdir.into());
        self
    }

    /// The pinned reference, treating an empty string as unset.
    pub fn pinned_ref(&self) -> Option<&str> {
        self.reference.as_deref().filter(|r| !r.is_empty())
    }
}

/// A symlink (or junction) to create: `link` resolves to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymlinkEntry {
    pub link: PathBuf,
    pub target: PathBuf,
}

impl SymlinkEntry {
    pub fn new(link: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        SymlinkEntry {
            link: link.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for SymlinkEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.link.display(), self.target.display())
    }
}

/// The normalized fixture set of one manifest.
///
/// Repositories and forge modules are keyed by their remote; two fixtures
/// resolving to the same remote collide and the later one wins. Symlinks are
/// keyed by fixture name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fixtures {
    pub repositories: BTreeMap<String, FetchSpec>,
    pub forge_modules: BTreeMap<String, FetchSpec>,
    pub symlinks: BTreeMap<String, SymlinkEntry>,
}

impl Fixtures {
    /// Create an empty fixture set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether nothing at all is declared.
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty() && self.forge_modules.is_empty() && self.symlinks.is_empty()
    }

    /// Number of jobs the download scheduler will queue.
    pub fn job_count(&self) -> usize {
        self.repositories.len() + self.forge_modules.len()
    }
}

/// Reject git refs that look like branch names.
pub fn validate_git_ref(reference: &str, target: &std::path::Path) -> Result<(), FixtureError> {
    if reference.contains('/') {
        return Err(FixtureError::InvalidRef {
            reference: reference.to_string(),
            target: target.to_path_buf(),
        });
    }
    Ok(())
}
