//! Per-invocation context for fixture operations.
//!
//! Provides centralized access to paths and tuning knobs. One context is
//! built per `prep`/`clean` run and threaded explicitly through the
//! normalizer and scheduler; there is no global state besides logging.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::config::Config;

/// Manifest filenames tried, in order, when no explicit path is given.
pub const MANIFEST_NAMES: [&str; 2] = [".fixtures.yml", ".fixtures.yaml"];

/// Context for one fixture invocation.
#[derive(Debug, Clone)]
pub struct FixturesContext {
    /// Root directory of the module under test
    source_dir: PathBuf,

    /// Explicit manifest path, if any
    manifest_path: Option<PathBuf>,

    /// Maximum number of concurrent download workers
    max_threads: usize,

    /// Whether to use verbose output
    verbose: bool,
}

impl FixturesContext {
    /// Create a context rooted at the current directory, configured from the
    /// environment.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_config(cwd, Config::from_env()))
    }

    /// Create a context rooted at `source_dir` with explicit configuration.
    pub fn with_config(source_dir: PathBuf, config: Config) -> Self {
        FixturesContext {
            source_dir,
            manifest_path: config.fixtures_yml,
            max_threads: config.max_threads.max(1),
            verbose: config.debug,
        }
    }

    /// Create a context rooted at `source_dir` with default configuration.
    pub fn with_source_dir(source_dir: PathBuf) -> Self {
        Self::with_config(source_dir, Config::default())
    }

    /// Override the manifest path.
    pub fn set_manifest_path(&mut self, path: PathBuf) {
        self.manifest_path = Some(path);
    }

    /// Override the worker-pool size.
    pub fn set_max_threads(&mut self, max_threads: usize) {
        self.max_threads = max_threads.max(1);
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Get the module source directory.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Get the directory fixtures are installed into by default
    /// (`spec/fixtures/modules`).
    pub fn module_target_dir(&self) -> PathBuf {
        self.source_dir.join("spec").join("fixtures").join("modules")
    }

    /// Get the worker-pool size limit.
    pub fn max_threads(&self) -> usize {
        self.max_threads
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Resolve a possibly relative path against the source directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.source_dir.join(path)
    }

    /// Locate the fixtures manifest.
    ///
    /// An explicit path is returned as-is (resolved against the source
    /// directory) even when it does not exist, so the loader can report it.
    /// Otherwise the conventional names are tried; `None` means no manifest.
    pub fn find_manifest(&self) -> Option<PathBuf> {
        if let Some(ref explicit) = self.manifest_path {
            return Some(self.resolve(explicit));
        }

        MANIFEST_NAMES
            .iter()
            .map(|name| self.source_dir.join(name))
            .find(|path| path.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_context_paths() {
        let ctx = FixturesContext::with_source_dir(PathBuf::from("/src/mymod"));
        assert_eq!(
            ctx.module_target_dir(),
            PathBuf::from("/src/mymod/spec/fixtures/modules")
        );
        assert_eq!(ctx.max_threads(), 10);
        assert!(!ctx.is_verbose());
    }

    #[test]
    fn test_find_manifest_search_order() {
        let tmp = TempDir::new().unwrap();
        let ctx = FixturesContext::with_source_dir(tmp.path().to_path_buf());
        assert_eq!(ctx.find_manifest(), None);

        std::fs::write(tmp.path().join(".fixtures.yaml"), "fixtures: {}\n").unwrap();
        assert_eq!(ctx.find_manifest(), Some(tmp.path().join(".fixtures.yaml")));

        std::fs::write(tmp.path().join(".fixtures.yml"), "fixtures: {}\n").unwrap();
        assert_eq!(ctx.find_manifest(), Some(tmp.path().join(".fixtures.yml")));
    }

    #[test]
    fn test_find_manifest_explicit() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(".fixtures.yml"), "fixtures: {}\n").unwrap();

        let mut ctx = FixturesContext::with_source_dir(tmp.path().to_path_buf());
        ctx.set_manifest_path(PathBuf::from("ci/other.yml"));
        assert_eq!(ctx.find_manifest(), Some(tmp.path().join("ci/other.yml")));
    }

    #[test]
    fn test_thread_limit_never_zero() {
        let mut ctx = FixturesContext::with_source_dir(PathBuf::from("."));
        ctx.set_max_threads(0);
        assert_eq!(ctx.max_threads(), 1);
    }
}
