//! Environment configuration.
//!
//! The fixture tooling is configured from the environment of the test run:
//! - `FIXTURES_YML` - explicit path to the fixtures manifest
//! - `MAX_FIXTURE_THREAD_COUNT` - size of the download worker pool
//! - `ENABLE_LOGGER` - enable debug output
//!
//! Command line flags take precedence over these.

use std::path::PathBuf;

/// Environment variable naming an explicit manifest path.
pub const FIXTURES_YML_ENV: &str = "FIXTURES_YML";

/// Environment variable overriding the worker-pool size.
pub const MAX_THREADS_ENV: &str = "MAX_FIXTURE_THREAD_COUNT";

/// Environment variable enabling debug logging.
pub const ENABLE_LOGGER_ENV: &str = "ENABLE_LOGGER";

/// Default worker-pool size.
pub const DEFAULT_MAX_THREADS: usize = 10;

/// Configuration read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Explicit manifest path
    pub fixtures_yml: Option<PathBuf>,

    /// Maximum number of concurrent download workers
    pub max_threads: usize,

    /// Debug logging requested
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fixtures_yml: None,
            max_threads: DEFAULT_MAX_THREADS,
            debug: false,
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fixtures_yml = lookup(FIXTURES_YML_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let max_threads = match lookup(MAX_THREADS_ENV) {
            Some(raw) => parse_max_threads(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    "Ignoring invalid {}={:?}; using {}",
                    MAX_THREADS_ENV,
                    raw,
                    DEFAULT_MAX_THREADS
                );
                DEFAULT_MAX_THREADS
            }),
            None => DEFAULT_MAX_THREADS,
        };

        let debug = lookup(ENABLE_LOGGER_ENV).is_some_and(|v| !v.is_empty());

        Config {
            fixtures_yml,
            max_threads,
            debug,
        }
    }
}

/// Parse a worker count; zero and garbage are rejected.
pub fn parse_max_threads(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
}
