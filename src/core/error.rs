//! Fixture error types.

use std::fmt::Write as _;
use std::path::PathBuf;

use thiserror::Error;

/// Error raised while resolving or fetching fixtures.
///
/// Configuration and compatibility errors abort an invocation before any
/// fetch work is scheduled. Fetch errors are scoped to one job and are
/// collected by the scheduler into [`FixtureError::Batch`].
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("fixtures file not found: '{}'", .path.display())]
    FixturesFileNotFound { path: PathBuf },

    #[error("failed to read fixtures file '{}'", .path.display())]
    ReadManifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "found malformed YAML in '{}' on line {line} column {column}: {problem}",
        .path.display()
    )]
    MalformedManifest {
        path: PathBuf,
        line: usize,
        column: usize,
        problem: String,
    },

    #[error("no 'fixtures' entries found in '{}'; required", .path.display())]
    MissingFixtures { path: PathBuf },

    #[error("invalid '{category}' section: {message}")]
    InvalidCategory { category: String, message: String },

    #[error("invalid {category} fixture `{fixture}`: {message}")]
    InvalidEntry {
        category: String,
        fixture: String,
        message: String,
    },

    #[error("{category} fixture `{fixture}` has no `repo` set")]
    MissingRepo { category: String, fixture: String },

    #[error(
        "the ref for {} is invalid (contains a forward slash `{reference}`); if this is a branch name, please use the 'branch' setting instead",
        .target.display()
    )]
    InvalidRef { reference: String, target: PathBuf },

    #[error("unfortunately {scm} is not supported yet (fixture {})", .target.display())]
    UnsupportedScm { scm: String, target: PathBuf },

    #[error(
        "the subdir `{subdir}` for {} must be a path inside the fetched tree",
        .target.display()
    )]
    InvalidSubdir { subdir: String, target: PathBuf },

    #[error("invalid flags for {}: {message}", .target.display())]
    InvalidFlags { target: PathBuf, message: String },

    #[error("invalid puppet_version range `{range}`: {message}")]
    InvalidVersionRange { range: String, message: String },

    #[error("neither {} could be found; please install one of them", quote_all(.tried))]
    HostToolMissing { tried: Vec<String> },

    #[error("failed to fetch {remote} into {}", .target.display())]
    Fetch {
        remote: String,
        target: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("{}", describe_batch(.failures))]
    Batch { failures: Vec<FixtureError> },
}

impl FixtureError {
    /// Wrap a job-level failure, tagging it with the remote and target.
    pub fn fetch(remote: impl Into<String>, target: impl Into<PathBuf>, source: anyhow::Error) -> Self {
        FixtureError::Fetch {
            remote: remote.into(),
            target: target.into(),
            source,
        }
    }

    /// Check whether this error belongs to the configuration class.
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            FixtureError::Fetch { .. } | FixtureError::Batch { .. } | FixtureError::HostToolMissing { .. }
        )
    }
}

fn quote_all(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(" nor ")
}

fn describe_batch(failures: &[FixtureError]) -> String {
    let mut out = format!("failed to download {} fixture(s)", failures.len());
    for failure in failures {
        let _ = write!(out, "\n  - {}", failure);
        if let FixtureError::Fetch { source, .. } = failure {
            let _ = write!(out, ": {:#}", source);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_ref_names_target() {
        let err = FixtureError::InvalidRef {
            reference: "feature/foo".into(),
            target: PathBuf::from("spec/fixtures/modules/stdlib"),
        };
        let msg = err.to_string();
        assert!(msg.contains("spec/fixtures/modules/stdlib"));
        assert!(msg.contains("branch"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_invalid_subdir_is_configuration() {
        let err = FixtureError::InvalidSubdir {
            subdir: "../x".into(),
            target: PathBuf::from("spec/fixtures/modules/inner"),
        };
        assert!(err.to_string().contains("spec/fixtures/modules/inner"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_host_tool_missing_names_both() {
        let err = FixtureError::HostToolMissing {
            tried: vec!["openvox".into(), "puppet".into()],
        };
        assert_eq!(
            err.to_string(),
            "neither 'openvox' nor 'puppet' could be found; please install one of them"
        );
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_batch_lists_every_failure() {
        let err = FixtureError::Batch {
            failures: vec![
                FixtureError::fetch("https://a.example/a.git", "/tmp/a", anyhow::anyhow!("boom")),
                FixtureError::fetch("https://b.example/b.git", "/tmp/b", anyhow::anyhow!("bang")),
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("failed to download 2 fixture(s)"));
        assert!(msg.contains("https://a.example/a.git into /tmp/a: boom"));
        assert!(msg.contains("https://b.example/b.git into /tmp/b: bang"));
    }
}
