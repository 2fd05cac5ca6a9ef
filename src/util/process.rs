//! Subprocess execution.
//!
//! Every VCS and installer operation goes through [`ProcessBuilder`]: one
//! external command, stdin closed, waited on to completion with its output
//! captured. Nothing interacts with a running child.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use anyhow::{Context, Result};
use thiserror::Error;

/// A command that ran but exited unsuccessfully.
#[derive(Debug, Error)]
#[error("`{command}` failed ({status}){}", stderr_suffix(.stderr))]
pub struct CommandFailed {
    /// The command line, shell-quoted
    pub command: String,
    /// Exit status description
    pub status: String,
    /// Captured standard error, trimmed
    pub stderr: String,
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!("\n{}", stderr)
    }
}

/// Builder for one external command invocation.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: Vec<(String, String)>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    /// Set an environment variable for the child only.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Run the command in `cwd` instead of the current directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    pub fn get_program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Run to completion and capture the output, whatever the exit status.
    pub fn exec(&self) -> Result<Output> {
        match self.cwd {
            Some(ref cwd) => tracing::debug!("Calling command {} in {}", self, cwd.display()),
            None => tracing::debug!("Calling command {}", self),
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd.output()
            .with_context(|| format!("failed to execute `{}`", self.program.display()))
    }

    /// Run to completion; a non-zero exit becomes a [`CommandFailed`] error.
    pub fn exec_and_check(&self) -> Result<Output> {
        let output = self.exec()?;
        if !output.status.success() {
            return Err(CommandFailed {
                command: self.display_command(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            }
            .into());
        }
        Ok(output)
    }

    /// Trimmed stdout of a successful run; `None` on a non-zero exit.
    pub fn stdout_if_success(&self) -> Result<Option<String>> {
        let output = self.exec()?;
        if !output.status.success() {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
    }

    /// The command line, shell-quoted, for logs and error messages.
    pub fn display_command(&self) -> String {
        let program = self.program.to_string_lossy();
        shell_words::join(std::iter::once(program.as_ref()).chain(self.args.iter().map(String::as_str)))
    }
}

impl fmt::Display for ProcessBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_command())
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
