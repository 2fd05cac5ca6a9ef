//! Command implementations

pub mod clean;
pub mod prep;

use anyhow::{Context, Result};

use puppet_fixtures::util::{Config, FixturesContext};

use crate::cli::Cli;

/// Build the invocation context: environment first, then flags.
pub fn context(cli: &Cli) -> Result<FixturesContext> {
    let mut ctx = match cli.directory {
        Some(ref dir) => {
            let cwd = std::env::current_dir().context("failed to get current directory")?;
            FixturesContext::with_config(cwd.join(dir), Config::from_env())
        }
        None => FixturesContext::new()?,
    };

    if let Some(ref fixtures) = cli.fixtures {
        ctx.set_manifest_path(fixtures.clone());
    }
    if let Some(jobs) = cli.jobs {
        ctx.set_max_threads(jobs);
    }
    if cli.verbose {
        ctx.set_verbose(true);
    }

    Ok(ctx)
}
