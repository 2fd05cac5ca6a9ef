//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Prepare test fixtures for a Puppet module from its .fixtures.yml
#[derive(Parser)]
#[command(name = "puppet-fixtures")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run as if started in DIR (the module root)
    #[arg(short = 'C', long = "directory", value_name = "DIR", global = true)]
    pub directory: Option<PathBuf>,

    /// Maximum number of fixtures downloaded in parallel
    /// [default: $MAX_FIXTURE_THREAD_COUNT or 10]
    #[arg(short, long, value_name = "N", global = true)]
    pub jobs: Option<usize>,

    /// Path to the fixtures manifest
    #[arg(long, value_name = "FILE", env = "FIXTURES_YML", global = true)]
    pub fixtures: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download repositories and forge modules, and create symlinks
    Prep,

    /// Remove all fixtures declared in the manifest
    Clean,
}
