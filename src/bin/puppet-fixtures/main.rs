//! puppet-fixtures CLI - prepare and clean Puppet module test fixtures

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use puppet_fixtures::util::config::ENABLE_LOGGER_ENV;
use puppet_fixtures::FixtureError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        if e
            .downcast_ref::<FixtureError>()
            .is_some_and(FixtureError::is_configuration)
        {
            eprintln!("note: fix the fixtures manifest; no fixtures were touched");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let debug = cli.verbose
        || std::env::var_os(ENABLE_LOGGER_ENV).is_some_and(|v| !v.is_empty());
    let filter = if debug {
        EnvFilter::new("puppet_fixtures=debug")
    } else {
        EnvFilter::new("puppet_fixtures=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    let ctx = commands::context(&cli)?;
    match cli.command {
        Commands::Prep => commands::prep::execute(&ctx),
        Commands::Clean => commands::clean::execute(&ctx),
    }
}
