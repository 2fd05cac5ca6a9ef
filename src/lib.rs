//! puppet-fixtures - prepare test fixtures for Puppet modules
//!
//! This crate resolves a `.fixtures.yml` manifest into a populated
//! `spec/fixtures/modules` tree: git and Mercurial checkouts, Puppet Forge
//! modules, and symlinks to local paths.

pub mod compat;
pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

pub use crate::core::{Category, FetchSpec, FixtureError, Fixtures, Scm, SymlinkEntry};
pub use crate::util::context::FixturesContext;
