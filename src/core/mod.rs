//! Core data structures.
//!
//! This module contains the foundational types used throughout the crate:
//! - Normalized fixture records (FetchSpec, SymlinkEntry, Fixtures)
//! - The error taxonomy
//! - Module metadata and self-identity

pub mod error;
pub mod fixture;
pub mod metadata;

pub use error::FixtureError;
pub use fixture::{Category, FetchSpec, Fixtures, Scm, SymlinkEntry};
pub use metadata::{Metadata, ModuleIdentity};
