//! High-level operations.
//!
//! This module contains the implementation of the `prep` and `clean`
//! commands and the manifest handling they share.

pub mod fixtures_clean;
pub mod fixtures_download;
pub mod manifest;
pub mod normalize;

pub use fixtures_clean::{clean, clean_fixtures};
pub use fixtures_download::{download, prep, worker_count, FixtureFetcher, ProcessFetcher};
pub use manifest::{load_manifest, load_manifest_file, parse_manifest};
pub use normalize::{load_fixtures, normalize, Normalizer};
