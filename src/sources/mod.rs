//! Fixture sources.
//!
//! Sources are responsible for materializing fixtures from their various
//! origins (git and Mercurial repositories, the Puppet Forge, local paths).

pub mod forge;
pub mod git;
pub mod mercurial;
pub mod source;
pub mod symlink;

pub use forge::{ForgeInstaller, InstallOutcome};
pub use git::GitBackend;
pub use mercurial::MercurialBackend;
pub use source::{backend_for, Backend, DownloadOutcome};
pub use symlink::SymlinkManager;
