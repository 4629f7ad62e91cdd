//! Slipway - single-host deploy runner
//!
//! Slipway triggers, executes, and records deployments for a set of
//! independently configured projects. A deploy synchronizes a remote git
//! repository into a local working copy, mirrors selected files into a
//! target directory with rsync, and archives the full command transcript as
//! a numbered, append-only build log.

pub mod archive;
pub mod config;
pub mod counter;
pub mod deploy;
pub mod error;
pub mod fs;
pub mod layout;
pub mod mirror;
pub mod runner;
pub mod sync;

// Re-exports for convenience
pub use archive::{BuildArchive, BuildRecord};
pub use config::{GitConfig, ProjectConfig};
pub use counter::BuildCounter;
pub use deploy::{DeployOutcome, Deployer, Tools};
pub use error::{SlipwayError, SlipwayResult};
pub use layout::{list_projects, ProjectLayout};
pub use runner::{run, run_sequence, Cmd, CmdOutcome};
