//! Error types for slipway
//!
//! Uses `thiserror` for library errors. Pipeline failures are deliberately
//! not represented here: a deploy whose external commands fail still
//! completes, producing a numbered build record and a failed
//! [`DeployOutcome`](crate::deploy::DeployOutcome). Only precondition and
//! storage problems surface as errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for slipway operations
pub type SlipwayResult<T> = Result<T, SlipwayError>;

/// Main error type for slipway operations
#[derive(Error, Debug)]
pub enum SlipwayError {
    /// Project directory does not exist under the projects root
    #[error("project not found: {name}")]
    ProjectNotFound { name: String },

    /// Configured target directory does not exist
    #[error("target directory not found: {path}")]
    TargetNotFound { path: PathBuf },

    /// Project has no config file
    #[error("config file not found: {path}")]
    ConfigMissing { path: PathBuf },

    /// Config file exists but cannot be used
    #[error("invalid config in {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    /// Requested build record does not exist
    #[error("build #{number} not found")]
    BuildNotFound { number: u64 },

    /// Counter or archive storage cannot be read or written
    #[error("storage error on {path}: {message}")]
    Storage { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SlipwayError {
    pub(crate) fn storage(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Storage {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
