//! Per-project deploy configuration
//!
//! Each project carries a `config.yaml` that is re-read on every deploy, so
//! edits take effect without restarting anything:
//!
//! ```yaml
//! git:
//!   url: git@example.com:site.git
//!   branch: main        # optional, defaults to "master"
//! target: /srv/site
//! ignore:               # optional
//!   - "*.log"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{SlipwayError, SlipwayResult};

/// Source repository settings
#[derive(Debug, Clone, Deserialize)]
pub struct GitConfig {
    /// Remote repository URL, registered as `origin` on first deploy
    pub url: String,

    /// Branch checked out on every deploy
    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_branch() -> String {
    "master".to_string()
}

/// Full per-project configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub git: GitConfig,

    /// Destination directory for the mirror; absolute, must already exist
    pub target: PathBuf,

    /// Mirror exclusion patterns, passed to rsync verbatim
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl ProjectConfig {
    /// Load and validate a project config from a YAML file
    pub fn load(path: &Path) -> SlipwayResult<Self> {
        if !path.exists() {
            return Err(SlipwayError::ConfigMissing {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let config: Self =
            serde_yaml_ng::from_str(&content).map_err(|e| SlipwayError::ConfigInvalid {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        config.validate(path)?;
        Ok(config)
    }

    /// Reject configuration-sourced tokens that could be misread as command
    /// options or break transcripts. Commands are spawned with structured
    /// argument lists (never a shell), so this is a second line of defense.
    fn validate(&self, path: &Path) -> SlipwayResult<()> {
        // The mirror runs from inside the working copy, so a relative target
        // would resolve against `source/`, not against whatever directory
        // passed the precondition check.
        if !self.target.is_absolute() {
            return Err(SlipwayError::ConfigInvalid {
                path: path.to_path_buf(),
                message: format!("target {} must be an absolute path", self.target.display()),
            });
        }
        check_token(&self.git.url, "git.url", path)?;
        check_token(&self.git.branch, "git.branch", path)?;
        for pattern in &self.ignore {
            check_token(pattern, "ignore pattern", path)?;
        }
        Ok(())
    }
}

fn check_token(token: &str, what: &str, path: &Path) -> SlipwayResult<()> {
    if token.is_empty() {
        return Err(SlipwayError::ConfigInvalid {
            path: path.to_path_buf(),
            message: format!("{what} must not be empty"),
        });
    }
    if token.starts_with('-') {
        return Err(SlipwayError::ConfigInvalid {
            path: path.to_path_buf(),
            message: format!("{what} {token:?} must not start with '-'"),
        });
    }
    if token.chars().any(char::is_control) {
        return Err(SlipwayError::ConfigInvalid {
            path: path.to_path_buf(),
            message: format!("{what} {token:?} must not contain control characters"),
        });
    }
    Ok(())
}
