//! On-disk layout of the project store
//!
//! Everything lives under a single projects root, one directory per project:
//!
//! ```text
//! projects/
//!   site/
//!     config.yaml        deploy configuration
//!     .lastbuildnumber   last allocated build number
//!     .deploy.lock       per-project deploy lock (advisory)
//!     source/            git working copy
//!     builds/            one transcript file per build number
//! ```
//!
//! A project exists once its directory does; nothing here ever deletes one.

use std::path::{Path, PathBuf};

use crate::error::SlipwayResult;

pub const CONFIG_FILE: &str = "config.yaml";
pub const BUILD_NUMBER_FILE: &str = ".lastbuildnumber";
pub const DEPLOY_LOCK_FILE: &str = ".deploy.lock";
pub const SOURCE_DIR: &str = "source";
pub const BUILDS_DIR: &str = "builds";

/// Paths for one project under a projects root
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
    name: String,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> PathBuf {
        self.root.join(&self.name)
    }

    pub fn exists(&self) -> bool {
        self.dir().is_dir()
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir().join(CONFIG_FILE)
    }

    pub fn counter_path(&self) -> PathBuf {
        self.dir().join(BUILD_NUMBER_FILE)
    }

    pub fn deploy_lock_path(&self) -> PathBuf {
        self.dir().join(DEPLOY_LOCK_FILE)
    }

    pub fn source_dir(&self) -> PathBuf {
        self.dir().join(SOURCE_DIR)
    }

    pub fn builds_dir(&self) -> PathBuf {
        self.dir().join(BUILDS_DIR)
    }
}

/// Project names under a root, sorted; a project is any subdirectory
pub fn list_projects(root: &Path) -> SlipwayResult<Vec<String>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
