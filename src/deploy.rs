//! Deploy pipeline coordinator
//!
//! Runs one deploy attempt end to end: precondition checks, build-number
//! allocation, source synchronization, target mirroring, transcript
//! archival. Precondition failures (missing project, bad config, missing
//! target) surface as typed errors before anything durable changes — no
//! build number is consumed and no record is written. Once a number has been
//! allocated, the attempt always runs through to a numbered, archived
//! transcript; external-command failures come back as a non-exceptional
//! failed outcome for the operator to inspect and retry.
//!
//! Same-project deploys serialize on an exclusive file lock held from
//! allocation through archival, so the counter, the working copy, and the
//! target are never touched by two attempts at once. Deploys of different
//! projects own disjoint files and overlap freely.

use std::fs::File;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, info};

use crate::archive::BuildArchive;
use crate::config::ProjectConfig;
use crate::error::{SlipwayError, SlipwayResult};
use crate::layout::ProjectLayout;
use crate::{fs, mirror, runner, sync};

/// External tool binaries the pipeline spawns.
///
/// Overridable so tests (or exotic hosts) can point at specific binaries;
/// defaults resolve through `PATH`.
#[derive(Debug, Clone)]
pub struct Tools {
    pub git: String,
    pub rsync: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            git: "git".to_string(),
            rsync: "rsync".to_string(),
        }
    }
}

/// Final result of a deploy attempt that got far enough to be numbered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployOutcome {
    /// True if any pipeline step exited non-zero
    pub failed: bool,
    /// The build number this attempt consumed
    pub build_number: u64,
}

/// Deploy coordinator for a projects root
pub struct Deployer {
    root: PathBuf,
    tools: Tools,
}

impl Deployer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tools: Tools::default(),
        }
    }

    pub fn with_tools(mut self, tools: Tools) -> Self {
        self.tools = tools;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run one deploy attempt for `project`.
    ///
    /// Returns the archived outcome, or a typed error for precondition and
    /// storage failures (which consume no build number).
    pub fn deploy(&self, project: &str) -> SlipwayResult<DeployOutcome> {
        let layout = self.layout(project)?;

        // Preconditions, all before any durable state changes.
        let config = ProjectConfig::load(&layout.config_path())?;
        if !config.target.is_dir() {
            return Err(SlipwayError::TargetNotFound {
                path: config.target,
            });
        }
        fs::ensure_dir(&layout.builds_dir())?;
        fs::ensure_dir(&layout.source_dir())?;

        // Critical section: counter, working copy, and target belong to this
        // attempt until the transcript is archived.
        let _lock = DeployLock::acquire(&layout.deploy_lock_path())?;

        let counter = crate::counter::BuildCounter::new(layout.counter_path());
        let number = counter.allocate_next()?;
        info!(project, build = number, branch = %config.git.branch, "deploy started");

        let source_dir = layout.source_dir();
        let mut plan = sync::plan(&self.tools.git, &source_dir, &config);
        plan.push(mirror::mirror_cmd(
            &self.tools.rsync,
            &source_dir,
            &config.target,
            &config.ignore,
        ));

        let outcome = runner::run_sequence(&plan);

        BuildArchive::new(layout.builds_dir()).store(number, &outcome.transcript)?;
        info!(
            project,
            build = number,
            code = outcome.code,
            success = outcome.success(),
            "deploy finished"
        );

        Ok(DeployOutcome {
            failed: !outcome.success(),
            build_number: number,
        })
    }

    /// Archive handle for an existing project (for listing and reports)
    pub fn archive(&self, project: &str) -> SlipwayResult<BuildArchive> {
        let layout = self.layout(project)?;
        Ok(BuildArchive::new(layout.builds_dir()))
    }

    fn layout(&self, project: &str) -> SlipwayResult<ProjectLayout> {
        let layout = ProjectLayout::new(&self.root, project);
        if !layout.exists() {
            return Err(SlipwayError::ProjectNotFound {
                name: project.to_string(),
            });
        }
        Ok(layout)
    }
}

/// Exclusive per-project deploy lock, held for the lifetime of the guard.
///
/// Advisory file lock, so it excludes concurrent deploys across both
/// threads and processes on the same host.
struct DeployLock {
    file: File,
}

impl DeployLock {
    fn acquire(path: &Path) -> SlipwayResult<Self> {
        let file = File::create(path).map_err(|e| SlipwayError::storage(path, e))?;
        debug!(path = %path.display(), "waiting for deploy lock");
        file.lock_exclusive()
            .map_err(|e| SlipwayError::storage(path, e))?;
        Ok(Self { file })
    }
}

impl Drop for DeployLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
