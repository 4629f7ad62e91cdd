//! Source synchronization planning
//!
//! Produces the git command sequence that brings a project's working copy up
//! to date with its configured remote and branch. The plan is executed
//! through [`runner::run_sequence`](crate::runner::run_sequence), so a
//! failing step aborts the rest and the whole thing lands in the build
//! transcript.
//!
//! The working copy's state is probed explicitly (does `source/.git`
//! exist?) rather than inferred from command failures:
//!
//! - uninitialized: `init`, `remote add origin <url>`, `fetch`, `checkout`
//! - initialized: `fetch`, `checkout`, `pull`
//!
//! A bootstrap that died between `init` and `remote add` leaves a `.git`
//! with no remote; that remnant is detected and healed by prefixing the
//! update sequence with the missing `remote add`. Switching `git.branch`
//! between deploys is just a checkout on the existing clone; the previous
//! branch's objects stay put.

use std::path::Path;

use tracing::debug;

use crate::config::ProjectConfig;
use crate::runner::Cmd;

/// Canonical remote name for the configured URL
pub const REMOTE_NAME: &str = "origin";

/// Build the git sequence that synchronizes `source_dir` per `config`
pub fn plan(git_bin: &str, source_dir: &Path, config: &ProjectConfig) -> Vec<Cmd> {
    let git = |args: &[&str]| Cmd::new(git_bin).args(args.iter().copied()).current_dir(source_dir);

    let git_dir = source_dir.join(".git");
    let mut cmds = Vec::new();

    if git_dir.is_dir() {
        debug!(source = %source_dir.display(), "working copy initialized, planning update");
        if !has_remote(&git_dir, REMOTE_NAME) {
            // Partial bootstrap remnant: .git exists but origin was never
            // registered. Heal before fetching.
            cmds.push(git(&["remote", "add", REMOTE_NAME, &config.git.url]));
        }
        cmds.push(git(&["fetch", "-v"]));
        cmds.push(git(&["checkout", &config.git.branch]));
        cmds.push(git(&["pull", "-v"]));
    } else {
        debug!(source = %source_dir.display(), "no working copy, planning bootstrap");
        cmds.push(git(&["init"]));
        cmds.push(git(&["remote", "add", REMOTE_NAME, &config.git.url]));
        cmds.push(git(&["fetch", "-v"]));
        cmds.push(git(&["checkout", &config.git.branch]));
    }

    cmds
}

fn has_remote(git_dir: &Path, remote: &str) -> bool {
    let header = format!("[remote \"{remote}\"]");
    std::fs::read_to_string(git_dir.join("config"))
        .map(|content| content.lines().any(|line| line.trim() == header))
        .unwrap_or(false)
}
