//! Target mirroring via rsync
//!
//! Builds the one-shot rsync invocation that replicates the working copy
//! into the target directory: recursive, checksum-aware (`-c`, so files
//! touched by git but unchanged in content are skipped), and destructive
//! (`--delete` removes destination files that vanished from the source).
//!
//! Version-control metadata is always excluded; configured ignore patterns
//! each become one structured `--exclude=` argument. Because the command is
//! spawned without a shell, a pattern can contain quotes or spaces without
//! any escaping.

use std::path::Path;

use crate::runner::Cmd;

/// Exclusion that always applies, whatever the project config says
const VCS_EXCLUDE: &str = ".git*";

/// Build the mirror command, run from inside `source_dir`
pub fn mirror_cmd(rsync_bin: &str, source_dir: &Path, target: &Path, ignore: &[String]) -> Cmd {
    let mut cmd = Cmd::new(rsync_bin)
        .arg("-rcvh")
        .arg("--delete")
        .arg(format!("--exclude={VCS_EXCLUDE}"));

    for pattern in ignore {
        cmd = cmd.arg(format!("--exclude={pattern}"));
    }

    cmd.arg(".")
        .arg(target.display().to_string())
        .current_dir(source_dir)
}
