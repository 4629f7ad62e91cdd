//! Persistent per-project build counter
//!
//! The counter lives in a single file holding the decimal ASCII value of the
//! last allocated build number. An absent or empty file reads as 0, so the
//! first deploy of a project gets build #1.
//!
//! Allocation is a read-increment-write guarded by an exclusive advisory
//! lock on a sibling `.lock` file, so two concurrent deploys of the same
//! project can never be handed the same number, whether they race from
//! threads or from separate processes. Both success and failure consume a
//! number; a skipped number on retry means an earlier attempt got that far.

use std::fs::File;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::{SlipwayError, SlipwayResult};
use crate::fs::write_atomic;

/// Handle to one project's counter file
pub struct BuildCounter {
    path: PathBuf,
}

impl BuildCounter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    /// Last allocated number without allocating (0 before any deploy)
    pub fn current(&self) -> SlipwayResult<u64> {
        self.read_value()
    }

    /// Allocate the next build number: read, increment, persist, return.
    ///
    /// Indivisible with respect to other allocators for the same project.
    pub fn allocate_next(&self) -> SlipwayResult<u64> {
        let lock_file =
            File::create(self.lock_path()).map_err(|e| SlipwayError::storage(&self.path, e))?;
        lock_file
            .lock_exclusive()
            .map_err(|e| SlipwayError::storage(&self.path, e))?;

        let result = self.allocate_locked();

        let _ = FileExt::unlock(&lock_file);
        result
    }

    fn allocate_locked(&self) -> SlipwayResult<u64> {
        let next = self.read_value()? + 1;
        write_atomic(&self.path, &next.to_string())
            .map_err(|e| SlipwayError::storage(&self.path, e))?;
        debug!(path = %self.path.display(), number = next, "allocated build number");
        Ok(next)
    }

    fn read_value(&self) -> SlipwayResult<u64> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(SlipwayError::storage(&self.path, e)),
        };

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        trimmed
            .parse()
            .map_err(|_| SlipwayError::storage(&self.path, format!("not a number: {trimmed:?}")))
    }
}
