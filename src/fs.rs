//! Small filesystem helpers shared by the counter and the archive

use std::io::Write;
use std::path::Path;

use crate::error::{SlipwayError, SlipwayResult};

/// Create a directory if missing; error if the path exists as a non-directory
pub fn ensure_dir(path: &Path) -> SlipwayResult<()> {
    if path.exists() {
        if !path.is_dir() {
            return Err(SlipwayError::storage(path, "exists but is not a directory"));
        }
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(|e| SlipwayError::storage(path, e))
}

/// Write a file atomically: temp file in the same directory, then rename.
///
/// Readers never observe a half-written counter or build record.
pub fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
