//! Build log archive
//!
//! One file per deploy attempt under `builds/`, named by the decimal build
//! number, holding the full command transcript. Records are immutable once
//! written; build-number uniqueness comes from the counter, so the
//! create-or-overwrite write never clobbers a different attempt in correct
//! operation.
//!
//! Timestamps are not stored in the record. They derive from file mtime at
//! read time and render in a fixed timezone, so a build report reads the
//! same wherever the operator happens to be.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Utc};
use tracing::debug;

use crate::error::{SlipwayError, SlipwayResult};
use crate::fs::write_atomic;

/// Listing cap: most recent builds shown, older records stay on disk
pub const LIST_CAP: usize = 100;

/// Fixed rendering timezone for build timestamps (UTC+3)
const UTC_OFFSET_SECS: i32 = 3 * 3600;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A retrieved build record
#[derive(Debug, Clone)]
pub struct BuildRecord {
    pub number: u64,
    pub transcript: String,
    pub timestamp: DateTime<FixedOffset>,
}

impl BuildRecord {
    /// Timestamp rendered as `YYYY-MM-DD HH:mm:ss` in the archive timezone
    pub fn timestamp_display(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Handle to one project's `builds/` directory
pub struct BuildArchive {
    dir: PathBuf,
}

impl BuildArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn record_path(&self, number: u64) -> PathBuf {
        self.dir.join(number.to_string())
    }

    /// Persist a transcript under its build number
    pub fn store(&self, number: u64, transcript: &str) -> SlipwayResult<()> {
        let path = self.record_path(number);
        write_atomic(&path, transcript).map_err(|e| SlipwayError::storage(&path, e))?;
        debug!(path = %path.display(), number, "archived build transcript");
        Ok(())
    }

    /// Read a record back, stamping it with the file's mtime
    pub fn retrieve(&self, number: u64) -> SlipwayResult<BuildRecord> {
        let path = self.record_path(number);

        let transcript = match std::fs::read_to_string(&path) {
            Ok(transcript) => transcript,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SlipwayError::BuildNotFound { number });
            }
            Err(e) => return Err(SlipwayError::storage(&path, e)),
        };

        let modified = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(|e| SlipwayError::storage(&path, e))?;
        let timestamp = DateTime::<Utc>::from(modified).with_timezone(&archive_tz());

        Ok(BuildRecord {
            number,
            transcript,
            timestamp,
        })
    }

    /// Build numbers, newest first, capped at [`LIST_CAP`]
    pub fn list(&self) -> SlipwayResult<Vec<u64>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut numbers = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            // Non-numeric names (editor droppings, temp files) are not records.
            if let Ok(number) = entry.file_name().to_string_lossy().parse::<u64>() {
                numbers.push(number);
            }
        }

        numbers.sort_unstable_by(|a, b| b.cmp(a));
        numbers.truncate(LIST_CAP);
        Ok(numbers)
    }
}

fn archive_tz() -> FixedOffset {
    FixedOffset::east_opt(UTC_OFFSET_SECS).expect("static offset is in range")
}
