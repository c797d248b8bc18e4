//! Local observer — modification times of tracked files.
//!
//! Walks the working tree recursively and reports every non-directory entry
//! whose base name is in the tracked set. A failure to read the walk root is
//! fatal to the cycle; unreadable child directories or files are skipped with
//! a warning, mirroring the codec's tolerance policy.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime, SubsecRound};

use lockstep_core::types::FileName;

use crate::error::{io_err, SyncError};

/// One observed tracked file: base name and local-clock modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub name: FileName,
    pub modified: NaiveDateTime,
}

/// Recursively scan `root` for files whose base name is in `tracked`.
///
/// Entries are visited in sorted order per directory, so the result is stable
/// within one process run. Returns an error only if `root` itself cannot be
/// read.
pub fn scan(root: &Path, tracked: &[String]) -> Result<Vec<Observation>, SyncError> {
    let tracked: HashSet<&str> = tracked.iter().map(String::as_str).collect();
    let mut observations = Vec::new();

    let mut dirs: Vec<PathBuf> = vec![root.to_path_buf()];
    let mut cursor = 0;
    while cursor < dirs.len() {
        let current = dirs[cursor].clone();
        cursor += 1;

        let entries = match std::fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(err) if cursor == 1 => return Err(io_err(&current, err)),
            Err(err) => {
                tracing::warn!("skipping unreadable directory {}: {err}", current.display());
                continue;
            }
        };

        let mut children: Vec<_> = entries.filter_map(|e| e.ok()).collect();
        children.sort_by_key(|e| e.file_name());

        for entry in children {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                tracing::warn!("skipping unreadable entry {}", path.display());
                continue;
            };
            if file_type.is_dir() {
                dirs.push(path);
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !tracked.contains(name.as_str()) {
                continue;
            }
            let modified = match entry.metadata().and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(err) => {
                    tracing::warn!("skipping {}: cannot read mtime: {err}", path.display());
                    continue;
                }
            };
            observations.push(Observation {
                name: FileName::from(name),
                modified: to_local_naive(modified),
            });
        }
    }

    Ok(observations)
}

/// A file counts as recently edited when its modification time is strictly
/// within `threshold_secs` of `now`.
pub fn is_recent(modified: NaiveDateTime, now: NaiveDateTime, threshold_secs: u64) -> bool {
    (now - modified).num_seconds() < threshold_secs as i64
}

fn to_local_naive(timestamp: SystemTime) -> NaiveDateTime {
    // The wire format is second resolution. Sub-second mtime precision must
    // not survive past this boundary, or a fresh observation would strictly
    // supersede the equal-second record it was published as.
    DateTime::<Local>::from(timestamp).trunc_subsecs(0).naive_local()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
