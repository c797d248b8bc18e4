//! Presence/lock evaluator — relative ages and advisory locks.
//!
//! Given a merged record set, the current local time, and the viewer's
//! identity, produce one human-readable age line per record plus the set of
//! files whose most recent known edit belongs to someone else. The "lock" is
//! advisory and informational only; nothing is enforced.
//!
//! The stored timestamps carry no zone, so the age computation applies the
//! viewer's UTC offset as a correction. Merge comparisons do not — all
//! participants are assumed to share one clock zone.

use chrono::NaiveDateTime;

use lockstep_core::types::{FileName, RecordSet, Username};

/// Who the most recent edit of a file belongs to, relative to the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ownership {
    /// The viewer's own edit.
    Own,
    /// Another participant's edit — the file counts as locked.
    Other(String),
}

/// One rendered report entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub name: FileName,
    pub age: String,
    pub owner: Option<Ownership>,
}

/// Age annotations plus the advisory lock set, in alphabetical name order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresenceReport {
    pub lines: Vec<ReportLine>,
    pub locked: Vec<FileName>,
}

/// Annotate every record with a relative age and classify ownership.
///
/// Records without an owner tag produce no lock entry and no self/other
/// distinction.
pub fn annotate(
    set: &RecordSet,
    now: NaiveDateTime,
    utc_offset_secs: i64,
    identity: &Username,
) -> PresenceReport {
    let mut report = PresenceReport::default();
    for record in set.values() {
        let seconds = (now - record.timestamp).num_seconds() + utc_offset_secs;
        let owner = record.owner().map(|owner| {
            if owner == identity.0 {
                Ownership::Own
            } else {
                report.locked.push(record.name.clone());
                Ownership::Other(owner.to_string())
            }
        });
        report.lines.push(ReportLine {
            name: record.name.clone(),
            age: format_age(seconds),
            owner,
        });
    }
    report
}

/// Bucket a second count into a relative-age phrase. Thresholds are evaluated
/// in order, first match wins; division truncates toward zero.
fn format_age(seconds: i64) -> String {
    if seconds < 60 {
        format!("{seconds} seconds ago")
    } else if seconds < 7200 {
        format!("{} minutes ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{} hours ago", seconds / 3600)
    } else {
        format!("{} days ago", seconds / 86400)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
