//! Domain types for the shared edit-awareness state.
//!
//! Timestamps are zone-naive `chrono::NaiveDateTime` values: the wire format
//! carries no zone field and every participant is assumed to share one local
//! clock zone. Merge comparisons operate on the naive values directly; only
//! the age computation applies a UTC-offset correction.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed tracked file name (base name only, never a path).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileName(pub String);

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for FileName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FileName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed participant identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(pub String);

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Username {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Username {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One entry of the shared state: a tracked file, when it was last touched,
/// and whatever trailing annotation the touching agent attached.
///
/// `trailing` holds the raw 4th-and-later whitespace fields of the wire line,
/// re-joined with single spaces (empty when the line had exactly 3 fields).
/// Agents announce ownership as `- <username>`, so the owner identity is the
/// second token of the trailing text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: FileName,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub trailing: String,
}

impl FileRecord {
    /// The participant whose edit produced this timestamp, if announced.
    pub fn owner(&self) -> Option<&str> {
        self.trailing.split_whitespace().nth(1)
    }

    /// Last-write-wins precedence: `self` replaces `other` when it is strictly
    /// newer, or on an exact timestamp tie when only `self` carries trailing
    /// text. Equal-timestamp records that both (or neither) carry trailing
    /// text do not supersede each other — the side already held wins.
    pub fn supersedes(&self, other: &FileRecord) -> bool {
        if self.timestamp != other.timestamp {
            return self.timestamp > other.timestamp;
        }
        !self.trailing.is_empty() && other.trailing.is_empty()
    }
}

/// The full shared knowledge of "who last touched what, when", keyed by file
/// name. `BTreeMap` keeps iteration alphabetical, which is also the canonical
/// serialization order.
pub type RecordSet = BTreeMap<FileName, FileRecord>;

/// Insert `record` into `set` under last-write-wins precedence. The single
/// normalization rule shared by parsing, merging, and local observation.
pub fn absorb(set: &mut RecordSet, record: FileRecord) {
    match set.get(&record.name) {
        Some(existing) if !record.supersedes(existing) => {}
        _ => {
            set.insert(record.name.clone(), record);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, s)
            .unwrap()
    }

    fn record(trailing: &str, s: u32) -> FileRecord {
        FileRecord {
            name: FileName::from("main.rs"),
            timestamp: ts(s),
            trailing: trailing.to_string(),
        }
    }

    #[test]
    fn newtype_display() {
        assert_eq!(FileName::from("main.rs").to_string(), "main.rs");
        assert_eq!(Username::from("alice").to_string(), "alice");
    }

    #[test]
    fn owner_is_second_trailing_token() {
        assert_eq!(record("- alice", 0).owner(), Some("alice"));
        assert_eq!(record("", 0).owner(), None);
        // A single trailing field carries no identity.
        assert_eq!(record("alice", 0).owner(), None);
    }

    #[test]
    fn later_timestamp_supersedes() {
        assert!(record("", 5).supersedes(&record("- bob", 3)));
        assert!(!record("", 3).supersedes(&record("- bob", 5)));
    }

    #[test]
    fn absorb_keeps_at_most_one_record_per_name() {
        let mut set = RecordSet::new();
        absorb(&mut set, record("- alice", 3));
        absorb(&mut set, record("", 1));
        absorb(&mut set, record("- bob", 7));
        assert_eq!(set.len(), 1);
        assert_eq!(set[&FileName::from("main.rs")].owner(), Some("bob"));
    }

    #[test]
    fn tie_prefers_trailing_text() {
        assert!(record("- alice", 5).supersedes(&record("", 5)));
        assert!(!record("", 5).supersedes(&record("- alice", 5)));
        // Both annotated, or both bare: neither side supersedes.
        assert!(!record("- alice", 5).supersedes(&record("- bob", 5)));
        assert!(!record("", 5).supersedes(&record("", 5)));
    }
}
