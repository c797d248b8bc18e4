//! Record codec — the shared clipboard text format.
//!
//! One line per tracked file:
//!
//! ```text
//! <name> <date> <time> [trailing fields...]
//! ```
//!
//! e.g. `main.rs 2024-03-01 12:00:05 - alice`. Parsing is deliberately
//! tolerant: lines with fewer than 3 fields or an unparseable timestamp are
//! silently dropped, never surfaced as errors. Serialization is canonical —
//! names ascending, one trailing newline per record.

use chrono::NaiveDateTime;

use crate::types::{absorb, FileName, FileRecord, RecordSet};

/// Wire timestamp format, second resolution, no zone field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse shared-state text into a [`RecordSet`].
///
/// Malformed lines contribute nothing (tolerance policy, not an error path).
/// Duplicate names are normalized through the same last-write-wins precedence
/// the reconciler uses, so a parsed set never holds two records per name.
pub fn parse(text: &str) -> RecordSet {
    let mut set = RecordSet::new();
    for record in text.lines().filter_map(parse_line) {
        absorb(&mut set, record);
    }
    set
}

/// Parse one line into a record, or `None` if it is malformed.
fn parse_line(line: &str) -> Option<FileRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 3 {
        return None;
    }
    let stamp = format!("{} {}", fields[1], fields[2]);
    let timestamp = NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FORMAT).ok()?;
    Some(FileRecord {
        name: FileName::from(fields[0]),
        timestamp,
        trailing: fields[3..].join(" "),
    })
}

/// Serialize a [`RecordSet`] to canonical text — names ascending, each line
/// terminated by a single newline, trailing text omitted when empty.
pub fn serialize(set: &RecordSet) -> String {
    let mut out = String::new();
    for record in set.values() {
        out.push_str(&record.name.0);
        out.push(' ');
        out.push_str(&record.timestamp.format(TIMESTAMP_FORMAT).to_string());
        if !record.trailing.is_empty() {
            out.push(' ');
            out.push_str(&record.trailing);
        }
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
