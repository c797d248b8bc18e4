//! Console rendering of presence reports.
//!
//! Line format per record: `name    ageDescription[ - owner]`, with the
//! viewer's own name in green and other participants in red. Locked files get
//! one `Locking: <file>` line each.

use chrono::NaiveDateTime;
use colored::Colorize;

use lockstep_core::codec::TIMESTAMP_FORMAT;
use lockstep_core::types::{FileName, Username};
use lockstep_sync::{Ownership, PresenceReport};

/// Which cycle event a report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Report of a freshly fetched remote snapshot.
    Polled,
    /// Report of a merged snapshot that was just republished.
    Sent,
}

impl ReportKind {
    fn header(self) -> &'static str {
        match self {
            ReportKind::Polled => "Polled at",
            ReportKind::Sent => "Sent at",
        }
    }
}

/// Print a presence report with its cycle header.
pub fn print_report(
    kind: ReportKind,
    at: NaiveDateTime,
    report: &PresenceReport,
    identity: &Username,
) {
    println!();
    println!("{} {}", kind.header(), at.format(TIMESTAMP_FORMAT));
    println!("Latest modifications:");
    for line in &report.lines {
        println!("{}", format_line(&line.name, &line.age, &line.owner, identity));
    }
}

/// Print one advisory-lock line per locked file.
pub fn print_locks(locked: &[FileName]) {
    for file in locked {
        println!("Locking: {file}");
    }
}

fn format_line(
    name: &FileName,
    age: &str,
    owner: &Option<Ownership>,
    identity: &Username,
) -> String {
    let annotated = match owner {
        Some(Ownership::Own) => format!("{age} - {}", identity.0.green().bold()),
        Some(Ownership::Other(other)) => format!("{age} - {}", other.red().bold()),
        None => age.to_string(),
    };
    format!("{name}    {annotated}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
