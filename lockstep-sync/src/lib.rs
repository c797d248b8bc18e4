//! # lockstep-sync
//!
//! State reconciliation for the shared edit-awareness clipboard: local
//! filesystem observation, last-write-wins merging, presence/lock evaluation,
//! and the per-poll cycle that ties them together.
//!
//! Call [`run_cycle`] with an explicit [`SyncState`] once per poll; the
//! orchestrating binary owns the loop, the sleep, and the transport.

pub mod cycle;
pub mod error;
pub mod merge;
pub mod presence;
pub mod scan;

pub use cycle::{run_cycle, CycleContext, CycleOutcome, RemoteStore, SyncState};
pub use error::SyncError;
pub use merge::merge;
pub use presence::{annotate, Ownership, PresenceReport, ReportLine};
pub use scan::{is_recent, scan, Observation};
