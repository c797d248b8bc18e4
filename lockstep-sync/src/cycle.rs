//! Poll-cycle state machine.
//!
//! One call to [`run_cycle`] performs a single POLL step: fetch the remote
//! snapshot, re-evaluate presence if it changed, detect recent local edits,
//! and — while the publish counter is armed — merge local knowledge into the
//! remote set and republish it. The caller owns the loop, the scan, the
//! sleep interval, and the [`SyncState`] carried between cycles; nothing here
//! is ambient.
//!
//! A locally detected edit arms the counter to [`PUBLISH_REDUNDANCY`] so the
//! announcement goes out on at least two consecutive cycles, tolerating one
//! stale read on the remote side. Fetch failures are fatal to the cycle;
//! publish failures are logged and swallowed.

use chrono::NaiveDateTime;

use lockstep_core::codec;
use lockstep_core::types::{absorb, FileName, FileRecord, RecordSet, Username};

use crate::error::SyncError;
use crate::merge::merge;
use crate::presence::{annotate, PresenceReport};
use crate::scan::{is_recent, Observation};

/// Number of consecutive cycles a local edit is republished.
pub const PUBLISH_REDUNDANCY: u8 = 2;

/// The shared clipboard transport, as seen by the cycle.
pub trait RemoteStore {
    /// Fetch the current shared snapshot text.
    fn fetch(&self) -> Result<String, SyncError>;

    /// Replace the shared snapshot text.
    fn publish(&self, content: &str) -> Result<(), SyncError>;
}

/// Process-local cycle state. Initialized once at startup, threaded through
/// every [`run_cycle`] call, discarded on exit.
#[derive(Debug, Clone, Default)]
pub struct SyncState {
    /// Last remote snapshot this agent has seen (empty sentinel at startup).
    pub last_remote: String,
    /// Remaining cycles on which a local edit must still be republished.
    pub publish_pending: u8,
    /// Advisory lock set from the most recent presence evaluation.
    pub locked: Vec<FileName>,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Per-cycle inputs that do not change while the cycle runs.
#[derive(Debug, Clone)]
pub struct CycleContext<'a> {
    /// This participant's identity.
    pub identity: &'a Username,
    /// Local-edit recency threshold in seconds.
    pub threshold_secs: u64,
    /// Viewer's UTC offset, applied in age computation only.
    pub utc_offset_secs: i64,
    /// Wall-clock time of this poll (local, zone-naive).
    pub now: NaiveDateTime,
}

/// What one cycle did, for the caller to render.
#[derive(Debug, Clone, Default)]
pub struct CycleOutcome {
    /// The fetched snapshot differed from the last one seen.
    pub remote_changed: bool,
    /// At least one tracked file was edited within the threshold.
    pub local_edit: bool,
    /// A merged snapshot was pushed to the remote store this cycle.
    pub published: bool,
    /// Presence report computed from the freshly fetched snapshot.
    pub remote_report: Option<PresenceReport>,
    /// Presence report computed from the merged snapshot that was published.
    pub publish_report: Option<PresenceReport>,
}

/// Run one poll cycle against `store` with the given local observations.
///
/// Sequence (visibility of edits never decreases):
/// 1. fetch the remote snapshot — transport failure is fatal;
/// 2. if it differs from the last seen one, adopt it and evaluate presence on
///    the fetched content;
/// 3. derive local records from `observations`, tagging recent edits with the
///    caller's identity and arming the publish counter;
/// 4. while the counter is armed, merge local records over the remote ones,
///    evaluate presence on the merged result, publish it, and decrement.
///
/// The publish counter is decremented whether or not the publish call
/// succeeded — the cycle proceeds as if it had, and the failure is only
/// logged.
pub fn run_cycle(
    state: &mut SyncState,
    store: &dyn RemoteStore,
    observations: &[Observation],
    ctx: &CycleContext<'_>,
) -> Result<CycleOutcome, SyncError> {
    let mut outcome = CycleOutcome::default();
    let remote_text = store.fetch()?;
    state.locked.clear();

    if remote_text != state.last_remote {
        state.last_remote = remote_text.clone();
        let report = annotate(
            &codec::parse(&remote_text),
            ctx.now,
            ctx.utc_offset_secs,
            ctx.identity,
        );
        state.locked = report.locked.clone();
        outcome.remote_changed = true;
        outcome.remote_report = Some(report);
    }

    let local = local_records(observations, ctx, &mut outcome.local_edit);
    if outcome.local_edit {
        state.publish_pending = PUBLISH_REDUNDANCY;
        tracing::debug!(
            "local edit detected, publish counter armed to {PUBLISH_REDUNDANCY}"
        );
    }

    if state.publish_pending > 0 {
        let merged = merge(&local, &codec::parse(&remote_text));
        let report = annotate(&merged, ctx.now, ctx.utc_offset_secs, ctx.identity);
        state.locked = report.locked.clone();

        let content = codec::serialize(&merged);
        match store.publish(&content) {
            Ok(()) => outcome.published = true,
            Err(err) => tracing::warn!("publish failed, continuing: {err}"),
        }
        state.publish_pending -= 1;
        outcome.publish_report = Some(report);
    }

    Ok(outcome)
}

/// Turn filesystem observations into a record set, annotating files edited
/// within the threshold with this participant's identity.
fn local_records(
    observations: &[Observation],
    ctx: &CycleContext<'_>,
    local_edit: &mut bool,
) -> RecordSet {
    let mut set = RecordSet::new();
    for observation in observations {
        let mut trailing = String::new();
        if is_recent(observation.modified, ctx.now, ctx.threshold_secs) {
            trailing = format!("- {}", ctx.identity);
            *local_edit = true;
        }
        absorb(
            &mut set,
            FileRecord {
                name: observation.name.clone(),
                timestamp: observation.modified,
                trailing,
            },
        );
    }
    set
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use chrono::{Duration, NaiveDate};
    use lockstep_core::types::FileName;

    use crate::presence::Ownership;

    /// In-memory clipboard double. `publish` replaces the fetchable content
    /// unless `fail_publish` is set.
    struct FakeStore {
        content: RefCell<String>,
        published: RefCell<Vec<String>>,
        fail_fetch: bool,
        fail_publish: bool,
    }

    impl FakeStore {
        fn with_content(content: &str) -> Self {
            Self {
                content: RefCell::new(content.to_string()),
                published: RefCell::new(Vec::new()),
                fail_fetch: false,
                fail_publish: false,
            }
        }
    }

    impl RemoteStore for FakeStore {
        fn fetch(&self) -> Result<String, SyncError> {
            if self.fail_fetch {
                return Err(SyncError::Remote("fetch refused".into()));
            }
            Ok(self.content.borrow().clone())
        }

        fn publish(&self, content: &str) -> Result<(), SyncError> {
            if self.fail_publish {
                return Err(SyncError::Remote("publish refused".into()));
            }
            self.published.borrow_mut().push(content.to_string());
            *self.content.borrow_mut() = content.to_string();
            Ok(())
        }
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn ctx(identity: &Username) -> CycleContext<'_> {
        CycleContext {
            identity,
            threshold_secs: 10,
            utc_offset_secs: 0,
            now: noon(),
        }
    }

    fn observed(name: &str, age_secs: i64) -> Observation {
        Observation {
            name: FileName::from(name),
            modified: noon() - Duration::seconds(age_secs),
        }
    }

    #[test]
    fn fetch_failure_is_fatal() {
        let mut store = FakeStore::with_content("");
        store.fail_fetch = true;
        let alice = Username::from("alice");
        let mut state = SyncState::new();
        let err = run_cycle(&mut state, &store, &[], &ctx(&alice)).unwrap_err();
        assert!(matches!(err, SyncError::Remote(_)));
    }

    #[test]
    fn remote_change_produces_report_and_locks() {
        let store =
            FakeStore::with_content("b.rs 2024-03-01 11:00:00 - bob\n");
        let alice = Username::from("alice");
        let mut state = SyncState::new();

        let outcome = run_cycle(&mut state, &store, &[], &ctx(&alice)).expect("cycle");
        assert!(outcome.remote_changed);
        let report = outcome.remote_report.expect("report");
        assert_eq!(report.locked, vec![FileName::from("b.rs")]);
        assert_eq!(state.locked, vec![FileName::from("b.rs")]);
        assert!(!outcome.published);

        // Unchanged remote on the next poll: no report, locks cleared.
        let outcome = run_cycle(&mut state, &store, &[], &ctx(&alice)).expect("cycle");
        assert!(!outcome.remote_changed);
        assert!(outcome.remote_report.is_none());
        assert!(state.locked.is_empty());
    }

    #[test]
    fn end_to_end_local_edit_merges_and_publishes() {
        // fileA was edited 5s ago (under the 10s threshold); the remote holds
        // an older fileA owned by bob. fileB is an hour old on disk only.
        let store = FakeStore::with_content("fileA.txt 2024-03-01 09:00:00 - bob\n");
        let alice = Username::from("alice");
        let mut state = SyncState::new();
        let observations = [observed("fileA.txt", 5), observed("fileB.txt", 3600)];

        let outcome =
            run_cycle(&mut state, &store, &observations, &ctx(&alice)).expect("cycle");
        assert!(outcome.local_edit);
        assert!(outcome.published);
        assert_eq!(state.publish_pending, 1, "counter armed to 2, one decrement");

        let published = store.published.borrow();
        assert_eq!(published.len(), 1);
        let merged = lockstep_core::codec::parse(&published[0]);
        let file_a = &merged[&FileName::from("fileA.txt")];
        assert_eq!(file_a.owner(), Some("alice"), "local newer edit must win");
        assert_eq!(file_a.timestamp, noon() - Duration::seconds(5));
        assert!(merged.contains_key(&FileName::from("fileB.txt")));

        let report = outcome.publish_report.expect("publish report");
        assert_eq!(
            report
                .lines
                .iter()
                .find(|l| l.name.0 == "fileA.txt")
                .and_then(|l| l.owner.clone()),
            Some(Ownership::Own)
        );
    }

    #[test]
    fn counter_drains_over_two_cycles_without_new_edits() {
        let store = FakeStore::with_content("");
        let alice = Username::from("alice");
        let mut state = SyncState::new();

        // Cycle 1: a fresh edit arms the counter and publishes.
        let recent = [observed("fileA.txt", 5)];
        run_cycle(&mut state, &store, &recent, &ctx(&alice)).expect("cycle 1");
        assert_eq!(state.publish_pending, 1);

        // Cycle 2: the edit has aged past the threshold, but the counter still
        // forces one more publish.
        let aged = [observed("fileA.txt", 30)];
        let outcome = run_cycle(&mut state, &store, &aged, &ctx(&alice)).expect("cycle 2");
        assert!(outcome.published);
        assert_eq!(state.publish_pending, 0);

        // Cycle 3: counter drained, nothing published.
        let outcome = run_cycle(&mut state, &store, &aged, &ctx(&alice)).expect("cycle 3");
        assert!(!outcome.published);
        assert_eq!(store.published.borrow().len(), 2);
    }

    #[test]
    fn drain_publish_keeps_owner_after_edit_ages_out() {
        let store = FakeStore::with_content("");
        let alice = Username::from("alice");
        let mut state = SyncState::new();
        let observations = [observed("fileA.txt", 2)];

        run_cycle(&mut state, &store, &observations, &ctx(&alice)).expect("cycle 1");

        // Same mtime seen 8 seconds later: the edit has aged past the
        // threshold, so the local record is bare. The annotated record
        // shares its timestamp and must win the tie, or the second publish
        // would revoke the announcement the counter exists to repeat.
        let later = CycleContext {
            now: noon() + Duration::seconds(8),
            ..ctx(&alice)
        };
        let outcome =
            run_cycle(&mut state, &store, &observations, &later).expect("cycle 2");
        assert!(outcome.published);

        let published = store.published.borrow();
        let set = lockstep_core::codec::parse(&published[1]);
        assert_eq!(set[&FileName::from("fileA.txt")].owner(), Some("alice"));
        assert_eq!(published[0], published[1]);
    }

    #[test]
    fn publish_failure_is_swallowed_and_counter_still_decrements() {
        let mut store = FakeStore::with_content("");
        store.fail_publish = true;
        let alice = Username::from("alice");
        let mut state = SyncState::new();

        let outcome = run_cycle(&mut state, &store, &[observed("fileA.txt", 2)], &ctx(&alice))
            .expect("cycle must not fail on publish error");
        assert!(!outcome.published);
        assert!(outcome.publish_report.is_some());
        assert_eq!(state.publish_pending, 1);
    }

    #[test]
    fn steady_state_republish_is_idempotent() {
        // Publishing merges our own last publication back in; the surviving
        // records must not regress.
        let store = FakeStore::with_content("");
        let alice = Username::from("alice");
        let mut state = SyncState::new();
        let observations = [observed("fileA.txt", 5)];

        run_cycle(&mut state, &store, &observations, &ctx(&alice)).expect("cycle 1");
        run_cycle(&mut state, &store, &observations, &ctx(&alice)).expect("cycle 2");

        let published = store.published.borrow();
        assert_eq!(published[0], published[1], "re-merge must be a fixed point");
    }

    #[test]
    fn duplicate_observations_collapse_to_latest() {
        // The same base name can appear in several directories; the newest
        // mtime represents the file in the local set.
        let store = FakeStore::with_content("");
        let alice = Username::from("alice");
        let mut state = SyncState::new();
        let observations = [observed("fileA.txt", 3600), observed("fileA.txt", 5)];

        run_cycle(&mut state, &store, &observations, &ctx(&alice)).expect("cycle");
        let published = store.published.borrow();
        let set = lockstep_core::codec::parse(&published[0]);
        assert_eq!(set.len(), 1);
        assert_eq!(
            set[&FileName::from("fileA.txt")].timestamp,
            noon() - Duration::seconds(5)
        );
    }
}
