//! Reconciler — last-write-wins merge of two record sets.
//!
//! For every file name in either input, keep the record with the strictly
//! later timestamp; a name present on only one side wins unconditionally.
//! On an exact timestamp tie the record carrying trailing/owner text wins;
//! if both or neither carry it, the `primary` side wins. The tie-break is
//! deterministic so repeated reconciliation is reproducible across runs.
//!
//! The merge is idempotent (`merge(s, s) == s`) and a file's surviving
//! timestamp never decreases across any chain of merges.

use lockstep_core::types::{absorb, RecordSet};

/// Merge `secondary` into `primary`, per-name last-write-wins.
pub fn merge(primary: &RecordSet, secondary: &RecordSet) -> RecordSet {
    let mut merged = primary.clone();
    for candidate in secondary.values() {
        absorb(&mut merged, candidate.clone());
    }
    merged
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
