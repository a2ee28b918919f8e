//! Last-broadcast snapshot per probe.
//!
//! The poll loop is the only writer; transports read it for initial resync
//! and for the full-status endpoint. Each probe's entry is replaced
//! atomically under the lock; there is no cross-probe transaction.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::domain::{ProbeKind, Snapshot, StatusReport};

/// Change detector holding the last broadcast snapshot of every probe.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    last: RwLock<HashMap<ProbeKind, Snapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `snapshot` with the stored baseline for its probe.
    ///
    /// Returns `true` and replaces the baseline when they differ, or when no
    /// baseline exists yet. Equal snapshots leave the store untouched.
    pub fn diff(&self, snapshot: &Snapshot) -> bool {
        let kind = snapshot.kind();
        let mut last = self.last.write().unwrap_or_else(PoisonError::into_inner);

        if last.get(&kind) == Some(snapshot) {
            debug!(probe = %kind, "Snapshot unchanged");
            return false;
        }

        debug!(probe = %kind, first = !last.contains_key(&kind), "Snapshot changed");
        last.insert(kind, snapshot.clone());
        true
    }

    /// Latest snapshot for one probe.
    pub fn get(&self, kind: ProbeKind) -> Option<Snapshot> {
        self.last
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
    }

    /// Every stored snapshot, in [`ProbeKind::ALL`] order.
    pub fn latest(&self) -> Vec<Snapshot> {
        let last = self.last.read().unwrap_or_else(PoisonError::into_inner);
        ProbeKind::ALL
            .iter()
            .filter_map(|kind| last.get(kind).cloned())
            .collect()
    }

    /// Full status as of the last broadcasts.
    pub fn report(&self) -> StatusReport {
        StatusReport::from_snapshots(self.latest())
    }
}
