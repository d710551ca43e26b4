//! Diff engine: pure set algebra over two tree snapshots.
//!
//! No I/O and no side effects; given the same two snapshots this always
//! produces the same partitions, so it is testable with literal sets.

use crate::listing::TreeSnapshot;
use crate::paths::NotebookPath;
use serde::Serialize;
use std::collections::BTreeSet;

/// Three disjoint partitions of the union of both snapshots, plus the
/// env-file flag. The env file itself is excluded from every partition and
/// handled separately by bootstrap, so it never counts toward safety
/// thresholds.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub only_remote: BTreeSet<NotebookPath>,
    pub only_local: BTreeSet<NotebookPath>,
    pub in_both: BTreeSet<NotebookPath>,
    /// Whether the remote target already carries its bootstrap env file.
    pub remote_has_envfile: bool,
}

/// Partition two snapshots. The remote snapshot is always the one consulted
/// for the env-file flag, regardless of which direction later syncs.
pub fn compare(
    local: &TreeSnapshot,
    remote: &TreeSnapshot,
    envfile: &NotebookPath,
) -> Comparison {
    let remote_has_envfile = remote.contains(envfile);

    let mut local = local.clone();
    let mut remote = remote.clone();
    local.remove(envfile);
    remote.remove(envfile);

    Comparison {
        only_remote: remote.difference(&local).cloned().collect(),
        only_local: local.difference(&remote).cloned().collect(),
        in_both: local.intersection(&remote).cloned().collect(),
        remote_has_envfile,
    }
}

impl Comparison {
    /// Everything a pull transfers: the remote side acting as source.
    pub fn pull_transfers(&self) -> Vec<NotebookPath> {
        self.in_both
            .iter()
            .chain(self.only_remote.iter())
            .cloned()
            .collect()
    }

    /// Everything a push transfers: the local side acting as source.
    pub fn push_transfers(&self) -> Vec<NotebookPath> {
        self.in_both
            .iter()
            .chain(self.only_local.iter())
            .cloned()
            .collect()
    }
}
