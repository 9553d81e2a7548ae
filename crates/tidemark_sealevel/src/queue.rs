//! # Snapshot Queue
//!
//! FIFO of chunk snapshots shared by two periodic tasks:
//!
//! ```text
//!   refill task ──(only when empty)──> [Mutex<VecDeque>] ──(up to N)──> apply task
//! ```
//!
//! Both the empty-check-then-fill and the drain-up-to-N run under the same
//! lock, so a refill can never interleave with a drain and duplicate or lose
//! snapshots. Refilling only an empty queue keeps chunks that are already
//! waiting from being snapshotted a second time.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tidemark_voxel::{ChunkSnapshot, Environment};

use crate::climate::{ClimateEffect, ClimateEngine};
use crate::grid::{GridAccess, ObserverOrdering};

/// Result of a refill attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefillOutcome {
    /// The queue still held snapshots; nothing was added.
    Skipped {
        /// Snapshots pending at the time of the attempt.
        pending: usize,
    },
    /// The queue was empty and `added` snapshots were appended.
    Refilled {
        /// Snapshots appended.
        added: usize,
    },
}

/// Snapshots removed from the queue together, in FIFO order.
#[derive(Debug, Default)]
pub struct SnapshotBatch {
    snapshots: Vec<ChunkSnapshot>,
}

impl SnapshotBatch {
    /// Number of snapshots in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns true if the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshots in processing order.
    #[must_use]
    pub fn snapshots(&self) -> &[ChunkSnapshot] {
        &self.snapshots
    }
}

impl IntoIterator for SnapshotBatch {
    type Item = ChunkSnapshot;
    type IntoIter = std::vec::IntoIter<ChunkSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.into_iter()
    }
}

/// Thread-safe FIFO of pending snapshots.
#[derive(Debug, Default)]
pub struct SnapshotQueue {
    pending: Mutex<VecDeque<ChunkSnapshot>>,
}

impl SnapshotQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// Appends the snapshots produced by `produce` if and only if the queue is
    /// empty. `produce` runs under the queue lock and is not called otherwise.
    pub fn refill_with<F>(&self, produce: F) -> RefillOutcome
    where
        F: FnOnce() -> Vec<ChunkSnapshot>,
    {
        let mut pending = self.pending.lock();
        if !pending.is_empty() {
            return RefillOutcome::Skipped {
                pending: pending.len(),
            };
        }
        let snapshots = produce();
        let added = snapshots.len();
        pending.extend(snapshots);
        RefillOutcome::Refilled { added }
    }

    /// Removes up to `max_count` snapshots from the front of the queue.
    #[must_use]
    pub fn drain_batch(&self, max_count: usize) -> SnapshotBatch {
        let mut pending = self.pending.lock();
        let take = max_count.min(pending.len());
        SnapshotBatch {
            snapshots: pending.drain(..take).collect(),
        }
    }

    /// Drops every pending snapshot, returning how many were discarded.
    pub fn clear(&self) -> usize {
        let mut pending = self.pending.lock();
        let discarded = pending.len();
        pending.clear();
        discarded
    }
}

/// Snapshots every loaded chunk of every eligible world.
///
/// A world is eligible when it is an overworld and its climate enables
/// [`ClimateEffect::SeaLevelRise`]. Within a world, chunks nearest to an
/// observer come first.
pub fn collect_snapshots<G, C, O>(grid: &G, climate: &C, ordering: &O) -> Vec<ChunkSnapshot>
where
    G: GridAccess + ?Sized,
    C: ClimateEngine + ?Sized,
    O: ObserverOrdering + ?Sized,
{
    let mut snapshots = Vec::new();
    for world in grid.worlds() {
        if grid.environment(world) != Some(Environment::Overworld) {
            continue;
        }
        let enabled = climate
            .climate(world)
            .is_some_and(|c| c.is_effect_enabled(ClimateEffect::SeaLevelRise));
        if !enabled {
            continue;
        }
        let ordered =
            ordering.sort_by_proximity(grid.loaded_chunks(world), &grid.observers(world));
        snapshots.extend(ordered.into_iter().filter_map(|coord| grid.snapshot(world, coord)));
    }
    snapshots
}
