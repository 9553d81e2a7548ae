//! # Batch Scheduler
//!
//! Two fixed-period jobs driven by the host's tick counter:
//!
//! - **refill**: every `queue-ticks`, snapshot loaded chunks if the queue is empty
//! - **apply**: every `chunk-ticks`, drain at most `chunks-per-period` snapshots
//!
//! Decoupling the two rates bounds how many chunks are mutated per tick no
//! matter how many are loaded.

use std::sync::Arc;

use crate::queue::{SnapshotBatch, SnapshotQueue};

/// A job that becomes due every `period` ticks, first at the tick it was
/// created for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodicTask {
    period: u64,
    next_due: u64,
}

impl PeriodicTask {
    /// Creates a task first due at `start`. A zero period is treated as one.
    #[must_use]
    pub fn new(period: u32, start: u64) -> Self {
        Self {
            period: u64::from(period.max(1)),
            next_due: start,
        }
    }

    /// Period in ticks.
    #[must_use]
    pub const fn period(&self) -> u64 {
        self.period
    }

    /// Returns true and schedules the next run if the task is due at `tick`.
    pub fn poll(&mut self, tick: u64) -> bool {
        if tick < self.next_due {
            return false;
        }
        self.next_due = tick + self.period;
        true
    }
}

/// Tasks that came due on one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DueTasks {
    /// The refill task is due.
    pub refill: bool,
    /// The drain/apply task is due.
    pub apply: bool,
}

/// Drives the refill and apply jobs over a shared queue.
#[derive(Debug)]
pub struct BatchScheduler {
    queue: Arc<SnapshotQueue>,
    refill: PeriodicTask,
    apply: PeriodicTask,
    chunks_per_period: usize,
}

impl BatchScheduler {
    /// Creates a scheduler whose jobs are both first due at tick 0.
    #[must_use]
    pub fn new(
        queue: Arc<SnapshotQueue>,
        queue_ticks: u32,
        chunk_ticks: u32,
        chunks_per_period: usize,
    ) -> Self {
        Self {
            queue,
            refill: PeriodicTask::new(queue_ticks, 0),
            apply: PeriodicTask::new(chunk_ticks, 0),
            chunks_per_period,
        }
    }

    /// The shared queue.
    #[must_use]
    pub fn queue(&self) -> &Arc<SnapshotQueue> {
        &self.queue
    }

    /// Batch size cap.
    #[must_use]
    pub const fn chunks_per_period(&self) -> usize {
        self.chunks_per_period
    }

    /// Polls both jobs for `tick`.
    pub fn poll(&mut self, tick: u64) -> DueTasks {
        DueTasks {
            refill: self.refill.poll(tick),
            apply: self.apply.poll(tick),
        }
    }

    /// Removes the next batch from the queue. Empty when nothing is pending.
    #[must_use]
    pub fn drain_batch(&self) -> SnapshotBatch {
        self.queue.drain_batch(self.chunks_per_period)
    }
}

#[cfg(test)]
mod tests {
    use tidemark_voxel::{Chunk, ChunkCoord, WorldId};

    use super::*;

    #[test]
    fn test_periodic_task_fires_every_period() {
        let mut task = PeriodicTask::new(3, 0);
        let fired: Vec<u64> = (0..10).filter(|t| task.poll(*t)).collect();
        assert_eq!(fired, vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_late_poll_reschedules_from_poll_tick() {
        let mut task = PeriodicTask::new(5, 0);
        assert!(task.poll(0));
        assert!(task.poll(12));
        assert!(!task.poll(16));
        assert!(task.poll(17));
    }

    #[test]
    fn test_zero_period_runs_every_tick() {
        let mut task = PeriodicTask::new(0, 0);
        assert_eq!(task.period(), 1);
        assert!(task.poll(0));
        assert!(task.poll(1));
    }

    #[test]
    fn test_scheduler_rates_are_independent() {
        let mut scheduler = BatchScheduler::new(Arc::new(SnapshotQueue::new()), 4, 2, 1);
        assert_eq!(scheduler.chunks_per_period(), 1);
        let due: Vec<DueTasks> = (0..5).map(|t| scheduler.poll(t)).collect();
        assert_eq!(due[0], DueTasks { refill: true, apply: true });
        assert_eq!(due[1], DueTasks::default());
        assert_eq!(due[2], DueTasks { refill: false, apply: true });
        assert_eq!(due[4], DueTasks { refill: true, apply: true });
    }

    #[test]
    fn test_drain_respects_batch_size() {
        let queue = Arc::new(SnapshotQueue::new());
        let _ = queue.refill_with(|| {
            (0..5)
                .map(|x| Chunk::new(ChunkCoord::new(x, 0)).snapshot(WorldId(0)))
                .collect()
        });
        let scheduler = BatchScheduler::new(Arc::clone(&queue), 10, 1, 2);
        assert_eq!(scheduler.drain_batch().len(), 2);
        assert_eq!(scheduler.drain_batch().len(), 2);
        assert_eq!(scheduler.drain_batch().len(), 1);
        assert!(scheduler.drain_batch().is_empty());
    }
}
