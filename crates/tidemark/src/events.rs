//! # Tidemark Event System
//!
//! Two directions of traffic:
//!
//! ```text
//! ┌─────────────┐  WorldEvent (sync)   ┌──────────────────┐
//! │    Host     │─────────────────────>│  SimulationLoop  │
//! │  (physics,  │<─────────────────────│  + SeaLevelRise  │
//! │   players)  │  EventOutcome        └────────┬─────────┘
//! └─────────────┘                               │ EffectEvent
//!                                               v (bounded channel)
//!                                        ┌──────────────┐
//!                                        │  Observers   │
//!                                        └──────────────┘
//! ```
//!
//! World events need an answer before the host proceeds, so they are
//! dispatched inline. Effect notifications are fire-and-forget over a
//! crossbeam channel; a full channel drops them.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tidemark_sealevel::BatchReport;
use tidemark_voxel::{BlockPos, CellRef, Face, WorldId};

/// Grid events the host reports to the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorldEvent {
    /// Something was placed into a cell.
    BlockPlaced {
        /// Cell that was filled.
        cell: CellRef,
    },

    /// A bucket was emptied against a cell face.
    BucketEmptied {
        /// Cell that was clicked.
        clicked: CellRef,
        /// Face that was clicked.
        face: Face,
    },

    /// Liquid is about to spread.
    FlowAttempted {
        /// World of the spread.
        world: WorldId,
        /// Source cell.
        from: BlockPos,
        /// Destination cell.
        to: BlockPos,
    },
}

/// The simulation's answer to a [`WorldEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// The host may carry on.
    Proceed,
    /// The host must cancel the action.
    Cancelled,
}

impl EventOutcome {
    /// Returns true if the action was cancelled.
    #[must_use]
    pub const fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Notifications published by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectEvent {
    /// The snapshot queue was refilled.
    QueueRefilled {
        /// Tick of the refill.
        tick: u64,
        /// Snapshots enqueued.
        added: usize,
    },

    /// A batch of snapshots was applied.
    BatchApplied {
        /// Tick of the batch.
        tick: u64,
        /// What the batch changed.
        report: BatchReport,
    },

    /// Override mode was switched.
    OverrideChanged {
        /// New state.
        enabled: bool,
    },
}

/// Bounded channel for [`EffectEvent`]s.
pub struct EventBus {
    sender: Sender<EffectEvent>,
    receiver: Receiver<EffectEvent>,
}

impl EventBus {
    /// Creates a bus holding at most `capacity` undelivered events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle. Receivers compete for events.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }
}

/// Handle for publishing events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<EffectEvent>,
}

impl EventSender {
    /// Publishes an event without blocking.
    ///
    /// Returns `false` if the event was dropped.
    #[inline]
    pub fn send(&self, event: EffectEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for consuming events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<EffectEvent>,
}

impl EventReceiver {
    /// Takes every pending event.
    #[inline]
    #[must_use]
    pub fn drain(&self) -> Vec<EffectEvent> {
        self.receiver.try_iter().collect()
    }

    /// Takes one event, if any.
    #[inline]
    #[must_use]
    pub fn try_recv(&self) -> Option<EffectEvent> {
        self.receiver.try_recv().ok()
    }

    /// Number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns true if events are pending.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_send_receive() {
        let bus = EventBus::new(8);
        let sender = bus.sender();
        let receiver = bus.receiver();

        assert!(sender.send(EffectEvent::OverrideChanged { enabled: true }));
        assert!(receiver.has_events());
        assert_eq!(
            receiver.try_recv(),
            Some(EffectEvent::OverrideChanged { enabled: true })
        );
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn test_full_channel_drops() {
        let bus = EventBus::new(2);
        let sender = bus.sender();
        for added in 0..2 {
            assert!(sender.send(EffectEvent::QueueRefilled { tick: 0, added }));
        }
        assert!(!sender.send(EffectEvent::QueueRefilled { tick: 0, added: 9 }));

        let events = bus.receiver().drain();
        assert_eq!(events.len(), 2);
        assert_eq!(bus.receiver().pending_count(), 0);
    }

    #[test]
    fn test_outcome_flags() {
        assert!(EventOutcome::Cancelled.is_cancelled());
        assert!(!EventOutcome::Proceed.is_cancelled());
    }
}
