//! # Flow Containment
//!
//! Water spread out of a tagged cell is either cancelled or allowed with the
//! tag carried to the destination. Flow from untagged cells is not ours to
//! judge.
//!
//! Rules, first match wins:
//!
//! 1. override active: allow (the chunk rule still applies when
//!    `override-crosses-chunks` is off)
//! 2. horizontal spread with the source strictly above the sea line and
//!    below the maximum: cancel
//! 3. destination in another chunk: cancel
//! 4. otherwise: allow

use tidemark_voxel::{BlockPos, CellRef, WorldId};

use crate::level::LevelThresholds;
use crate::tags::TagStore;

/// One attempted liquid spread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlowAttempt {
    /// World the spread happens in.
    pub world: WorldId,
    /// Cell the liquid flows out of.
    pub from: BlockPos,
    /// Cell the liquid would flow into.
    pub to: BlockPos,
}

impl FlowAttempt {
    /// Creates an attempt.
    #[must_use]
    pub const fn new(world: WorldId, from: BlockPos, to: BlockPos) -> Self {
        Self { world, from, to }
    }

    /// Source cell.
    #[must_use]
    pub const fn source(&self) -> CellRef {
        CellRef::new(self.world, self.from)
    }

    /// Destination cell.
    #[must_use]
    pub const fn destination(&self) -> CellRef {
        CellRef::new(self.world, self.to)
    }

    /// Returns true if source and destination share an elevation.
    #[must_use]
    pub const fn is_horizontal(&self) -> bool {
        self.from.y == self.to.y
    }

    /// Returns true if source and destination lie in different chunks.
    #[must_use]
    pub fn crosses_chunks(&self) -> bool {
        self.from.chunk() != self.to.chunk()
    }
}

/// What the host should do with a flow attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowDecision {
    /// The source is not tagged; let the host's own rules decide.
    Untracked,
    /// Cancel the spread.
    Cancel,
    /// Let the spread proceed. The destination has been tagged.
    AllowTagged,
}

impl FlowDecision {
    /// Returns true if the host must cancel the spread.
    #[must_use]
    pub const fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancel)
    }
}

/// Containment rules for spread out of tagged cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlowController {
    override_crosses_chunks: bool,
}

impl Default for FlowController {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FlowController {
    /// Creates a controller. `override_crosses_chunks` lets override-mode
    /// spread leave its chunk.
    #[must_use]
    pub const fn new(override_crosses_chunks: bool) -> Self {
        Self {
            override_crosses_chunks,
        }
    }

    /// Whether override-mode spread may leave its chunk.
    #[must_use]
    pub const fn override_crosses_chunks(&self) -> bool {
        self.override_crosses_chunks
    }

    /// Judges spread out of a tagged source.
    ///
    /// `levels` is `None` when the world's thresholds cannot be resolved;
    /// such spread is cancelled outside override mode.
    #[must_use]
    pub fn judge(
        &self,
        attempt: &FlowAttempt,
        levels: Option<&LevelThresholds>,
        override_mode: bool,
    ) -> bool {
        if override_mode {
            return self.override_crosses_chunks || !attempt.crosses_chunks();
        }
        let Some(levels) = levels else {
            return false;
        };
        if attempt.is_horizontal() && levels.is_above_sea_below_max(attempt.from.y) {
            return false;
        }
        !attempt.crosses_chunks()
    }

    /// Handles one attempt against the tag store, tagging the destination
    /// when the spread is allowed.
    pub fn handle<S>(
        &self,
        store: &mut S,
        attempt: &FlowAttempt,
        levels: Option<&LevelThresholds>,
        override_mode: bool,
    ) -> FlowDecision
    where
        S: TagStore + ?Sized,
    {
        if !store.has_tag(attempt.source()) {
            return FlowDecision::Untracked;
        }
        if self.judge(attempt, levels, override_mode) {
            store.set_tag(attempt.destination());
            FlowDecision::AllowTagged
        } else {
            FlowDecision::Cancel
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const LEVELS: LevelThresholds = LevelThresholds {
        base_level: 62,
        delta: 1,
        custom_level: 63,
        max_level: 66,
    };

    #[derive(Default)]
    struct SetStore(HashSet<CellRef>);

    impl TagStore for SetStore {
        fn has_tag(&self, cell: CellRef) -> bool {
            self.0.contains(&cell)
        }
        fn set_tag(&mut self, cell: CellRef) {
            self.0.insert(cell);
        }
        fn clear_tag(&mut self, cell: CellRef) {
            self.0.remove(&cell);
        }
    }

    fn attempt(from: (i32, i32, i32), to: (i32, i32, i32)) -> FlowAttempt {
        FlowAttempt::new(
            WorldId(0),
            BlockPos::new(from.0, from.1, from.2),
            BlockPos::new(to.0, to.1, to.2),
        )
    }

    #[test]
    fn test_horizontal_spread_above_sea_is_cancelled() {
        let flow = FlowController::default();
        assert!(!flow.judge(&attempt((4, 64, 4), (5, 64, 4)), Some(&LEVELS), false));
        assert!(!flow.judge(&attempt((4, 65, 4), (5, 65, 4)), Some(&LEVELS), false));
    }

    #[test]
    fn test_spread_at_sea_line_within_chunk_is_allowed() {
        let flow = FlowController::default();
        assert!(flow.judge(&attempt((4, 63, 4), (5, 63, 4)), Some(&LEVELS), false));
        // Downward spread from the band is not horizontal.
        assert!(flow.judge(&attempt((4, 64, 4), (4, 63, 4)), Some(&LEVELS), false));
    }

    #[test]
    fn test_cross_chunk_spread_is_cancelled() {
        let flow = FlowController::default();
        assert!(!flow.judge(&attempt((15, 62, 4), (16, 62, 4)), Some(&LEVELS), false));
        assert!(!flow.judge(&attempt((0, 62, 4), (-1, 62, 4)), Some(&LEVELS), false));
    }

    #[test]
    fn test_override_allows_everything_by_default() {
        let flow = FlowController::default();
        assert!(flow.override_crosses_chunks());
        assert!(flow.judge(&attempt((4, 64, 4), (5, 64, 4)), Some(&LEVELS), true));
        assert!(flow.judge(&attempt((15, 62, 4), (16, 62, 4)), None, true));
    }

    #[test]
    fn test_override_can_respect_chunk_boundaries() {
        let flow = FlowController::new(false);
        assert!(!flow.override_crosses_chunks());
        assert!(flow.judge(&attempt((4, 64, 4), (5, 64, 4)), None, true));
        assert!(!flow.judge(&attempt((15, 62, 4), (16, 62, 4)), None, true));
    }

    #[test]
    fn test_unknown_levels_cancel() {
        let flow = FlowController::default();
        assert!(!flow.judge(&attempt((4, 62, 4), (4, 61, 4)), None, false));
    }

    #[test]
    fn test_handle_untagged_source_is_untracked() {
        let flow = FlowController::default();
        let mut store = SetStore::default();
        let spread = attempt((4, 63, 4), (5, 63, 4));
        let decision = flow.handle(&mut store, &spread, Some(&LEVELS), false);
        assert_eq!(decision, FlowDecision::Untracked);
        assert!(!store.has_tag(spread.destination()));
    }

    #[test]
    fn test_handle_tags_destination_when_allowed() {
        let flow = FlowController::default();
        let mut store = SetStore::default();
        let spread = attempt((4, 63, 4), (5, 63, 4));
        store.set_tag(spread.source());
        let decision = flow.handle(&mut store, &spread, Some(&LEVELS), false);
        assert_eq!(decision, FlowDecision::AllowTagged);
        assert!(store.has_tag(spread.destination()));

        let blocked = attempt((5, 64, 4), (6, 64, 4));
        store.set_tag(blocked.source());
        let decision = flow.handle(&mut store, &blocked, Some(&LEVELS), false);
        assert_eq!(decision, FlowDecision::Cancel);
        assert!(decision.is_cancelled());
        assert!(!store.has_tag(blocked.destination()));
    }

    #[test]
    fn test_handle_override_allows_band_spread() {
        let flow = FlowController::default();
        let mut store = SetStore::default();
        let spread = attempt((4, 64, 4), (5, 64, 4));
        store.set_tag(spread.source());
        assert_eq!(flow.handle(&mut store, &spread, None, true), FlowDecision::AllowTagged);
        assert!(store.has_tag(spread.destination()));
    }
}
