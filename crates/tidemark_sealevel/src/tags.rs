//! # Ownership Tags
//!
//! One boolean per cell: "this water was put here, or is kept here, by the
//! sea-level effect". Untagged water is natural and is never drained.
//!
//! Tags are cleared when the effect reverts a cell, when something is
//! placed in a cell, when a bucket is emptied next to it, and when the
//! updater finds a tag on a cell that is neither air-like nor water-like.

use tidemark_voxel::{CellRef, Face};

/// Bit of the block meta word that holds the ownership tag.
pub const OWNERSHIP_TAG_BIT: u16 = 1 << 15;

/// Storage for ownership tags.
///
/// Operations on cells that are not loaded are no-ops.
pub trait TagStore {
    /// Returns true if `cell` carries the tag.
    fn has_tag(&self, cell: CellRef) -> bool;
    /// Tags `cell`.
    fn set_tag(&mut self, cell: CellRef);
    /// Removes the tag from `cell`.
    fn clear_tag(&mut self, cell: CellRef);
}

/// Something was placed at `cell`.
pub fn on_block_placed<S: TagStore + ?Sized>(store: &mut S, cell: CellRef) {
    store.clear_tag(cell);
}

/// A bucket was emptied against `clicked` on `face`; the cell in front of
/// that face is the one that changed.
pub fn on_bucket_emptied<S: TagStore + ?Sized>(store: &mut S, clicked: CellRef, face: Face) {
    store.clear_tag(clicked.relative(face));
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use tidemark_voxel::{BlockPos, WorldId};

    use super::*;

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

    fn cell(x: i32, y: i32, z: i32) -> CellRef {
        CellRef::new(WorldId(0), BlockPos::new(x, y, z))
    }

    #[test]
    fn test_placement_clears_placed_cell() {
        let mut store = SetStore::default();
        store.set_tag(cell(1, 62, 1));
        store.set_tag(cell(2, 62, 1));
        on_block_placed(&mut store, cell(1, 62, 1));
        assert!(!store.has_tag(cell(1, 62, 1)));
        assert!(store.has_tag(cell(2, 62, 1)));
    }

    #[test]
    fn test_bucket_clears_adjacent_cell_only() {
        let mut store = SetStore::default();
        store.set_tag(cell(5, 63, 5));
        store.set_tag(cell(5, 64, 5));
        on_bucket_emptied(&mut store, cell(5, 63, 5), Face::Up);
        assert!(store.has_tag(cell(5, 63, 5)));
        assert!(!store.has_tag(cell(5, 64, 5)));
    }
}
