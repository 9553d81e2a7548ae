//! # Grid Access
//!
//! The capability the effect needs from the world: enumeration, snapshots,
//! and single-cell reads and writes. [`WorldStore`] implements it directly,
//! keeping ownership tags in [`OWNERSHIP_TAG_BIT`] of each block's meta word.

use tidemark_voxel::{
    Block, BlockPos, CellRef, ChunkCoord, ChunkSnapshot, Environment, Material, WorldId,
    WorldStore,
};

use crate::tags::{TagStore, OWNERSHIP_TAG_BIT};

/// Read/write access to the live world grid.
///
/// Missing worlds and unloaded chunks surface as `None` or `false`.
pub trait GridAccess: TagStore {
    /// Every known world.
    fn worlds(&self) -> Vec<WorldId>;
    /// Environment of `world`.
    fn environment(&self, world: WorldId) -> Option<Environment>;
    /// Natural sea level of `world`.
    fn sea_level(&self, world: WorldId) -> Option<i32>;
    /// Loaded chunks of `world` in enumeration order.
    fn loaded_chunks(&self, world: WorldId) -> Vec<ChunkCoord>;
    /// Returns true if `coord` is currently loaded in `world`.
    fn is_loaded(&self, world: WorldId, coord: ChunkCoord) -> bool;
    /// Observer (player) positions in `world`.
    fn observers(&self, world: WorldId) -> Vec<BlockPos>;
    /// Captures a snapshot of a loaded chunk.
    fn snapshot(&self, world: WorldId, coord: ChunkCoord) -> Option<ChunkSnapshot>;
    /// Material of a live cell.
    fn read_cell(&self, cell: CellRef) -> Option<Material>;
    /// Replaces the material of a live cell. Returns false if not loaded.
    fn write_cell(&mut self, cell: CellRef, material: Material) -> bool;
}

impl TagStore for WorldStore {
    fn has_tag(&self, cell: CellRef) -> bool {
        self.block(cell).is_some_and(|b| b.has_meta(OWNERSHIP_TAG_BIT))
    }

    fn set_tag(&mut self, cell: CellRef) {
        if let Some(block) = self.block_mut(cell) {
            block.meta |= OWNERSHIP_TAG_BIT;
        }
    }

    fn clear_tag(&mut self, cell: CellRef) {
        if let Some(block) = self.block_mut(cell) {
            block.meta &= !OWNERSHIP_TAG_BIT;
        }
    }
}

impl GridAccess for WorldStore {
    fn worlds(&self) -> Vec<WorldId> {
        self.ids()
    }

    fn environment(&self, world: WorldId) -> Option<Environment> {
        self.world(world).map(tidemark_voxel::World::environment)
    }

    fn sea_level(&self, world: WorldId) -> Option<i32> {
        self.world(world).map(tidemark_voxel::World::sea_level)
    }

    fn loaded_chunks(&self, world: WorldId) -> Vec<ChunkCoord> {
        self.world(world).map(tidemark_voxel::World::loaded_chunks).unwrap_or_default()
    }

    fn is_loaded(&self, world: WorldId, coord: ChunkCoord) -> bool {
        self.world(world).is_some_and(|w| w.chunk(coord).is_some())
    }

    fn observers(&self, world: WorldId) -> Vec<BlockPos> {
        self.world(world).map(|w| w.observers().to_vec()).unwrap_or_default()
    }

    fn snapshot(&self, world: WorldId, coord: ChunkCoord) -> Option<ChunkSnapshot> {
        self.world(world)?.chunk(coord).map(|c| c.snapshot(world))
    }

    fn read_cell(&self, cell: CellRef) -> Option<Material> {
        self.block(cell).map(|b| b.material)
    }

    fn write_cell(&mut self, cell: CellRef, material: Material) -> bool {
        // Other meta bits belong to other systems; keep them.
        match self.block_mut(cell) {
            Some(block) => {
                *block = Block::with_meta(material, block.meta);
                true
            }
            None => false,
        }
    }
}

/// Orders chunks so those closest to observers come first.
pub trait ObserverOrdering: Send + Sync {
    /// Returns `chunks` sorted by ascending distance to the nearest observer.
    /// Ties keep their input order.
    fn sort_by_proximity(&self, chunks: Vec<ChunkCoord>, observers: &[BlockPos])
        -> Vec<ChunkCoord>;
}

/// Horizontal squared-distance ordering from chunk centres.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProximityOrdering;

impl ObserverOrdering for ProximityOrdering {
    fn sort_by_proximity(
        &self,
        mut chunks: Vec<ChunkCoord>,
        observers: &[BlockPos],
    ) -> Vec<ChunkCoord> {
        if observers.is_empty() {
            return chunks;
        }
        let nearest = |coord: &ChunkCoord| {
            let (cx, cz) = coord.center();
            observers
                .iter()
                .map(|o| {
                    let dx = f64::from(o.x) - cx;
                    let dz = f64::from(o.z) - cz;
                    dx * dx + dz * dz
                })
                .fold(f64::INFINITY, f64::min)
        };
        // Stable, so equal distances keep enumeration order.
        chunks.sort_by(|a, b| nearest(a).total_cmp(&nearest(b)));
        chunks
    }
}
