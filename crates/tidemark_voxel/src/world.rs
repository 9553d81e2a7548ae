//! # World Store
//!
//! In-memory collection of worlds, each a sparse map of loaded chunks.
//!
//! Chunks are kept in a `BTreeMap`, so enumeration order is deterministic
//! (ascending `(x, z)`), which callers rely on as a tie-breaker.

use std::collections::BTreeMap;

use crate::chunk::{BlockPos, CellRef, Chunk, ChunkCoord};
use crate::material::Block;

/// Identifier of a world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldId(pub u32);

impl std::fmt::Display for WorldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "world#{}", self.0)
    }
}

/// Dimension type of a world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    /// Standard surface world with a sea.
    #[default]
    Overworld,
    /// Underworld.
    Nether,
    /// Void islands.
    End,
}

/// A single world: metadata plus its loaded chunks.
#[derive(Clone)]
pub struct World {
    id: WorldId,
    name: String,
    environment: Environment,
    sea_level: i32,
    chunks: BTreeMap<ChunkCoord, Chunk>,
    observers: Vec<BlockPos>,
}

impl World {
    /// Default sea level.
    pub const DEFAULT_SEA_LEVEL: i32 = 63;

    /// Creates an empty overworld.
    #[must_use]
    pub fn new(id: WorldId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            environment: Environment::Overworld,
            sea_level: Self::DEFAULT_SEA_LEVEL,
            chunks: BTreeMap::new(),
            observers: Vec::new(),
        }
    }

    /// Sets the environment.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Sets the sea level.
    #[must_use]
    pub fn with_sea_level(mut self, level: i32) -> Self {
        self.sea_level = level;
        self
    }

    /// World identifier.
    #[must_use]
    pub const fn id(&self) -> WorldId {
        self.id
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Environment of this world.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Natural sea level of this world.
    #[must_use]
    pub const fn sea_level(&self) -> i32 {
        self.sea_level
    }

    /// Loads (or replaces) a chunk.
    pub fn load_chunk(&mut self, chunk: Chunk) {
        self.chunks.insert(chunk.coord, chunk);
    }

    /// Returns the chunk at `coord`, loading an empty one if absent.
    pub fn ensure_chunk(&mut self, coord: ChunkCoord) -> &mut Chunk {
        self.chunks.entry(coord).or_insert_with(|| Chunk::new(coord))
    }

    /// Unloads a chunk, returning it if it was loaded.
    pub fn unload_chunk(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.chunks.remove(&coord)
    }

    /// Returns the loaded chunk at `coord`.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Returns the loaded chunk at `coord` mutably.
    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// Coordinates of every loaded chunk in enumeration order.
    #[must_use]
    pub fn loaded_chunks(&self) -> Vec<ChunkCoord> {
        self.chunks.keys().copied().collect()
    }

    /// Number of loaded chunks.
    #[must_use]
    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Reads a block. `None` if the chunk is not loaded or `y` is out of range.
    #[must_use]
    pub fn block(&self, pos: BlockPos) -> Option<Block> {
        let (x, y, z) = pos.local()?;
        self.chunks.get(&pos.chunk()).map(|c| c.get_block(x, y, z))
    }

    /// Mutable access to a block. `None` if the chunk is not loaded or `y` is
    /// out of range.
    pub fn block_mut(&mut self, pos: BlockPos) -> Option<&mut Block> {
        let (x, y, z) = pos.local()?;
        self.chunks.get_mut(&pos.chunk())?.block_mut(x, y, z)
    }

    /// Writes a block. Returns false if the chunk is not loaded.
    pub fn set_block(&mut self, pos: BlockPos, block: Block) -> bool {
        let Some((x, y, z)) = pos.local() else {
            return false;
        };
        self.chunks
            .get_mut(&pos.chunk())
            .is_some_and(|c| c.set_block(x, y, z, block))
    }

    /// Registers an observer (a player) at `pos`.
    pub fn add_observer(&mut self, pos: BlockPos) {
        self.observers.push(pos);
    }

    /// Removes every observer.
    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    /// Current observer positions.
    #[must_use]
    pub fn observers(&self) -> &[BlockPos] {
        &self.observers
    }
}

/// All worlds known to the host.
#[derive(Clone, Default)]
pub struct WorldStore {
    worlds: BTreeMap<WorldId, World>,
}

impl WorldStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) a world.
    pub fn insert(&mut self, world: World) {
        self.worlds.insert(world.id(), world);
    }

    /// Removes a world.
    pub fn remove(&mut self, id: WorldId) -> Option<World> {
        self.worlds.remove(&id)
    }

    /// Looks up a world.
    #[must_use]
    pub fn world(&self, id: WorldId) -> Option<&World> {
        self.worlds.get(&id)
    }

    /// Looks up a world mutably.
    pub fn world_mut(&mut self, id: WorldId) -> Option<&mut World> {
        self.worlds.get_mut(&id)
    }

    /// Identifiers of all worlds, ascending.
    #[must_use]
    pub fn ids(&self) -> Vec<WorldId> {
        self.worlds.keys().copied().collect()
    }

    /// Reads a block anywhere in the store.
    #[must_use]
    pub fn block(&self, cell: CellRef) -> Option<Block> {
        self.worlds.get(&cell.world)?.block(cell.pos)
    }

    /// Mutable access to a block anywhere in the store.
    pub fn block_mut(&mut self, cell: CellRef) -> Option<&mut Block> {
        self.worlds.get_mut(&cell.world)?.block_mut(cell.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;

    fn store_with_chunk() -> WorldStore {
        let mut world = World::new(WorldId(1), "overworld").with_sea_level(62);
        world.ensure_chunk(ChunkCoord::new(0, 0));
        let mut store = WorldStore::new();
        store.insert(world);
        store
    }

    #[test]
    fn test_block_access_requires_loaded_chunk() {
        let mut store = store_with_chunk();
        let inside = CellRef::new(WorldId(1), BlockPos::new(4, 62, 4));
        let outside = CellRef::new(WorldId(1), BlockPos::new(40, 62, 4));

        assert_eq!(store.block(inside), Some(Block::AIR));
        assert_eq!(store.block(outside), None);

        *store.block_mut(inside).unwrap() = Block::WATER;
        assert_eq!(store.block(inside).map(|b| b.material), Some(Material::Water));
        assert!(store.block_mut(outside).is_none());
    }

    #[test]
    fn test_unknown_world_reads_none() {
        let store = store_with_chunk();
        let cell = CellRef::new(WorldId(9), BlockPos::new(0, 62, 0));
        assert_eq!(store.block(cell), None);
    }

    #[test]
    fn test_loaded_chunks_enumerate_in_coordinate_order() {
        let mut world = World::new(WorldId(1), "w");
        world.ensure_chunk(ChunkCoord::new(2, 0));
        world.ensure_chunk(ChunkCoord::new(-1, 5));
        world.ensure_chunk(ChunkCoord::new(0, 0));
        assert_eq!(
            world.loaded_chunks(),
            vec![ChunkCoord::new(-1, 5), ChunkCoord::new(0, 0), ChunkCoord::new(2, 0)]
        );
        assert!(world.unload_chunk(ChunkCoord::new(0, 0)).is_some());
        assert_eq!(world.loaded_chunk_count(), 2);
        assert!(!world.set_block(BlockPos::new(1, 1, 1), Block::STONE));
    }

    #[test]
    fn test_observers_register_and_clear() {
        let mut world = World::new(WorldId(1), "w");
        world.add_observer(BlockPos::new(8, 64, 8));
        world.add_observer(BlockPos::new(-40, 70, 3));
        assert_eq!(world.observers().len(), 2);
        world.clear_observers();
        assert!(world.observers().is_empty());
    }
}
