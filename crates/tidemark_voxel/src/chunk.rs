//! # Chunk System
//!
//! World data is organized into fixed-size chunks so that only loaded
//! regions cost memory and so that work can be scheduled one chunk at a time.
//!
//! ## Chunk Format
//!
//! Chunks are 16x16x256 blocks (width x depth x height). Each column also
//! carries a [`Biome`].
//!
//! ## Snapshots
//!
//! [`Chunk::snapshot`] copies materials and biomes into an immutable
//! [`ChunkSnapshot`]. Per-cell metadata is not captured: it
//! lives on the live grid only.

use crate::biome::Biome;
use crate::material::{Block, Material};
use crate::world::WorldId;

/// Chunk width/depth in blocks.
pub const CHUNK_SIZE: usize = 16;

/// Chunk height in blocks.
pub const CHUNK_HEIGHT: usize = 256;

/// Total blocks per chunk.
pub const BLOCKS_PER_CHUNK: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_HEIGHT;

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Z coordinate (in chunks, not blocks).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Converts world block coordinates to chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn from_block_pos(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x.div_euclid(CHUNK_SIZE as i32),
            z: block_z.div_euclid(CHUNK_SIZE as i32),
        }
    }

    /// Returns the world X coordinate of the chunk's origin (corner).
    #[inline]
    #[must_use]
    pub const fn world_x(self) -> i32 {
        self.x * CHUNK_SIZE as i32
    }

    /// Returns the world Z coordinate of the chunk's origin.
    #[inline]
    #[must_use]
    pub const fn world_z(self) -> i32 {
        self.z * CHUNK_SIZE as i32
    }

    /// Returns the horizontal centre of the chunk in world space.
    #[inline]
    #[must_use]
    pub fn center(self) -> (f64, f64) {
        let half = CHUNK_SIZE as f64 / 2.0;
        (f64::from(self.world_x()) + half, f64::from(self.world_z()) + half)
    }
}

/// One of the six block faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// +Y
    Up,
    /// -Y
    Down,
    /// -Z
    North,
    /// +Z
    South,
    /// +X
    East,
    /// -X
    West,
}

impl Face {
    /// Unit offset (dx, dy, dz) of this face.
    #[must_use]
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Self::Up => (0, 1, 0),
            Self::Down => (0, -1, 0),
            Self::North => (0, 0, -1),
            Self::South => (0, 0, 1),
            Self::East => (1, 0, 0),
            Self::West => (-1, 0, 0),
        }
    }
}

/// Absolute block position in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos {
    /// World X.
    pub x: i32,
    /// World Y (height).
    pub y: i32,
    /// World Z.
    pub z: i32,
}

impl BlockPos {
    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Chunk that contains this position.
    #[inline]
    #[must_use]
    pub const fn chunk(self) -> ChunkCoord {
        ChunkCoord::from_block_pos(self.x, self.z)
    }

    /// Position relative to the containing chunk, or `None` when `y` lies
    /// outside the chunk height.
    #[inline]
    #[must_use]
    pub const fn local(self) -> Option<(usize, usize, usize)> {
        if self.y < 0 || self.y >= CHUNK_HEIGHT as i32 {
            return None;
        }
        Some((
            self.x.rem_euclid(CHUNK_SIZE as i32) as usize,
            self.y as usize,
            self.z.rem_euclid(CHUNK_SIZE as i32) as usize,
        ))
    }

    /// The neighbouring position across `face`.
    #[inline]
    #[must_use]
    pub const fn relative(self, face: Face) -> Self {
        let (dx, dy, dz) = face.offset();
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

/// A block position qualified by the world it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    /// Owning world.
    pub world: WorldId,
    /// Position inside that world.
    pub pos: BlockPos,
}

impl CellRef {
    /// Creates a new cell reference.
    #[inline]
    #[must_use]
    pub const fn new(world: WorldId, pos: BlockPos) -> Self {
        Self { world, pos }
    }

    /// The neighbouring cell across `face`.
    #[inline]
    #[must_use]
    pub const fn relative(self, face: Face) -> Self {
        Self::new(self.world, self.pos.relative(face))
    }
}

#[inline]
const fn block_index(x: usize, y: usize, z: usize) -> usize {
    (y * CHUNK_SIZE + z) * CHUNK_SIZE + x
}

/// A chunk of world data.
///
/// Contains a 16x16x256 grid of blocks plus per-column biomes.
#[derive(Clone)]
pub struct Chunk {
    /// Chunk position in the world.
    pub coord: ChunkCoord,
    /// Block data, indexed by `block_index`.
    blocks: Box<[Block]>,
    /// Biome data for each column (indexed as [z][x]).
    biomes: [[Biome; CHUNK_SIZE]; CHUNK_SIZE],
}

impl Chunk {
    /// Creates a new empty chunk at the given coordinates.
    #[must_use]
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            blocks: vec![Block::AIR; BLOCKS_PER_CHUNK].into_boxed_slice(),
            biomes: [[Biome::Plains; CHUNK_SIZE]; CHUNK_SIZE],
        }
    }

    /// Gets a block at local coordinates. Out-of-range reads return air.
    ///
    /// # Arguments
    ///
    /// * `x` - Local X (0-15)
    /// * `y` - Y level (0-255)
    /// * `z` - Local Z (0-15)
    #[inline]
    #[must_use]
    pub fn get_block(&self, x: usize, y: usize, z: usize) -> Block {
        if x < CHUNK_SIZE && y < CHUNK_HEIGHT && z < CHUNK_SIZE {
            self.blocks[block_index(x, y, z)]
        } else {
            Block::AIR
        }
    }

    /// Sets a block at local coordinates. Out-of-range writes are ignored.
    ///
    /// Returns true if the block was written.
    #[inline]
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, block: Block) -> bool {
        if x < CHUNK_SIZE && y < CHUNK_HEIGHT && z < CHUNK_SIZE {
            self.blocks[block_index(x, y, z)] = block;
            true
        } else {
            false
        }
    }

    /// Mutable access to a block at local coordinates.
    #[inline]
    pub fn block_mut(&mut self, x: usize, y: usize, z: usize) -> Option<&mut Block> {
        if x < CHUNK_SIZE && y < CHUNK_HEIGHT && z < CHUNK_SIZE {
            Some(&mut self.blocks[block_index(x, y, z)])
        } else {
            None
        }
    }

    /// Gets the biome at a local column.
    #[inline]
    #[must_use]
    pub fn get_biome(&self, x: usize, z: usize) -> Biome {
        if x < CHUNK_SIZE && z < CHUNK_SIZE {
            self.biomes[z][x]
        } else {
            Biome::Plains
        }
    }

    /// Sets the biome at a local column.
    #[inline]
    pub fn set_biome(&mut self, x: usize, z: usize, biome: Biome) {
        if x < CHUNK_SIZE && z < CHUNK_SIZE {
            self.biomes[z][x] = biome;
        }
    }

    /// Fills every column with `biome`.
    pub fn fill_biome(&mut self, biome: Biome) {
        self.biomes = [[biome; CHUNK_SIZE]; CHUNK_SIZE];
    }

    /// Fills the layers `y_range` of every column with `block`.
    pub fn fill_layers(&mut self, y_range: std::ops::Range<usize>, block: Block) {
        for y in y_range.start..y_range.end.min(CHUNK_HEIGHT) {
            for z in 0..CHUNK_SIZE {
                for x in 0..CHUNK_SIZE {
                    self.blocks[block_index(x, y, z)] = block;
                }
            }
        }
    }

    /// Captures materials and biomes into an immutable snapshot.
    #[must_use]
    pub fn snapshot(&self, world: WorldId) -> ChunkSnapshot {
        ChunkSnapshot {
            world,
            coord: self.coord,
            materials: self.blocks.iter().map(|b| b.material).collect(),
            biomes: self.biomes,
        }
    }
}

/// Immutable point-in-time copy of one chunk's materials and biomes.
///
/// Consumed once by whoever dequeues it, then dropped.
#[derive(Clone)]
pub struct ChunkSnapshot {
    world: WorldId,
    coord: ChunkCoord,
    materials: Box<[Material]>,
    biomes: [[Biome; CHUNK_SIZE]; CHUNK_SIZE],
}

impl ChunkSnapshot {
    /// World the chunk belonged to at capture time.
    #[inline]
    #[must_use]
    pub const fn world(&self) -> WorldId {
        self.world
    }

    /// Captured chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Biome of a local column at capture time.
    #[inline]
    #[must_use]
    pub fn biome(&self, x: usize, z: usize) -> Biome {
        if x < CHUNK_SIZE && z < CHUNK_SIZE {
            self.biomes[z][x]
        } else {
            Biome::Plains
        }
    }

    /// Material at local coordinates at capture time.
    #[inline]
    #[must_use]
    pub fn material(&self, x: usize, y: usize, z: usize) -> Material {
        if x < CHUNK_SIZE && y < CHUNK_HEIGHT && z < CHUNK_SIZE {
            self.materials[block_index(x, y, z)]
        } else {
            Material::Air
        }
    }
}

impl std::fmt::Debug for ChunkSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkSnapshot")
            .field("world", &self.world)
            .field("coord", &self.coord)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_coord_from_block() {
        assert_eq!(ChunkCoord::from_block_pos(0, 0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_block_pos(15, 15), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_block_pos(16, 16), ChunkCoord::new(1, 1));
        assert_eq!(ChunkCoord::from_block_pos(-1, -1), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_block_pos(-16, -16), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_block_pos(-17, -17), ChunkCoord::new(-2, -2));
    }

    #[test]
    fn test_block_pos_local() {
        assert_eq!(BlockPos::new(-1, 64, 17).local(), Some((15, 64, 1)));
        assert_eq!(BlockPos::new(3, -1, 3).local(), None);
        assert_eq!(BlockPos::new(3, 256, 3).local(), None);
    }

    #[test]
    fn test_relative_crosses_chunk_edge() {
        let edge = BlockPos::new(15, 70, 0);
        assert_eq!(edge.chunk(), ChunkCoord::new(0, 0));
        assert_eq!(edge.relative(Face::East).chunk(), ChunkCoord::new(1, 0));
        assert_eq!(edge.relative(Face::North).chunk(), ChunkCoord::new(0, -1));
        assert_eq!(edge.relative(Face::Up), BlockPos::new(15, 71, 0));
    }

    #[test]
    fn test_snapshot_is_detached_from_live_chunk() {
        let mut chunk = Chunk::new(ChunkCoord::new(2, -3));
        chunk.set_block(1, 62, 1, Block::with_meta(Material::Water, 0x8000));
        chunk.set_biome(1, 1, Biome::River);

        let snapshot = chunk.snapshot(WorldId(7));
        chunk.set_block(1, 62, 1, Block::AIR);
        chunk.set_biome(1, 1, Biome::Plains);

        assert_eq!(snapshot.world(), WorldId(7));
        assert_eq!(snapshot.coord(), ChunkCoord::new(2, -3));
        assert_eq!(snapshot.material(1, 62, 1), Material::Water);
        assert_eq!(snapshot.biome(1, 1), Biome::River);
        assert_eq!(chunk.get_biome(1, 1), Biome::Plains);
    }

    #[test]
    fn test_fill_biome_covers_every_column() {
        let mut chunk = Chunk::new(ChunkCoord::default());
        chunk.fill_biome(Biome::WoodedHills);
        assert_eq!(chunk.get_biome(0, 0), Biome::WoodedHills);
        assert_eq!(chunk.get_biome(15, 15), Biome::WoodedHills);
        assert_eq!(chunk.get_biome(16, 0), Biome::Plains);
    }

    #[test]
    fn test_fill_layers_clamps_to_height() {
        let mut chunk = Chunk::new(ChunkCoord::default());
        chunk.fill_layers(250..300, Block::STONE);
        assert_eq!(chunk.get_block(0, 255, 0), Block::STONE);
        assert_eq!(chunk.get_block(0, 249, 0), Block::AIR);
        assert!(!chunk.set_block(0, 256, 0, Block::STONE));
    }
}
