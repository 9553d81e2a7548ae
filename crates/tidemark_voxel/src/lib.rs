//! # Tidemark Voxel Grid
//!
//! Chunked voxel world model shared by the simulation crates.
//!
//! ## Core Components
//!
//! - `Material` / `Block`: cell contents plus a per-cell metadata word
//! - `Biome`: per-column terrain classification
//! - `Chunk` / `ChunkCoord`: fixed-size 16x16x256 regions
//! - `ChunkSnapshot`: immutable copy of a chunk's materials and biomes
//! - `WorldStore`: every loaded world, addressed by `WorldId`
//!
//! ## Example
//!
//! ```rust
//! use tidemark_voxel::{Block, BlockPos, ChunkCoord, World, WorldId, WorldStore};
//!
//! let mut world = World::new(WorldId(0), "overworld").with_sea_level(62);
//! world.ensure_chunk(ChunkCoord::new(0, 0));
//! assert!(world.set_block(BlockPos::new(3, 61, 3), Block::WATER));
//!
//! let mut store = WorldStore::new();
//! store.insert(world);
//! assert_eq!(store.ids(), vec![WorldId(0)]);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod chunk;
pub mod material;
pub mod world;

pub use biome::Biome;
pub use chunk::{
    BlockPos, CellRef, Chunk, ChunkCoord, ChunkSnapshot, Face, BLOCKS_PER_CHUNK, CHUNK_HEIGHT,
    CHUNK_SIZE,
};
pub use material::{Block, Material};
pub use world::{Environment, World, WorldId, WorldStore};
