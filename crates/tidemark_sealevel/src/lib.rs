//! # Tidemark Sea Level
//!
//! Raises and lowers the sea with a world's global temperature by flooding
//! and draining loaded chunks a few at a time.
//!
//! ## Design Principles
//!
//! 1. **Ownership**: every cell the effect floods carries a tag; only tagged
//!    water is ever drained again
//! 2. **Bounded**: at most `chunks-per-period` chunks are touched per batch
//! 3. **Live writes**: snapshots choose the columns, the live grid is what
//!    gets read and written
//! 4. **Reversible**: returning to the original temperature restores the
//!    original water layout
//!
//! ## Core Components
//!
//! - `SeaLevelConfig`: configuration and its JSON/TOML loaders
//! - `SampleCurve`: temperature to level-offset distribution
//! - `LevelResolver`: base, current and maximum sea level of a world
//! - `SnapshotQueue` / `BatchScheduler`: refill and drain tasks
//! - `ChunkUpdater`: the per-cell transition pass
//! - `FlowController`: containment of spread out of tagged water
//! - `SeaLevelRise`: the effect facade hosts talk to
//!
//! ## Example
//!
//! ```rust
//! use tidemark_sealevel::{ClimateEffect, ClimateTable, SeaLevelRise};
//! use tidemark_voxel::{ChunkCoord, World, WorldId, WorldStore};
//!
//! let mut effect = SeaLevelRise::from_json_str(r#"{
//!     "distribution": { "temp": [0, 10], "fitness": [0, 3] },
//!     "chunk-ticks": 1, "chunks-per-period": 4, "queue-ticks": 20
//! }"#).unwrap();
//!
//! let mut world = World::new(WorldId(0), "overworld").with_sea_level(63);
//! world.ensure_chunk(ChunkCoord::new(0, 0));
//! let mut grid = WorldStore::new();
//! grid.insert(world);
//!
//! let mut climate = ClimateTable::new();
//! climate.insert(WorldId(0), 10.0, [ClimateEffect::SeaLevelRise]);
//!
//! let report = effect.tick(0, &mut grid, &climate);
//! assert_eq!(report.batch.map(|b| b.applied), Some(1));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod classifier;
pub mod climate;
pub mod config;
pub mod distribution;
pub mod effect;
pub mod error;
pub mod flow;
pub mod grid;
pub mod level;
pub mod queue;
pub mod scheduler;
pub mod tags;
pub mod updater;

pub use classifier::{BiomeFilter, MaterialCategory, MaterialClassifier};
pub use climate::{ClimateEffect, ClimateEngine, ClimateState, ClimateTable, WorldClimate};
pub use config::{SeaLevelConfig, BUILTIN_SEA_LEVEL_CONFIG};
pub use distribution::{Distribution, DistributionModel, SampleCurve};
pub use effect::{BatchReport, SeaLevelRise, TickReport};
pub use error::{SeaLevelError, SeaLevelResult};
pub use flow::{FlowAttempt, FlowController, FlowDecision};
pub use grid::{GridAccess, ObserverOrdering, ProximityOrdering};
pub use level::{LevelResolver, LevelThresholds};
pub use queue::{collect_snapshots, RefillOutcome, SnapshotBatch, SnapshotQueue};
pub use scheduler::{BatchScheduler, DueTasks, PeriodicTask};
pub use tags::{TagStore, OWNERSHIP_TAG_BIT};
pub use updater::{decide, CellAction, ChunkOutcome, ChunkReport, ChunkUpdater, SkipReason};
