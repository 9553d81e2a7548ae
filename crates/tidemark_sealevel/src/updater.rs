//! # Chunk Updater
//!
//! Scans one snapshot's columns between the base and maximum sea level and
//! moves each live cell toward the current sea line.
//!
//! ```text
//! ---------------------------------------------------------------------------
//!  CATEGORY | vs SEA LEVEL | OVERRIDE | ACTION
//! ---------------------------------------------------------------------------
//!  rising   | at/below     |    F     | if delta > 0: water + tag
//!  rising   | above        |    -     | none
//!  falling  |      -       |    T     | unless y == base: air, clear tag
//!  falling  | above        |    F     | if tagged: air, clear tag
//!  falling  | at/below     |    F     | if tagged and delta == 0: air, clear tag
//!  other    |      -       |    -     | clear tag
//! ---------------------------------------------------------------------------
//! ```
//!
//! Untagged water is never drained outside override mode: the tag is the
//! only record of which water the effect created.
//!
//! The snapshot supplies the column biomes; every read and write goes to the
//! live grid.

use tidemark_voxel::{
    BlockPos, CellRef, ChunkCoord, ChunkSnapshot, Material, WorldId, CHUNK_HEIGHT, CHUNK_SIZE,
};

use crate::classifier::{BiomeFilter, MaterialCategory, MaterialClassifier};
use crate::climate::ClimateEngine;
use crate::distribution::Distribution;
use crate::grid::GridAccess;
use crate::level::{LevelResolver, LevelThresholds};

/// What to do with one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellAction {
    /// Turn into water and tag.
    Flood,
    /// Turn into air and clear the tag.
    Drain,
    /// Clear the tag only.
    Release,
    /// Leave untouched.
    Keep,
}

/// Decides the transition for a single cell.
#[must_use]
pub fn decide(
    category: MaterialCategory,
    tagged: bool,
    y: i32,
    levels: &LevelThresholds,
    override_mode: bool,
) -> CellAction {
    match category {
        MaterialCategory::RisingCandidate => {
            if !override_mode && levels.delta > 0 && y <= levels.custom_level {
                CellAction::Flood
            } else {
                CellAction::Keep
            }
        }
        MaterialCategory::FallingCandidate => {
            let repair = override_mode && y != levels.base_level;
            let receded = tagged && (y > levels.custom_level || levels.delta == 0);
            if repair || receded {
                CellAction::Drain
            } else {
                CellAction::Keep
            }
        }
        MaterialCategory::Other if tagged => CellAction::Release,
        MaterialCategory::Other => CellAction::Keep,
    }
}

/// Why a snapshot was not applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The world no longer exists.
    UnknownWorld(WorldId),
    /// The world has no climate state.
    NoClimate(WorldId),
    /// The world's temperature is NaN.
    InvalidTemperature(WorldId),
    /// The chunk was unloaded after the snapshot was taken.
    ChunkUnloaded(ChunkCoord),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownWorld(world) => write!(f, "{world} no longer exists"),
            Self::NoClimate(world) => write!(f, "{world} has no climate"),
            Self::InvalidTemperature(world) => write!(f, "{world} temperature is NaN"),
            Self::ChunkUnloaded(coord) => write!(f, "chunk ({}, {}) unloaded", coord.x, coord.z),
        }
    }
}

/// Cells changed while applying one snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChunkReport {
    /// Cells turned into tagged water.
    pub flooded: u64,
    /// Cells turned back into air.
    pub drained: u64,
    /// Tags released from non-water cells.
    pub released: u64,
}

impl ChunkReport {
    /// Total mutations.
    #[must_use]
    pub const fn changes(&self) -> u64 {
        self.flooded
            .saturating_add(self.drained)
            .saturating_add(self.released)
    }

    /// Adds `other` into `self`, saturating.
    pub fn merge(&mut self, other: &Self) {
        self.flooded = self.flooded.saturating_add(other.flooded);
        self.drained = self.drained.saturating_add(other.drained);
        self.released = self.released.saturating_add(other.released);
    }
}

/// Result of applying one snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// The chunk was scanned.
    Applied(ChunkReport),
    /// The chunk was skipped.
    Skipped(SkipReason),
}

/// Per-snapshot transition pass.
pub struct ChunkUpdater<'a> {
    classifier: &'a MaterialClassifier,
    biomes: &'a BiomeFilter,
    resolver: &'a LevelResolver,
    distribution: &'a dyn Distribution,
    override_mode: bool,
}

impl<'a> ChunkUpdater<'a> {
    /// Creates an updater for one pass.
    #[must_use]
    pub fn new(
        classifier: &'a MaterialClassifier,
        biomes: &'a BiomeFilter,
        resolver: &'a LevelResolver,
        distribution: &'a dyn Distribution,
        override_mode: bool,
    ) -> Self {
        Self {
            classifier,
            biomes,
            resolver,
            distribution,
            override_mode,
        }
    }

    /// Applies one snapshot to the live grid.
    ///
    /// Thresholds are resolved afresh from the world's current temperature.
    pub fn apply<G, C>(&self, snapshot: &ChunkSnapshot, grid: &mut G, climate: &C) -> ChunkOutcome
    where
        G: GridAccess + ?Sized,
        C: ClimateEngine + ?Sized,
    {
        let world = snapshot.world();
        let coord = snapshot.coord();
        let Some(sea_level) = grid.sea_level(world) else {
            return ChunkOutcome::Skipped(SkipReason::UnknownWorld(world));
        };
        let Some(temperature) = climate.climate(world).map(|c| c.current_temperature()) else {
            return ChunkOutcome::Skipped(SkipReason::NoClimate(world));
        };
        if temperature.is_nan() {
            return ChunkOutcome::Skipped(SkipReason::InvalidTemperature(world));
        }
        if !grid.is_loaded(world, coord) {
            return ChunkOutcome::Skipped(SkipReason::ChunkUnloaded(coord));
        }

        let levels = self.resolver.resolve(sea_level, temperature, self.distribution);
        ChunkOutcome::Applied(self.scan(snapshot, grid, &levels))
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    fn scan<G>(&self, snapshot: &ChunkSnapshot, grid: &mut G, levels: &LevelThresholds) -> ChunkReport
    where
        G: GridAccess + ?Sized,
    {
        let world = snapshot.world();
        let coord = snapshot.coord();
        let range = levels.scan_range();
        let y_start = range.start.max(0);
        let y_end = range.end.min(CHUNK_HEIGHT as i32);

        let mut report = ChunkReport::default();
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                if self.biomes.is_unimpacted(snapshot.biome(x, z)) {
                    continue;
                }
                let block_x = coord.world_x() + x as i32;
                let block_z = coord.world_z() + z as i32;
                for y in y_start..y_end {
                    let cell = CellRef::new(world, BlockPos::new(block_x, y, block_z));
                    self.update_cell(grid, cell, levels, &mut report);
                }
            }
        }
        report
    }

    fn update_cell<G>(
        &self,
        grid: &mut G,
        cell: CellRef,
        levels: &LevelThresholds,
        report: &mut ChunkReport,
    ) where
        G: GridAccess + ?Sized,
    {
        // The chunk can vanish mid-scan; unreadable cells are left alone.
        let Some(material) = grid.read_cell(cell) else {
            return;
        };
        let category = self.classifier.classify(material);
        let tagged = grid.has_tag(cell);
        match decide(category, tagged, cell.pos.y, levels, self.override_mode) {
            CellAction::Flood => {
                if grid.write_cell(cell, Material::Water) {
                    grid.set_tag(cell);
                    report.flooded += 1;
                }
            }
            CellAction::Drain => {
                if grid.write_cell(cell, Material::Air) {
                    grid.clear_tag(cell);
                    report.drained += 1;
                }
            }
            CellAction::Release => {
                grid.clear_tag(cell);
                report.released += 1;
            }
            CellAction::Keep => {}
        }
    }
}
