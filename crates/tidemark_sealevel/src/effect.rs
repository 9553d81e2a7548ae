//! # Sea-Level Rise Effect
//!
//! Owns the configuration, the snapshot queue and the override switch, and
//! wires them to the host's grid and climate on every tick and hook.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tidemark_voxel::{BlockPos, CellRef, Face, WorldId};

use crate::classifier::{BiomeFilter, MaterialClassifier};
use crate::climate::ClimateEngine;
use crate::config::SeaLevelConfig;
use crate::distribution::{Distribution, SampleCurve};
use crate::error::SeaLevelResult;
use crate::flow::{FlowAttempt, FlowController, FlowDecision};
use crate::grid::{GridAccess, ObserverOrdering, ProximityOrdering};
use crate::level::{LevelResolver, LevelThresholds};
use crate::queue::{collect_snapshots, RefillOutcome, SnapshotBatch, SnapshotQueue};
use crate::scheduler::BatchScheduler;
use crate::tags;
use crate::updater::{ChunkOutcome, ChunkReport, ChunkUpdater};

/// Aggregate result of applying one batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Cell changes summed over every applied snapshot.
    pub cells: ChunkReport,
    /// Snapshots that were scanned.
    pub applied: usize,
    /// Snapshots skipped for transient reasons.
    pub skipped: usize,
}

/// Work done on one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Set when the refill task ran.
    pub refill: Option<RefillOutcome>,
    /// Set when the apply task ran.
    pub batch: Option<BatchReport>,
}

/// The sea-level rise effect.
pub struct SeaLevelRise {
    config: SeaLevelConfig,
    classifier: MaterialClassifier,
    biomes: BiomeFilter,
    resolver: LevelResolver,
    distribution: Box<dyn Distribution>,
    ordering: Box<dyn ObserverOrdering>,
    flow: FlowController,
    scheduler: BatchScheduler,
    override_mode: AtomicBool,
}

impl std::fmt::Debug for SeaLevelRise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeaLevelRise")
            .field("config", &self.config)
            .field("resolver", &self.resolver)
            .field("pending", &self.scheduler.queue().len())
            .field("override", &self.is_override())
            .finish_non_exhaustive()
    }
}

impl SeaLevelRise {
    /// Builds the effect from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: SeaLevelConfig) -> SeaLevelResult<Self> {
        config.validate()?;
        let curve = config.curve()?;
        Ok(Self::with_curve(config, curve))
    }

    /// Parses, validates and builds from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails.
    pub fn from_json_str(json: &str) -> SeaLevelResult<Self> {
        Self::new(SeaLevelConfig::from_json_str(json)?)
    }

    fn with_curve(config: SeaLevelConfig, curve: SampleCurve) -> Self {
        let resolver = LevelResolver::new(config.base_sea_level, curve.max_temperature());
        let scheduler = BatchScheduler::new(
            Arc::new(SnapshotQueue::new()),
            config.queue_ticks,
            config.chunk_ticks,
            config.chunks_per_period,
        );
        Self {
            classifier: MaterialClassifier::new(),
            biomes: BiomeFilter::new(),
            resolver,
            distribution: Box::new(curve),
            ordering: Box::new(ProximityOrdering),
            flow: FlowController::new(config.override_crosses_chunks),
            scheduler,
            override_mode: AtomicBool::new(false),
            config,
        }
    }

    /// Replaces the chunk ordering used on refill.
    #[must_use]
    pub fn with_ordering(mut self, ordering: impl ObserverOrdering + 'static) -> Self {
        self.ordering = Box::new(ordering);
        self
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &SeaLevelConfig {
        &self.config
    }

    /// Shared snapshot queue.
    #[must_use]
    pub fn queue(&self) -> &Arc<SnapshotQueue> {
        self.scheduler.queue()
    }

    /// Returns true if override (repair) mode is active.
    #[must_use]
    pub fn is_override(&self) -> bool {
        self.override_mode.load(Ordering::Acquire)
    }

    /// Switches override mode, returning the previous state.
    pub fn set_override(&self, enabled: bool) -> bool {
        let previous = self.override_mode.swap(enabled, Ordering::AcqRel);
        if previous != enabled {
            tracing::info!(enabled, "sea-level override changed");
        }
        previous
    }

    /// Current thresholds of `world`, or `None` if the world or its climate
    /// is unknown or the temperature is NaN.
    pub fn thresholds<G, C>(&self, grid: &G, climate: &C, world: WorldId) -> Option<LevelThresholds>
    where
        G: GridAccess + ?Sized,
        C: ClimateEngine + ?Sized,
    {
        let sea_level = grid.sea_level(world)?;
        let temperature = climate.climate(world)?.current_temperature();
        if temperature.is_nan() {
            return None;
        }
        Some(self.resolver.resolve(sea_level, temperature, self.distribution.as_ref()))
    }

    /// Snapshots every loaded chunk of every eligible world, but only when
    /// nothing is pending.
    pub fn refill_if_empty<G, C>(&self, grid: &G, climate: &C) -> RefillOutcome
    where
        G: GridAccess + ?Sized,
        C: ClimateEngine + ?Sized,
    {
        let outcome = self
            .queue()
            .refill_with(|| collect_snapshots(grid, climate, self.ordering.as_ref()));
        match outcome {
            RefillOutcome::Refilled { added } => tracing::debug!("Queued {} chunk snapshots", added),
            RefillOutcome::Skipped { pending } => {
                tracing::trace!("Refill skipped, {} snapshots pending", pending);
            }
        }
        outcome
    }

    /// Takes up to `chunks-per-period` snapshots off the queue.
    #[must_use]
    pub fn drain_batch(&self) -> SnapshotBatch {
        self.scheduler.drain_batch()
    }

    /// Applies every snapshot in `batch` to the live grid. Snapshots that
    /// cannot be applied are skipped; the rest of the batch still runs.
    pub fn apply_batch<G, C>(&self, batch: SnapshotBatch, grid: &mut G, climate: &C) -> BatchReport
    where
        G: GridAccess + ?Sized,
        C: ClimateEngine + ?Sized,
    {
        let updater = ChunkUpdater::new(
            &self.classifier,
            &self.biomes,
            &self.resolver,
            self.distribution.as_ref(),
            self.is_override(),
        );
        let mut report = BatchReport::default();
        for snapshot in batch {
            match updater.apply(&snapshot, grid, climate) {
                ChunkOutcome::Applied(cells) => {
                    report.cells.merge(&cells);
                    report.applied += 1;
                }
                ChunkOutcome::Skipped(reason) => {
                    tracing::debug!(%reason, "Skipped chunk snapshot");
                    report.skipped += 1;
                }
            }
        }
        if report.applied + report.skipped > 0 {
            tracing::debug!(
                applied = report.applied,
                skipped = report.skipped,
                flooded = report.cells.flooded,
                drained = report.cells.drained,
                released = report.cells.released,
                "Applied sea-level batch"
            );
        }
        report
    }

    /// Runs whichever periodic tasks are due at `tick`. Refill runs before
    /// apply when both are due.
    pub fn tick<G, C>(&mut self, tick: u64, grid: &mut G, climate: &C) -> TickReport
    where
        G: GridAccess + ?Sized,
        C: ClimateEngine + ?Sized,
    {
        let due = self.scheduler.poll(tick);
        let refill = due.refill.then(|| self.refill_if_empty(&*grid, climate));
        let batch = due.apply.then(|| {
            let batch = self.drain_batch();
            self.apply_batch(batch, grid, climate)
        });
        TickReport { refill, batch }
    }

    /// Host hook: a block was placed at `cell`.
    pub fn on_block_placed<G: GridAccess + ?Sized>(&self, grid: &mut G, cell: CellRef) {
        tags::on_block_placed(grid, cell);
    }

    /// Host hook: a bucket was emptied against `clicked` on `face`.
    pub fn on_bucket_emptied<G: GridAccess + ?Sized>(
        &self,
        grid: &mut G,
        clicked: CellRef,
        face: Face,
    ) {
        tags::on_bucket_emptied(grid, clicked, face);
    }

    /// Host hook: liquid tries to spread from `from` to `to`.
    pub fn on_flow_attempt<G, C>(
        &self,
        grid: &mut G,
        climate: &C,
        world: WorldId,
        from: BlockPos,
        to: BlockPos,
    ) -> FlowDecision
    where
        G: GridAccess + ?Sized,
        C: ClimateEngine + ?Sized,
    {
        let attempt = FlowAttempt::new(world, from, to);
        if !grid.has_tag(attempt.source()) {
            return FlowDecision::Untracked;
        }
        let override_mode = self.is_override();
        let levels = if override_mode {
            None
        } else {
            self.thresholds(&*grid, climate, world)
        };
        self.flow.handle(grid, &attempt, levels.as_ref(), override_mode)
    }
}

#[cfg(test)]
mod tests {
    use tidemark_voxel::{Block, ChunkCoord, Material, World, WorldStore};

    use super::*;
    use crate::climate::{ClimateEffect, ClimateTable};
    use crate::tags::TagStore;

    const CONFIG: &str = r#"{
        "distribution": { "temp": [0, 10], "fitness": [0, 3] },
        "chunk-ticks": 2,
        "chunks-per-period": 1,
        "queue-ticks": 10,
        "base-sea-level": 62
    }"#;

    fn setup(temperature: f64) -> (WorldStore, ClimateTable) {
        let mut world = World::new(WorldId(1), "overworld").with_sea_level(62);
        world.ensure_chunk(ChunkCoord::new(0, 0));
        world.ensure_chunk(ChunkCoord::new(1, 0));
        let mut store = WorldStore::new();
        store.insert(world);
        let mut climate = ClimateTable::new();
        climate.insert(WorldId(1), temperature, [ClimateEffect::SeaLevelRise]);
        (store, climate)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let json = CONFIG.replace("\"chunk-ticks\": 2", "\"chunk-ticks\": 0");
        assert!(SeaLevelRise::from_json_str(&json).is_err());
    }

    #[test]
    fn test_thresholds_follow_temperature() {
        let effect = SeaLevelRise::from_json_str(CONFIG).unwrap();
        let (store, mut climate) = setup(10.0);
        let levels = effect.thresholds(&store, &climate, WorldId(1)).unwrap();
        assert_eq!((levels.base_level, levels.custom_level, levels.max_level), (62, 65, 65));

        climate.set_temperature(WorldId(1), 5.0);
        let levels = effect.thresholds(&store, &climate, WorldId(1)).unwrap();
        assert_eq!(levels.delta, 1);
        assert!(effect.thresholds(&store, &climate, WorldId(9)).is_none());
    }

    #[test]
    fn test_set_override_returns_previous() {
        let effect = SeaLevelRise::from_json_str(CONFIG).unwrap();
        assert!(!effect.set_override(true));
        assert!(effect.is_override());
        assert!(effect.set_override(false));
        assert!(!effect.is_override());
    }

    #[test]
    fn test_tick_schedule() {
        let mut effect = SeaLevelRise::from_json_str(CONFIG).unwrap();
        let (mut store, climate) = setup(0.0);

        let first = effect.tick(0, &mut store, &climate);
        assert_eq!(first.refill, Some(RefillOutcome::Refilled { added: 2 }));
        assert_eq!(first.batch.map(|b| b.applied), Some(1));

        let idle = effect.tick(1, &mut store, &climate);
        assert_eq!(idle, TickReport::default());

        let second = effect.tick(2, &mut store, &climate);
        assert_eq!(second.refill, None);
        assert_eq!(second.batch.map(|b| b.applied), Some(1));
        assert!(effect.queue().is_empty());
    }

    #[test]
    fn test_apply_floods_air_in_warm_world() {
        let effect = SeaLevelRise::from_json_str(CONFIG).unwrap();
        let (mut store, climate) = setup(10.0);
        assert_eq!(effect.refill_if_empty(&store, &climate), RefillOutcome::Refilled { added: 2 });

        let report = effect.apply_batch(effect.drain_batch(), &mut store, &climate);
        assert_eq!(report.applied, 1);
        // 16 x 16 columns, three layers (62, 63, 64).
        assert_eq!(report.cells.flooded, 16 * 16 * 3);

        let cell = CellRef::new(WorldId(1), BlockPos::new(3, 64, 3));
        assert_eq!(store.read_cell(cell), Some(Material::Water));
        assert!(store.has_tag(cell));
    }

    #[test]
    fn test_flow_hook_untracked_without_tag() {
        let effect = SeaLevelRise::from_json_str(CONFIG).unwrap();
        let (mut store, climate) = setup(0.0);
        let from = BlockPos::new(4, 62, 4);
        store.world_mut(WorldId(1)).unwrap().set_block(from, Block::WATER);
        let decision =
            effect.on_flow_attempt(&mut store, &climate, WorldId(1), from, BlockPos::new(5, 62, 4));
        assert_eq!(decision, FlowDecision::Untracked);
    }
}
