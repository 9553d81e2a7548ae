//! # Simulation Loop
//!
//! Owns the world grid, the climate table and the sea-level effect, and
//! advances them one tick at a time:
//!
//! ```text
//! Tick N:
//! ┌──────────────────────────────────────────────────────────────┐
//! │ 1. SeaLevelRise::tick                                        │
//! │    ├─ refill task (every queue-ticks)                        │
//! │    └─ drain + apply task (every chunk-ticks)                 │
//! │ 2. Publish QueueRefilled / BatchApplied                      │
//! │ 3. Record stats                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Host events are handled between ticks through [`SimulationLoop::dispatch`].
//! When the effect failed to configure, the loop still runs and every event
//! proceeds.

use std::time::Instant;

use tidemark_sealevel::{
    ClimateTable, FlowDecision, RefillOutcome, SeaLevelConfig, SeaLevelResult, SeaLevelRise,
    TickReport,
};
use tidemark_voxel::WorldStore;

use crate::events::{EffectEvent, EventBus, EventOutcome, EventReceiver, EventSender, WorldEvent};

/// Configuration for the simulation loop.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Capacity of the notification channel.
    pub event_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            event_capacity: 1024,
        }
    }
}

/// Counters accumulated over the loop's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Ticks executed.
    pub ticks: u64,
    /// Refills that enqueued snapshots.
    pub refills: u64,
    /// Batches applied.
    pub batches: u64,
    /// Snapshots applied.
    pub chunks_applied: u64,
    /// Snapshots skipped.
    pub chunks_skipped: u64,
    /// Cells flooded, drained or released.
    pub cells_changed: u64,
    /// Flow attempts cancelled.
    pub flows_cancelled: u64,
    /// Notifications dropped on a full channel.
    pub events_dropped: u64,
    /// Slowest tick observed, in microseconds.
    pub max_tick_us: u64,
}

/// Drives the sea-level effect against an owned world.
pub struct SimulationLoop {
    grid: WorldStore,
    climate: ClimateTable,
    effect: Option<SeaLevelRise>,
    events: EventBus,
    sender: EventSender,
    tick: u64,
    stats: LoopStats,
}

impl SimulationLoop {
    /// Creates a loop around an already built effect.
    #[must_use]
    pub fn new(
        grid: WorldStore,
        climate: ClimateTable,
        effect: Option<SeaLevelRise>,
        config: &SimulationConfig,
    ) -> Self {
        let events = EventBus::new(config.event_capacity);
        let sender = events.sender();
        Self {
            grid,
            climate,
            effect,
            events,
            sender,
            tick: 0,
            stats: LoopStats::default(),
        }
    }

    /// Creates a loop from a configuration load result. A rejected
    /// configuration disables the effect.
    #[must_use]
    pub fn from_config(
        grid: WorldStore,
        climate: ClimateTable,
        loaded: SeaLevelResult<SeaLevelConfig>,
        config: &SimulationConfig,
    ) -> Self {
        let effect = match loaded.and_then(SeaLevelRise::new) {
            Ok(effect) => {
                tracing::info!("Sea-level effect enabled: {:?}", effect.config());
                Some(effect)
            }
            Err(error) => {
                tracing::warn!(%error, "Sea-level effect disabled");
                None
            }
        };
        Self::new(grid, climate, effect, config)
    }

    /// The effect, if it is enabled.
    #[must_use]
    pub fn effect(&self) -> Option<&SeaLevelRise> {
        self.effect.as_ref()
    }

    /// The world grid.
    #[must_use]
    pub fn grid(&self) -> &WorldStore {
        &self.grid
    }

    /// Mutable access to the world grid.
    pub fn grid_mut(&mut self) -> &mut WorldStore {
        &mut self.grid
    }

    /// The climate table.
    #[must_use]
    pub fn climate(&self) -> &ClimateTable {
        &self.climate
    }

    /// Mutable access to the climate table.
    pub fn climate_mut(&mut self) -> &mut ClimateTable {
        &mut self.climate
    }

    /// Next tick to run.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Accumulated counters.
    #[must_use]
    pub const fn stats(&self) -> LoopStats {
        self.stats
    }

    /// A receiver for effect notifications.
    #[must_use]
    pub fn events(&self) -> EventReceiver {
        self.events.receiver()
    }

    /// Runs one tick. Returns `None` when the effect is disabled.
    pub fn step(&mut self) -> Option<TickReport> {
        let tick = self.tick;
        self.tick += 1;
        self.stats.ticks += 1;

        let effect = self.effect.as_mut()?;
        let start = Instant::now();
        let report = effect.tick(tick, &mut self.grid, &self.climate);
        let elapsed = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.stats.max_tick_us = self.stats.max_tick_us.max(elapsed);

        if let Some(RefillOutcome::Refilled { added }) = report.refill {
            self.stats.refills += 1;
            self.publish(EffectEvent::QueueRefilled { tick, added });
        }
        if let Some(batch) = report.batch {
            self.stats.chunks_applied += batch.applied as u64;
            self.stats.chunks_skipped += batch.skipped as u64;
            self.stats.cells_changed =
                self.stats.cells_changed.saturating_add(batch.cells.changes());
            if batch.applied + batch.skipped > 0 {
                self.stats.batches += 1;
                self.publish(EffectEvent::BatchApplied { tick, report: batch });
            }
        }
        Some(report)
    }

    /// Runs `count` ticks.
    pub fn run(&mut self, count: u64) {
        for _ in 0..count {
            let _ = self.step();
        }
    }

    /// Switches override mode and publishes the change. Returns false when
    /// the effect is disabled.
    pub fn set_override(&mut self, enabled: bool) -> bool {
        let Some(effect) = self.effect.as_ref() else {
            return false;
        };
        if effect.set_override(enabled) != enabled {
            self.publish(EffectEvent::OverrideChanged { enabled });
        }
        true
    }

    /// Handles a host event and tells the host whether to go on.
    pub fn dispatch(&mut self, event: WorldEvent) -> EventOutcome {
        let Some(effect) = self.effect.as_ref() else {
            return EventOutcome::Proceed;
        };
        match event {
            WorldEvent::BlockPlaced { cell } => {
                effect.on_block_placed(&mut self.grid, cell);
                EventOutcome::Proceed
            }
            WorldEvent::BucketEmptied { clicked, face } => {
                effect.on_bucket_emptied(&mut self.grid, clicked, face);
                EventOutcome::Proceed
            }
            WorldEvent::FlowAttempted { world, from, to } => {
                match effect.on_flow_attempt(&mut self.grid, &self.climate, world, from, to) {
                    FlowDecision::Cancel => {
                        self.stats.flows_cancelled += 1;
                        EventOutcome::Cancelled
                    }
                    FlowDecision::Untracked | FlowDecision::AllowTagged => EventOutcome::Proceed,
                }
            }
        }
    }

    fn publish(&mut self, event: EffectEvent) {
        if !self.sender.send(event) {
            self.stats.events_dropped += 1;
            tracing::debug!("Dropped effect event {:?}", event);
        }
    }
}

#[cfg(test)]
mod tests {
    use tidemark_sealevel::{ClimateEffect, SeaLevelError};
    use tidemark_voxel::{ChunkCoord, World, WorldId};

    use super::*;

    fn world() -> (WorldStore, ClimateTable) {
        let mut world = World::new(WorldId(0), "overworld");
        world.ensure_chunk(ChunkCoord::new(0, 0));
        let mut grid = WorldStore::new();
        grid.insert(world);
        let mut climate = ClimateTable::new();
        climate.insert(WorldId(0), 14.0, [ClimateEffect::SeaLevelRise]);
        (grid, climate)
    }

    #[test]
    fn test_rejected_config_disables_effect() {
        let (grid, climate) = world();
        let mut sim = SimulationLoop::from_config(
            grid,
            climate,
            Err(SeaLevelError::InvalidConfig("nope".into())),
            &SimulationConfig::default(),
        );
        assert!(sim.effect().is_none());
        assert!(sim.step().is_none());
        assert_eq!(sim.current_tick(), 1);
        assert!(!sim.set_override(true));
    }

    #[test]
    fn test_first_tick_refills_and_applies() {
        let (grid, climate) = world();
        let mut sim = SimulationLoop::from_config(
            grid,
            climate,
            SeaLevelConfig::builtin(),
            &SimulationConfig::default(),
        );
        let receiver = sim.events();
        let report = sim.step().unwrap();
        assert_eq!(report.refill, Some(RefillOutcome::Refilled { added: 1 }));

        let events = receiver.drain();
        assert_eq!(events[0], EffectEvent::QueueRefilled { tick: 0, added: 1 });
        assert!(matches!(events[1], EffectEvent::BatchApplied { tick: 0, .. }));
        assert_eq!(sim.stats().batches, 1);
    }

    #[test]
    fn test_override_change_is_published_once() {
        let (grid, climate) = world();
        let mut sim = SimulationLoop::from_config(
            grid,
            climate,
            SeaLevelConfig::builtin(),
            &SimulationConfig::default(),
        );
        let receiver = sim.events();
        assert!(sim.set_override(true));
        assert!(sim.set_override(true));
        assert_eq!(receiver.drain(), vec![EffectEvent::OverrideChanged { enabled: true }]);
    }

    #[test]
    fn test_full_channel_counts_drops() {
        let (grid, climate) = world();
        let mut sim = SimulationLoop::from_config(
            grid,
            climate,
            SeaLevelConfig::builtin(),
            &SimulationConfig { event_capacity: 1 },
        );
        let _ = sim.step();
        assert_eq!(sim.stats().events_dropped, 1);
    }
}
