//! # Tidemark Server
//!
//! Headless demo: one overworld with a natural lake, a temperature that
//! swings through a full cycle, and the sea following it.
//!
//! ```bash
//! # Builtin configuration
//! RUST_LOG=info ./tidemark_server
//!
//! # Custom configuration (.json or .toml)
//! RUST_LOG=tidemark_sealevel=debug ./tidemark_server sea_level.toml
//! ```

use std::f64::consts::TAU;
use std::path::Path;

use tidemark::{EffectEvent, SimulationConfig, SimulationLoop, WorldEvent};
use tidemark_sealevel::{ClimateEffect, ClimateTable, SeaLevelConfig};
use tidemark_voxel::{Biome, Block, BlockPos, ChunkCoord, Material, World, WorldId, WorldStore};
use tracing_subscriber::EnvFilter;

const WORLD: WorldId = WorldId(0);
/// World side length in chunks.
const SIDE: i32 = 4;
/// Ticks per temperature cycle.
const CYCLE_TICKS: u64 = 6_000;
const REPORT_EVERY: u64 = 1_200;
const MEAN_TEMPERATURE: f64 = 17.0;
const TEMPERATURE_SWING: f64 = 3.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let loaded = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!("Loading sea-level configuration from {}", path);
            SeaLevelConfig::from_file(Path::new(&path))
        }
        None => SeaLevelConfig::builtin(),
    };

    let mut climate = ClimateTable::new();
    climate.insert(WORLD, MEAN_TEMPERATURE, [ClimateEffect::SeaLevelRise]);
    let mut sim =
        SimulationLoop::from_config(demo_world(), climate, loaded, &SimulationConfig::default());
    let receiver = sim.events();

    tracing::info!(
        "Tidemark server: {} chunks loaded, {} ticks per climate cycle",
        SIDE * SIDE,
        CYCLE_TICKS
    );

    for tick in 0..2 * CYCLE_TICKS {
        sim.climate_mut().set_temperature(WORLD, temperature_at(tick));
        let _ = sim.step();

        for event in receiver.drain() {
            if let EffectEvent::BatchApplied { tick, report } = event {
                tracing::debug!(tick, ?report, "batch");
            }
        }

        if tick % REPORT_EVERY == 0 {
            report(&mut sim, tick);
        }
    }

    tracing::info!("Entering override mode to repair the shoreline");
    let _ = sim.set_override(true);
    sim.run(CYCLE_TICKS / 4);
    let _ = sim.set_override(false);

    let stats = sim.stats();
    tracing::info!(
        "Done: {} ticks, {} batches, {} chunks applied, {} skipped, {} cells changed, slowest tick {}us",
        stats.ticks,
        stats.batches,
        stats.chunks_applied,
        stats.chunks_skipped,
        stats.cells_changed,
        stats.max_tick_us
    );
}

fn temperature_at(tick: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let phase = (tick % CYCLE_TICKS) as f64 / CYCLE_TICKS as f64;
    MEAN_TEMPERATURE + TEMPERATURE_SWING * (phase * TAU).sin()
}

/// Logs the current sea line and probes flow containment just above it.
fn report(sim: &mut SimulationLoop, tick: u64) {
    let Some(levels) = sim
        .effect()
        .and_then(|effect| effect.thresholds(sim.grid(), sim.climate(), WORLD))
    else {
        tracing::info!(tick, "sea-level effect inactive");
        return;
    };

    let probe = BlockPos::new(40, levels.custom_level + 1, 40);
    let outcome = sim.dispatch(WorldEvent::FlowAttempted {
        world: WORLD,
        from: probe,
        to: BlockPos::new(41, probe.y, 40),
    });

    let water_column = (levels.base_level..levels.max_level)
        .filter(|y| {
            let block = sim.grid().world(WORLD).and_then(|w| w.block(BlockPos::new(40, *y, 40)));
            block.is_some_and(|b| b.material == Material::Water)
        })
        .count();

    tracing::info!(
        tick,
        temperature = temperature_at(tick),
        sea = levels.custom_level,
        max = levels.max_level,
        water_column,
        ?outcome,
        "sea level"
    );
}

/// A 4x4-chunk world: a natural lake in the west, flat grassland in the
/// east, and a mountain strip along the southern edge.
fn demo_world() -> WorldStore {
    let mut world = World::new(WORLD, "overworld").with_sea_level(63);
    for cz in 0..SIDE {
        for cx in 0..SIDE {
            let chunk = world.ensure_chunk(ChunkCoord::new(cx, cz));
            chunk.fill_layers(0..1, Block::BEDROCK);
            chunk.fill_layers(1..58, Block::STONE);
            if cx < 2 {
                chunk.fill_layers(58..62, Block::WATER);
            } else {
                chunk.fill_layers(58..61, Block::DIRT);
                chunk.fill_layers(61..62, Block::GRASS);
                for x in (0..16).step_by(3) {
                    let _ = chunk.set_block(x, 62, x, Block::new(Material::ShortGrass));
                }
            }
            if cz == SIDE - 1 {
                chunk.fill_biome(Biome::Mountains);
            }
        }
    }
    world.add_observer(BlockPos::new(32, 64, 32));

    let mut store = WorldStore::new();
    store.insert(world);
    store
}
