//! # Tidemark
//!
//! Host integration for the sea-level effect: a tick-driven simulation loop
//! over an owned world, synchronous world-event dispatch, and a bounded
//! channel of effect notifications.
//!
//! ## Modules
//!
//! - `events`: world events in, effect notifications out
//! - `game_loop`: the simulation loop and its stats

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod events;
pub mod game_loop;

pub use tidemark_sealevel as sealevel;
pub use tidemark_voxel as voxel;

pub use events::{EffectEvent, EventBus, EventOutcome, EventReceiver, EventSender, WorldEvent};
pub use game_loop::{LoopStats, SimulationConfig, SimulationLoop};
