//! # Climate Collaborators
//!
//! The climate engine owns temperatures and per-world effect switches. The
//! sea-level effect only reads them.

use std::collections::{HashMap, HashSet};

use tidemark_voxel::WorldId;

/// Climate effects a world can enable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ClimateEffect {
    /// Sea level follows temperature.
    SeaLevelRise,
}

/// Climate state of a single world.
pub trait WorldClimate {
    /// Current global temperature of the world.
    fn current_temperature(&self) -> f64;
    /// Returns true if `effect` is enabled in this world.
    fn is_effect_enabled(&self, effect: ClimateEffect) -> bool;
}

/// Lookup of per-world climate state.
pub trait ClimateEngine {
    /// Climate of `world`, or `None` if the world has no climate engine.
    fn climate(&self, world: WorldId) -> Option<&dyn WorldClimate>;
}

/// Plain per-world climate record.
#[derive(Clone, Debug, Default)]
pub struct ClimateState {
    /// Current temperature.
    pub temperature: f64,
    /// Enabled effects.
    pub enabled: HashSet<ClimateEffect>,
}

impl WorldClimate for ClimateState {
    fn current_temperature(&self) -> f64 {
        self.temperature
    }

    fn is_effect_enabled(&self, effect: ClimateEffect) -> bool {
        self.enabled.contains(&effect)
    }
}

/// Table of [`ClimateState`] keyed by world.
#[derive(Clone, Debug, Default)]
pub struct ClimateTable {
    worlds: HashMap<WorldId, ClimateState>,
}

impl ClimateTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `world` at `temperature` with `effects` enabled.
    pub fn insert(
        &mut self,
        world: WorldId,
        temperature: f64,
        effects: impl IntoIterator<Item = ClimateEffect>,
    ) {
        self.worlds.insert(
            world,
            ClimateState {
                temperature,
                enabled: effects.into_iter().collect(),
            },
        );
    }

    /// Sets the temperature of a registered world. Returns false if unknown.
    pub fn set_temperature(&mut self, world: WorldId, temperature: f64) -> bool {
        let Some(state) = self.worlds.get_mut(&world) else {
            return false;
        };
        state.temperature = temperature;
        true
    }

    /// Enables or disables an effect. Returns false if the world is unknown.
    pub fn set_enabled(&mut self, world: WorldId, effect: ClimateEffect, enabled: bool) -> bool {
        let Some(state) = self.worlds.get_mut(&world) else {
            return false;
        };
        if enabled {
            state.enabled.insert(effect);
        } else {
            state.enabled.remove(&effect);
        }
        true
    }
}

impl ClimateEngine for ClimateTable {
    fn climate(&self, world: WorldId) -> Option<&dyn WorldClimate> {
        self.worlds.get(&world).map(|s| s as &dyn WorldClimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookup_and_updates() {
        let mut table = ClimateTable::new();
        table.insert(WorldId(1), 14.5, [ClimateEffect::SeaLevelRise]);

        let climate = table.climate(WorldId(1)).unwrap();
        assert_eq!(climate.current_temperature(), 14.5);
        assert!(climate.is_effect_enabled(ClimateEffect::SeaLevelRise));

        assert!(table.set_temperature(WorldId(1), 20.0));
        assert!(table.set_enabled(WorldId(1), ClimateEffect::SeaLevelRise, false));
        let climate = table.climate(WorldId(1)).unwrap();
        assert_eq!(climate.current_temperature(), 20.0);
        assert!(!climate.is_effect_enabled(ClimateEffect::SeaLevelRise));

        assert!(table.climate(WorldId(2)).is_none());
        assert!(!table.set_temperature(WorldId(2), 1.0));
    }
}
