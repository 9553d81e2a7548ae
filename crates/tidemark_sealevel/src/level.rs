//! # Level Resolver
//!
//! Derives the current sea-level thresholds for a world. Thresholds are
//! never cached: temperature may change between any two calls.

use std::ops::Range;

use crate::distribution::Distribution;

/// Sea-level thresholds at one moment, in block heights.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelThresholds {
    /// Natural sea level, clamped to the configured floor.
    pub base_level: i32,
    /// Current offset from `base_level`; may be negative.
    pub delta: i32,
    /// `base_level + delta`.
    pub custom_level: i32,
    /// Highest level the effect can ever reach (exclusive scan bound).
    pub max_level: i32,
}

impl LevelThresholds {
    /// Elevations the chunk updater scans: `[base_level, max_level)`.
    #[inline]
    #[must_use]
    pub fn scan_range(&self) -> Range<i32> {
        self.base_level..self.max_level
    }

    /// Returns true if `y` lies strictly between the current sea line and the
    /// maximum level.
    #[inline]
    #[must_use]
    pub fn is_above_sea_below_max(&self, y: i32) -> bool {
        y > self.custom_level && y < self.max_level
    }
}

/// Computes [`LevelThresholds`] from world state and a distribution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelResolver {
    base_floor: Option<i32>,
    max_temperature: f64,
}

impl LevelResolver {
    /// Creates a resolver.
    ///
    /// * `base_floor` - administrator minimum for the base level
    /// * `max_temperature` - temperature at which the sea is highest
    #[must_use]
    pub const fn new(base_floor: Option<i32>, max_temperature: f64) -> Self {
        Self {
            base_floor,
            max_temperature,
        }
    }

    /// Configured floor, if any.
    #[must_use]
    pub const fn base_floor(&self) -> Option<i32> {
        self.base_floor
    }

    /// Temperature used for `max_level`.
    #[must_use]
    pub const fn max_temperature(&self) -> f64 {
        self.max_temperature
    }

    /// Resolves thresholds for a world with natural sea level
    /// `world_sea_level` at `temperature`.
    #[must_use]
    pub fn resolve(
        &self,
        world_sea_level: i32,
        temperature: f64,
        distribution: &dyn Distribution,
    ) -> LevelThresholds {
        let natural = world_sea_level - 1;
        let base_level = self.base_floor.map_or(natural, |floor| natural.max(floor));
        let delta = block_offset(distribution.value(temperature));
        let max_offset = block_offset(distribution.value(self.max_temperature));
        LevelThresholds {
            base_level,
            delta,
            custom_level: base_level.saturating_add(delta),
            max_level: base_level.saturating_add(max_offset),
        }
    }
}

/// Truncates a distribution value toward zero to whole blocks.
#[allow(clippy::cast_possible_truncation)]
fn block_offset(value: f64) -> i32 {
    // `as` saturates and maps NaN to 0.
    value.trunc() as i32
}
