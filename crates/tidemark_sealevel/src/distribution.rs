//! # Temperature Distribution
//!
//! Maps a world temperature to a sea-level offset in blocks.

use serde::{Deserialize, Serialize};

use crate::error::{SeaLevelError, SeaLevelResult};

/// Temperature to sea-level-offset mapping.
///
/// Implementations must be pure and finite over the temperatures in use.
pub trait Distribution: Send + Sync {
    /// Sea-level offset at `temperature`.
    fn value(&self, temperature: f64) -> f64;
}

impl<F> Distribution for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn value(&self, temperature: f64) -> f64 {
        self(temperature)
    }
}

/// Raw sample lists as they appear in configuration files.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionModel {
    /// Temperature samples.
    pub temp: Vec<f64>,
    /// Sea-level offset at each temperature sample.
    pub fitness: Vec<f64>,
}

/// Piecewise-linear curve through sampled points.
///
/// Outside the sampled domain the curve holds its end values. A NaN
/// temperature reads as the lowest sample.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleCurve {
    /// (temperature, level) pairs sorted by temperature.
    points: Vec<(f64, f64)>,
}

impl SampleCurve {
    /// Builds a curve from paired samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the lists are empty, differ in length, or contain
    /// non-finite values.
    pub fn new(temperatures: &[f64], levels: &[f64]) -> SeaLevelResult<Self> {
        if temperatures.len() != levels.len() {
            return Err(SeaLevelError::MismatchedDistribution {
                temperatures: temperatures.len(),
                levels: levels.len(),
            });
        }
        if temperatures.is_empty() {
            return Err(SeaLevelError::EmptyDistribution);
        }
        if temperatures.iter().chain(levels).any(|v| !v.is_finite()) {
            return Err(SeaLevelError::NonFiniteDistribution);
        }

        let mut points: Vec<(f64, f64)> =
            temperatures.iter().copied().zip(levels.iter().copied()).collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(Self { points })
    }

    /// Builds a curve from a configuration model.
    ///
    /// # Errors
    ///
    /// See [`SampleCurve::new`].
    pub fn from_model(model: &DistributionModel) -> SeaLevelResult<Self> {
        Self::new(&model.temp, &model.fitness)
    }

    /// Highest sampled temperature.
    #[must_use]
    pub fn max_temperature(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.0)
    }

    /// Lowest sampled temperature.
    #[must_use]
    pub fn min_temperature(&self) -> f64 {
        self.points.first().map_or(0.0, |p| p.0)
    }
}

impl Distribution for SampleCurve {
    fn value(&self, temperature: f64) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return 0.0,
        };
        if temperature.is_nan() || temperature <= first.0 {
            return first.1;
        }
        if temperature >= last.0 {
            return last.1;
        }

        // First sample strictly above the temperature; first.0 < temperature,
        // so never 0.
        let upper = self.points.partition_point(|p| p.0 <= temperature);
        let (t0, v0) = self.points[upper - 1];
        let (t1, v1) = self.points[upper];
        v0 + (v1 - v0) * (temperature - t0) / (t1 - t0)
    }
}
