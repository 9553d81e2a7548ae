//! # Sea-Level Configuration
//!
//! Loaded once at startup. A configuration that fails to parse or validate
//! disables the whole effect; there is no partial operation.
//!
//! ```json
//! {
//!   "distribution": { "temp": [0, 10], "fitness": [0, 3] },
//!   "chunk-ticks": 20,
//!   "chunks-per-period": 4,
//!   "queue-ticks": 600,
//!   "base-sea-level": 62
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::distribution::{DistributionModel, SampleCurve};
use crate::error::{SeaLevelError, SeaLevelResult};

/// Configuration shipped with the crate.
pub const BUILTIN_SEA_LEVEL_CONFIG: &str = include_str!("../data/sea_level.json");

/// Sea-level effect configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SeaLevelConfig {
    /// Temperature to sea-level-offset samples.
    pub distribution: DistributionModel,
    /// Ticks between batch applications.
    pub chunk_ticks: u32,
    /// Maximum snapshots processed per batch.
    pub chunks_per_period: usize,
    /// Ticks between queue refill attempts.
    pub queue_ticks: u32,
    /// Minimum base sea level. Absent means no floor.
    #[serde(default)]
    pub base_sea_level: Option<i32>,
    /// Whether override mode also lets tagged water cross chunk boundaries.
    #[serde(default = "default_override_crosses_chunks")]
    pub override_crosses_chunks: bool,
}

const fn default_override_crosses_chunks() -> bool {
    true
}

impl SeaLevelConfig {
    /// Parses and validates the builtin configuration.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded file is malformed.
    pub fn builtin() -> SeaLevelResult<Self> {
        Self::from_json_str(BUILTIN_SEA_LEVEL_CONFIG)
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails.
    pub fn from_json_str(json: &str) -> SeaLevelResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails.
    pub fn from_toml_str(source: &str) -> SeaLevelResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unknown
    /// extension, or fails to parse or validate.
    pub fn from_file(path: &Path) -> SeaLevelResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| SeaLevelError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            Some("toml") => Self::from_toml_str(&contents),
            _ => Err(SeaLevelError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Checks ranges and the distribution samples.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> SeaLevelResult<()> {
        if self.chunk_ticks == 0 {
            return Err(SeaLevelError::InvalidConfig("chunk-ticks must be positive".into()));
        }
        if self.queue_ticks == 0 {
            return Err(SeaLevelError::InvalidConfig("queue-ticks must be positive".into()));
        }
        if self.chunks_per_period == 0 {
            return Err(SeaLevelError::InvalidConfig(
                "chunks-per-period must be positive".into(),
            ));
        }
        SampleCurve::from_model(&self.distribution)?;
        Ok(())
    }

    /// Builds the distribution curve.
    ///
    /// # Errors
    ///
    /// Returns an error if the samples are malformed.
    pub fn curve(&self) -> SeaLevelResult<SampleCurve> {
        SampleCurve::from_model(&self.distribution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "distribution": { "temp": [0, 5, 10], "fitness": [0, 1, 3] },
        "chunk-ticks": 20,
        "chunks-per-period": 4,
        "queue-ticks": 600,
        "base-sea-level": 62
    }"#;

    #[test]
    fn test_parses_original_json_keys() {
        let config = SeaLevelConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.chunk_ticks, 20);
        assert_eq!(config.chunks_per_period, 4);
        assert_eq!(config.queue_ticks, 600);
        assert_eq!(config.base_sea_level, Some(62));
        assert!(config.override_crosses_chunks);
        assert_eq!(config.curve().unwrap().max_temperature(), 10.0);
    }

    #[test]
    fn test_base_sea_level_is_optional() {
        let json = r#"{
            "distribution": { "temp": [0], "fitness": [0] },
            "chunk-ticks": 1, "chunks-per-period": 1, "queue-ticks": 1,
            "override-crosses-chunks": false
        }"#;
        let config = SeaLevelConfig::from_json_str(json).unwrap();
        assert_eq!(config.base_sea_level, None);
        assert!(!config.override_crosses_chunks);
    }

    #[test]
    fn test_parses_toml() {
        let source = r#"
            chunk-ticks = 10
            chunks-per-period = 2
            queue-ticks = 100

            [distribution]
            temp = [0.0, 10.0]
            fitness = [0.0, 3.0]
        "#;
        let config = SeaLevelConfig::from_toml_str(source).unwrap();
        assert_eq!(config.chunks_per_period, 2);
        assert_eq!(config.distribution.fitness, vec![0.0, 3.0]);
    }

    #[test]
    fn test_rejects_missing_keys() {
        let json = r#"{ "distribution": { "temp": [0], "fitness": [0] } }"#;
        assert!(matches!(
            SeaLevelConfig::from_json_str(json),
            Err(SeaLevelError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_zero_batch() {
        let json = SAMPLE.replace("\"chunks-per-period\": 4", "\"chunks-per-period\": 0");
        assert!(matches!(
            SeaLevelConfig::from_json_str(&json),
            Err(SeaLevelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_distribution() {
        let json = SAMPLE.replace("\"fitness\": [0, 1, 3]", "\"fitness\": [0, 1]");
        assert!(matches!(
            SeaLevelConfig::from_json_str(&json),
            Err(SeaLevelError::MismatchedDistribution { .. })
        ));
    }

    #[test]
    fn test_builtin_is_valid() {
        let config = SeaLevelConfig::builtin().unwrap();
        assert!(config.chunks_per_period > 0);
    }

    #[test]
    fn test_from_file_rejects_unknown_extension() {
        let path = std::env::temp_dir().join("tidemark_sea_level_config.yaml");
        std::fs::write(&path, SAMPLE).unwrap();
        assert!(matches!(
            SeaLevelConfig::from_file(&path),
            Err(SeaLevelError::UnsupportedFormat(_))
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_from_file_reads_json() {
        let path = std::env::temp_dir().join("tidemark_sea_level_config_test.json");
        std::fs::write(&path, SAMPLE).unwrap();
        let config = SeaLevelConfig::from_file(&path).unwrap();
        assert_eq!(config.queue_ticks, 600);
        std::fs::remove_file(&path).ok();
    }
}
