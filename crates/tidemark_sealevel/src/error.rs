//! # Sea-Level Error Types
//!
//! Only configuration problems are errors. World-state inconsistencies met
//! while processing (unloaded chunks, unknown worlds) are reported as skips.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating the sea-level effect.
#[derive(Error, Debug)]
pub enum SeaLevelError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The distribution has no samples.
    #[error("distribution has no samples")]
    EmptyDistribution,

    /// Temperature and level sample lists differ in length.
    #[error("distribution has {temperatures} temperatures but {levels} levels")]
    MismatchedDistribution {
        /// Number of temperature samples.
        temperatures: usize,
        /// Number of level samples.
        levels: usize,
    },

    /// A distribution sample is NaN or infinite.
    #[error("distribution contains a non-finite sample")]
    NonFiniteDistribution,

    /// JSON configuration failed to parse.
    #[error("failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration failed to parse.
    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("failed to read configuration from {path:?}: {source}")]
    ReadFailed {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Configuration file extension is neither `.json` nor `.toml`.
    #[error("unsupported configuration format: {0:?}")]
    UnsupportedFormat(PathBuf),
}

/// Result type for sea-level operations.
pub type SeaLevelResult<T> = Result<T, SeaLevelError>;
