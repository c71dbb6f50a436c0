//! Error taxonomy for the sampling → training → rendering pipeline.

use thiserror::Error;

/// Invalid tunables. Raised before any simulator call.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} maximum must be finite and positive, got {value}")]
    NonPositiveMaximum { name: &'static str, value: f64 },
    #[error("{name} draws start at {lowest}, below the minimum valid value {min_valid}")]
    BelowMinimum { name: &'static str, lowest: f64, min_valid: f64 },
    #[error("output divisor must be finite and positive, got {0}")]
    NonPositiveDivisor(f64),
    #[error("sample_count must be non-zero")]
    ZeroSampleCount,
    #[error("grid_resolution_{axis} must be non-zero")]
    ZeroGridResolution { axis: usize },
    #[error("hidden_width must be non-zero")]
    ZeroHiddenWidth,
    #[error("epoch_count must be non-zero")]
    ZeroEpochCount,
}

/// A single simulator invocation that did not yield a usable duration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("simulator failed: {0}")]
    Engine(String),
    #[error("battle finished without reporting a duration")]
    NoDuration,
    #[error("invalid duration {0}")]
    InvalidDuration(f64),
    #[error("battle exceeded its time limit")]
    Timeout,
}

#[derive(Debug, Error)]
pub enum ImageWriteError {
    #[error("expected {expected} pixels for a {width}x{height} image, got {actual}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[cfg(feature = "png")]
    #[error(transparent)]
    Encode(#[from] image::ImageError),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("battle {index} failed")]
    Simulation {
        index: usize,
        #[source]
        source: SimulationError,
    },
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
    #[error("training diverged at epoch {epoch} (error {error})")]
    TrainingDivergence { epoch: usize, error: f64 },
    #[error(transparent)]
    ImageWrite(#[from] ImageWriteError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
