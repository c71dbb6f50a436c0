//! Run configuration: every tunable of the pipeline in one value.

use crate::error::ConfigError;
use crate::systems::grid::GridSpec;
use crate::systems::sampler::ParamBounds;
use crate::systems::trainer::Hyper;

/// Network inputs: arena size and gun cooling rate.
pub const NUM_INPUTS: usize = 2;

/// How raw durations are scaled into training targets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OutputScale {
    /// Divide by a fixed constant. Durations above it train as targets > 1.
    Fixed(f64),
    /// Divide by the largest duration observed in the dataset.
    ObservedMax,
}

/// What to do with a battle that fails or reports an invalid duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run with `Error::Simulation`.
    Abort,
    /// Log the failure and leave the draw out of the dataset.
    Skip,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurrogateConfig {
    pub arena_size_max: f64,
    pub cooling_rate_max: f64,
    pub sample_count: usize,
    /// Grid rows (arena size axis).
    pub grid_resolution_1: usize,
    /// Grid columns (cooling rate axis).
    pub grid_resolution_2: usize,
    pub hidden_width: usize,
    pub epoch_count: usize,
    pub seed: u64,
    pub output_scale: OutputScale,
    pub failure_policy: FailurePolicy,
    /// Log the training error at `info` every this many epochs (0 = never).
    pub log_every: usize,
}

impl Default for SurrogateConfig {
    fn default() -> Self {
        Self {
            arena_size_max: 800.0,
            cooling_rate_max: 0.5,
            sample_count: 1000,
            grid_resolution_1: 601,
            grid_resolution_2: 501,
            hidden_width: 50,
            epoch_count: 100_000,
            seed: 15,
            output_scale: OutputScale::Fixed(1000.0),
            failure_policy: FailurePolicy::Skip,
            log_every: 1000,
        }
    }
}

impl SurrogateConfig {
    pub fn arena_bounds(&self) -> ParamBounds {
        ParamBounds::arena_size(self.arena_size_max)
    }

    pub fn cooling_bounds(&self) -> ParamBounds {
        ParamBounds::cooling_rate(self.cooling_rate_max)
    }

    pub fn hyper(&self) -> Hyper {
        Hyper {
            num_inputs: NUM_INPUTS,
            num_hidden: self.hidden_width,
            num_epochs: self.epoch_count,
        }
    }

    pub fn grid(&self) -> GridSpec {
        GridSpec {
            rows: self.grid_resolution_1,
            cols: self.grid_resolution_2,
        }
    }

    /// Fail fast on anything that would waste or break a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arena_bounds().validate()?;
        self.cooling_bounds().validate()?;
        if let OutputScale::Fixed(d) = self.output_scale {
            if !(d.is_finite() && d > 0.0) {
                return Err(ConfigError::NonPositiveDivisor(d));
            }
        }
        if self.sample_count == 0 {
            return Err(ConfigError::ZeroSampleCount);
        }
        if self.grid_resolution_1 == 0 {
            return Err(ConfigError::ZeroGridResolution { axis: 1 });
        }
        if self.grid_resolution_2 == 0 {
            return Err(ConfigError::ZeroGridResolution { axis: 2 });
        }
        if self.hidden_width == 0 {
            return Err(ConfigError::ZeroHiddenWidth);
        }
        if self.epoch_count == 0 {
            return Err(ConfigError::ZeroEpochCount);
        }
        Ok(())
    }
}
