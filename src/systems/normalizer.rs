//! Dataset normalizer: raw samples ↔ training pairs in [0, 1].
//!
//! Inputs are divided by their parameter maxima, durations by the output
//! divisor. Nothing is clamped here; clipping only happens at render time.

use log::warn;

use crate::config::OutputScale;
use crate::error::ConfigError;
use crate::systems::sampler::Sample;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedSample {
    pub inputs: [f64; 2],
    pub target: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normalizer {
    maxima: [f64; 2],
    divisor: f64,
}

fn positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

impl Normalizer {
    pub fn new(maxima: [f64; 2], divisor: f64) -> Result<Self, ConfigError> {
        const NAMES: [&str; 2] = ["arena_size", "cooling_rate"];
        for (&name, &value) in NAMES.iter().zip(maxima.iter()) {
            if !positive(value) {
                return Err(ConfigError::NonPositiveMaximum { name, value });
            }
        }
        if !positive(divisor) {
            return Err(ConfigError::NonPositiveDivisor(divisor));
        }
        Ok(Self { maxima, divisor })
    }

    /// Resolve the divisor from `scale`, looking at `samples` if needed.
    pub fn for_samples(
        maxima: [f64; 2],
        scale: OutputScale,
        samples: &[Sample],
    ) -> Result<Self, ConfigError> {
        let divisor = match scale {
            OutputScale::Fixed(d) => d,
            OutputScale::ObservedMax => samples.iter().map(|s| s.duration).fold(0.0, f64::max),
        };
        Self::new(maxima, divisor)
    }

    pub fn maxima(&self) -> [f64; 2] {
        self.maxima
    }

    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    #[inline]
    pub fn normalize(&self, s: &Sample) -> NormalizedSample {
        NormalizedSample {
            inputs: [s.arena_size / self.maxima[0], s.cooling_rate / self.maxima[1]],
            target: self.scale_duration(s.duration),
        }
    }

    #[inline]
    pub fn scale_duration(&self, duration: f64) -> f64 {
        duration / self.divisor
    }

    #[inline]
    pub fn denormalize(&self, n: &NormalizedSample) -> Sample {
        Sample {
            arena_size: n.inputs[0] * self.maxima[0],
            cooling_rate: n.inputs[1] * self.maxima[1],
            duration: n.target * self.divisor,
        }
    }

    /// Normalize a whole dataset. Warns when targets exceed 1.0, which means
    /// the divisor is smaller than the durations the simulator produces.
    pub fn normalize_all(&self, samples: &[Sample]) -> Vec<NormalizedSample> {
        let out: Vec<NormalizedSample> = samples.iter().map(|s| self.normalize(s)).collect();
        let over = out.iter().filter(|n| n.target > 1.0).count();
        if over > 0 {
            warn!(
                "{} of {} durations exceed the divisor {}; their targets train above 1.0",
                over,
                out.len(),
                self.divisor
            );
        }
        out
    }
}
