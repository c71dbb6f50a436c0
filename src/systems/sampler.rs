//! Sampler: draw (arena size, cooling rate) pairs and collect battle durations.
//!
//! Draws and battles are split. `draw_params` consumes the generator for all
//! N samples up front (U1 before U2 per sample), so the parameter sequence is
//! fixed by seed, N and bounds alone. `sample` / `sample_parallel` then run
//! one battle per draw and apply the failure policy.

use log::{info, warn};
use rand_core::RngCore;

use crate::config::FailurePolicy;
use crate::error::{ConfigError, Error, Result, SimulationError};
use crate::mechanics::stoch;
use crate::systems::scenario::Scenario;
use crate::systems::sdk::{Simulator, run_one};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamBounds {
    pub name: &'static str,
    /// Smallest value the engine accepts.
    pub min_valid: f64,
    pub max_range: f64,
    pub offset: f64,
    pub scale: f64,
}

impl ParamBounds {
    /// Arena side in pixels: max * (0.5 + 0.5 U). Engine minimum is 400.
    pub fn arena_size(max_range: f64) -> Self {
        Self { name: "arena_size", min_valid: 400.0, max_range, offset: 0.5, scale: 0.5 }
    }

    /// Gun cooling per turn: max * (0.2 + 0.8 U). Engine minimum is 0.1.
    pub fn cooling_rate(max_range: f64) -> Self {
        Self { name: "cooling_rate", min_valid: 0.1, max_range, offset: 0.2, scale: 0.8 }
    }

    #[inline]
    pub fn draw(&self, u: f64) -> f64 {
        stoch::affine_draw(self.max_range, self.offset, self.scale, u)
    }

    /// Half-open support [lowest, highest) of `draw` over U in [0,1).
    pub fn support(&self) -> (f64, f64) {
        (self.draw(0.0), self.draw(1.0))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_range.is_finite() && self.max_range > 0.0) {
            return Err(ConfigError::NonPositiveMaximum { name: self.name, value: self.max_range });
        }
        let (lowest, _) = self.support();
        if lowest < self.min_valid {
            return Err(ConfigError::BelowMinimum { name: self.name, lowest, min_valid: self.min_valid });
        }
        Ok(())
    }
}

/// One completed battle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub arena_size: f64,
    pub cooling_rate: f64,
    /// Turns until the battle ended.
    pub duration: f64,
}

impl Sample {
    pub fn inputs(&self) -> [f64; 2] {
        [self.arena_size, self.cooling_rate]
    }
}

/// Samples in draw order, plus the draw indices that were skipped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleSet {
    pub samples: Vec<Sample>,
    pub skipped: Vec<usize>,
}

/// Draw `n` parameter pairs, U1 (arena) before U2 (cooling) for each.
pub fn draw_params<R: RngCore + ?Sized>(
    n: usize,
    arena: &ParamBounds,
    cooling: &ParamBounds,
    rng: &mut R,
) -> Vec<(f64, f64)> {
    let mut draws = Vec::with_capacity(n);
    for _ in 0..n {
        let u1 = stoch::uniform01(rng);
        let u2 = stoch::uniform01(rng);
        draws.push((arena.draw(u1), cooling.draw(u2)));
    }
    draws
}

/// Run one battle per draw, in order, on the calling thread.
pub fn sample<S: Simulator + ?Sized>(
    draws: &[(f64, f64)],
    sim: &S,
    policy: FailurePolicy,
) -> Result<SampleSet> {
    let mut set = SampleSet { samples: Vec::with_capacity(draws.len()), skipped: Vec::new() };
    for (index, &draw) in draws.iter().enumerate() {
        let outcome = run_one(sim, &Scenario::for_draw(draw.0, draw.1));
        settle(&mut set, index, draw, outcome, policy)?;
    }
    Ok(set)
}

/// Like `sample`, with battles spread over the rayon pool. Each battle writes
/// only its own index; results come back in draw order.
#[cfg(feature = "parallel")]
pub fn sample_parallel<S: Simulator + Sync + ?Sized>(
    draws: &[(f64, f64)],
    sim: &S,
    policy: FailurePolicy,
) -> Result<SampleSet> {
    use rayon::prelude::*;

    let outcomes: Vec<Result<f64, SimulationError>> = draws
        .par_iter()
        .map(|&(arena, cooling)| run_one(sim, &Scenario::for_draw(arena, cooling)))
        .collect();

    let mut set = SampleSet { samples: Vec::with_capacity(draws.len()), skipped: Vec::new() };
    for (index, (&draw, outcome)) in draws.iter().zip(outcomes).enumerate() {
        settle(&mut set, index, draw, outcome, policy)?;
    }
    Ok(set)
}

fn settle(
    set: &mut SampleSet,
    index: usize,
    (arena_size, cooling_rate): (f64, f64),
    outcome: Result<f64, SimulationError>,
    policy: FailurePolicy,
) -> Result<()> {
    match outcome {
        Ok(duration) => {
            info!("battle {} completed: {} turns", index + 1, duration);
            set.samples.push(Sample { arena_size, cooling_rate, duration });
            Ok(())
        }
        Err(source) => match policy {
            FailurePolicy::Abort => Err(Error::Simulation { index, source }),
            FailurePolicy::Skip => {
                warn!("battle {} skipped: {}", index + 1, source);
                set.skipped.push(index);
                Ok(())
            }
        },
    }
}

/// Log every collected sample.
pub fn log_summary(samples: &[Sample]) {
    info!("data collected: {} battles", samples.len());
    for (i, s) in samples.iter().enumerate() {
        info!(
            "battle {}: arena {:.3} x {:.3}, cooling {:.4}, turns {}",
            i + 1,
            s.arena_size,
            s.arena_size,
            s.cooling_rate,
            s.duration
        );
    }
}
