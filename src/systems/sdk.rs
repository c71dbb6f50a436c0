// src/systems/sdk.rs

//! # Systems SDK
//!
//! Seams between the pipeline systems and the collaborators they drive.
//! Every expensive or environment-specific piece sits behind one of these
//! traits, so the systems themselves stay pure data flow:
//!
//! - **Simulator**: the battle engine. Opaque; the pipeline only needs a
//!   duration per scenario.
//! - **CompletionObserver**: the one capability a simulator receives. It
//!   reports the finished battle's turn count through `record_duration`.
//! - **Optimizer**: moves the network weights from a full-batch gradient and
//!   the epoch error. `systems::rprop::Rprop` is the shipped implementation.
//! - **TrainingHook**: optional observers of the epoch loop (progress bars,
//!   error traces in tests).
//! - **ImageSink**: where the rendered pixels end up.
//!
//! ## Simulator contract
//! `run_battle` must call `record_duration` once the battle is over, or
//! return an error. A battle that returns `Ok(())` without reporting is a
//! `SimulationError::NoDuration`. Reporting several times keeps the last
//! value (one report per finished round). Negative or non-finite durations are
//! rejected, never coerced.
//!
//! `run_battle` takes `&self`: independent invocations must not share mutable
//! state. Implementations that need a timeout enforce it themselves and
//! return `SimulationError::Timeout`.
//!
//! ## Closures
//! `FnSimulator` turns `Fn(&Scenario) -> Result<f64, SimulationError>` into a
//! `Simulator`, which is what tests and cheap stand-ins use.

use crate::error::{ImageWriteError, SimulationError};
use crate::systems::scenario::Scenario;

/// Capability handed to a simulator for the duration of one battle.
pub trait CompletionObserver {
    fn record_duration(&mut self, turns: f64);
}

/// Single-slot result cell, created fresh for every invocation.
#[derive(Clone, Copy, Debug, Default)]
pub struct DurationSlot {
    turns: Option<f64>,
}

impl DurationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded duration, validated.
    pub fn take(self) -> Result<f64, SimulationError> {
        match self.turns {
            None => Err(SimulationError::NoDuration),
            Some(t) if t.is_finite() && t >= 0.0 => Ok(t),
            Some(t) => Err(SimulationError::InvalidDuration(t)),
        }
    }
}

impl CompletionObserver for DurationSlot {
    fn record_duration(&mut self, turns: f64) {
        self.turns = Some(turns);
    }
}

pub trait Simulator {
    fn run_battle(
        &self,
        scenario: &Scenario,
        observer: &mut dyn CompletionObserver,
    ) -> Result<(), SimulationError>;
}

/// Adapter: closure → `Simulator`.
pub struct FnSimulator<F>(pub F);

impl<F> Simulator for FnSimulator<F>
where
    F: Fn(&Scenario) -> Result<f64, SimulationError>,
{
    fn run_battle(
        &self,
        scenario: &Scenario,
        observer: &mut dyn CompletionObserver,
    ) -> Result<(), SimulationError> {
        let turns = (self.0)(scenario)?;
        observer.record_duration(turns);
        Ok(())
    }
}

/// Run one battle and read its duration back out of a fresh slot.
pub fn run_one<S: Simulator + ?Sized>(sim: &S, scenario: &Scenario) -> Result<f64, SimulationError> {
    let mut slot = DurationSlot::new();
    sim.run_battle(scenario, &mut slot)?;
    slot.take()
}

/// Weight update rule driven by a full-batch gradient.
pub trait Optimizer {
    /// `gradients[i]` is dE/dw for `weights[i]`; `error` is the epoch's MSE
    /// measured at the current (pre-update) weights.
    fn step(&mut self, weights: &mut [f64], gradients: &[f64], error: f64);
}

/// Observer of the training loop. Both methods are optional.
pub trait TrainingHook {
    fn on_epoch(&mut self, _epoch: usize, _error: f64) {}
    fn on_finish(&mut self, _epochs: usize, _final_error: f64) {}
}

/// Destination for the rendered image: `pixels` is row-major, `width * height` long.
pub trait ImageSink {
    fn write(&mut self, width: u32, height: u32, pixels: &[[u8; 3]]) -> Result<(), ImageWriteError>;
}
