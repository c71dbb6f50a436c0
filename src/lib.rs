/*!
`battle_surrogate`: a cheap stand-in for an expensive battle simulator.

What it does
- Samples (arena size, gun cooling rate) pairs from a seeded generator and
  runs one battle per pair through an opaque `Simulator`, recording how many
  turns each battle lasted.
- Normalizes the dataset into [0,1] and fits a `2 → hidden → 1` sigmoid
  network to it with resilient propagation.
- Evaluates the fitted network over a dense grid of the parameter space and
  renders it as a grayscale image, with the measured battles painted on top.

How to use (call surface only)
- Implement `Simulator` for your engine (or wrap a closure in `FnSimulator`);
  it reports each battle's duration through the `CompletionObserver` it is
  handed.
- Pick an `ImageSink` (`PngSink`, `BufferSink`, or your own).
- Call `evaluate_battlefield(&SurrogateConfig::default(), &sim, &mut sink,
  BattlefieldHooks::default())`.

What it does NOT do
- No battle engine, no model persistence, no UI beyond the image.
*/

pub mod config;
pub mod error;
pub mod mechanics;
pub mod pipelines;
pub mod systems;

pub use config::{FailurePolicy, NUM_INPUTS, OutputScale, SurrogateConfig};
pub use error::{ConfigError, Error, ImageWriteError, Result, SimulationError};
pub use pipelines::battlefield::{BattlefieldHooks, BattlefieldOutcome, evaluate_battlefield};
#[cfg(feature = "parallel")]
pub use pipelines::battlefield::evaluate_battlefield_parallel;
pub use systems::render::BufferSink;
#[cfg(feature = "png")]
pub use systems::render::PngSink;
pub use systems::sdk::{CompletionObserver, FnSimulator, ImageSink, Simulator, TrainingHook};
