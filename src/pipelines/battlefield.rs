// src/pipelines/battlefield.rs

//! Battlefield evaluator: sample → normalize → train → evaluate → render.
//!
//! One seeded `WyRand` drives the whole run: first all parameter draws, then
//! the network's initial weights. A fixed config and seed therefore give the
//! same draws and the same starting network on every run; only the
//! simulator's own behaviour can change the outcome.
//!
//! A run that fails before the rendering stage writes no image. A failed
//! image write does not fail the run: everything computed so far comes back
//! in the outcome, with the write error in `BattlefieldOutcome::image`.

use bevy_prng::WyRand;
use log::warn;
use rand_core::SeedableRng;

use crate::config::SurrogateConfig;
use crate::error::{Error, ImageWriteError, Result};
use crate::pipelines::sdk::{Stage, run_stage};
use crate::systems::grid::{self, PredictionGrid};
use crate::systems::normalizer::Normalizer;
use crate::systems::render::{self, RenderStats};
use crate::systems::rprop::Rprop;
use crate::systems::sampler::{self, SampleSet};
use crate::systems::sdk::{ImageSink, Simulator, TrainingHook};
use crate::systems::trainer::{self, FrozenNetwork, TrainingReport};

/// Hooks you can inject into the pipeline.
/// Currently only the training loop accepts them.
#[derive(Default)]
pub struct BattlefieldHooks {
    pub training: Vec<Box<dyn TrainingHook>>,
}

#[derive(Debug)]
pub struct BattlefieldOutcome {
    pub samples: SampleSet,
    pub normalizer: Normalizer,
    pub network: FrozenNetwork,
    pub training: TrainingReport,
    /// Predictions with the samples painted in.
    pub grid: PredictionGrid,
    pub render: RenderStats,
    /// Result of handing the image to the sink.
    pub image: Result<(), ImageWriteError>,
}

/// Full run with battles on the calling thread.
pub fn evaluate_battlefield<S, K>(
    cfg: &SurrogateConfig,
    sim: &S,
    sink: &mut K,
    hooks: BattlefieldHooks,
) -> Result<BattlefieldOutcome>
where
    S: Simulator + ?Sized,
    K: ImageSink + ?Sized,
{
    run_pipeline(cfg, |draws| sampler::sample(draws, sim, cfg.failure_policy), sink, hooks)
}

/// Full run with battles spread over the rayon pool.
#[cfg(feature = "parallel")]
pub fn evaluate_battlefield_parallel<S, K>(
    cfg: &SurrogateConfig,
    sim: &S,
    sink: &mut K,
    hooks: BattlefieldHooks,
) -> Result<BattlefieldOutcome>
where
    S: Simulator + Sync + ?Sized,
    K: ImageSink + ?Sized,
{
    run_pipeline(cfg, |draws| sampler::sample_parallel(draws, sim, cfg.failure_policy), sink, hooks)
}

fn run_pipeline<C, K>(
    cfg: &SurrogateConfig,
    collect: C,
    sink: &mut K,
    mut hooks: BattlefieldHooks,
) -> Result<BattlefieldOutcome>
where
    C: FnOnce(&[(f64, f64)]) -> Result<SampleSet>,
    K: ImageSink + ?Sized,
{
    cfg.validate()?;
    let mut rng = WyRand::from_seed(cfg.seed.to_le_bytes());

    let samples = run_stage(Stage::Sampling, || -> Result<SampleSet> {
        let draws = sampler::draw_params(
            cfg.sample_count,
            &cfg.arena_bounds(),
            &cfg.cooling_bounds(),
            &mut rng,
        );
        let set = collect(&draws)?;
        sampler::log_summary(&set.samples);
        if set.samples.is_empty() {
            return Err(Error::InvalidDataset(format!(
                "all {} battles failed",
                set.skipped.len()
            )));
        }
        Ok(set)
    })?;

    let normalizer = Normalizer::for_samples(
        [cfg.arena_size_max, cfg.cooling_rate_max],
        cfg.output_scale,
        &samples.samples,
    )?;
    let data = normalizer.normalize_all(&samples.samples);

    let (network, training) = run_stage(Stage::Training, || {
        trainer::train(
            &data,
            &cfg.hyper(),
            Rprop::default(),
            &mut rng,
            &mut hooks.training,
            cfg.log_every,
        )
    })?;

    let mut grid = run_stage(Stage::Evaluation, || {
        Ok::<_, Error>(grid::evaluate(&network, cfg.grid()))
    })?;

    let stats = render::overlay_samples(&mut grid, &samples.samples, &normalizer);
    let image = run_stage(Stage::Rendering, || render::write_image(&grid, sink));
    if image.is_err() {
        warn!("image not written; samples, network and grid are kept in the outcome");
    }

    Ok(BattlefieldOutcome { samples, normalizer, network, training, grid, render: stats, image })
}
