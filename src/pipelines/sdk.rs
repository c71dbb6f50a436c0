// src/pipelines/sdk.rs

//! # Pipeline SDK
//!
//! Small glue for running **systems** as ordered stages.
//!
//! A pipeline is strictly sequential: a stage only starts once the previous
//! one has returned, and the first error ends the run. Parallelism, where it
//! exists, lives inside a stage (battles, grid rows), never across stages.
//!
//! `run_stage` brackets a stage with progress banners and its wall time so
//! long runs can be followed from the log.

use std::fmt;
use std::time::Instant;

use log::{error, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Sampling,
    Training,
    Evaluation,
    Rendering,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Sampling => "sampling battles",
            Stage::Training => "training network",
            Stage::Evaluation => "testing network",
            Stage::Rendering => "rendering image",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Run `body` as `stage`, logging start, completion and failure.
pub fn run_stage<T, E, F>(stage: Stage, body: F) -> Result<T, E>
where
    E: fmt::Display,
    F: FnOnce() -> Result<T, E>,
{
    info!("*******************************");
    info!("{stage}...");
    let started = Instant::now();
    match body() {
        Ok(v) => {
            info!("{stage}: completed in {:.2?}", started.elapsed());
            Ok(v)
        }
        Err(e) => {
            error!("{stage}: failed: {e}");
            Err(e)
        }
    }
}
