// src/pipelines/mod.rs

// Orchestrations that run several systems in order.

pub mod sdk;
pub use sdk::*;

pub mod battlefield;
pub use battlefield::*;
