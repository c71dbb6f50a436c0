pub mod sdk;
pub mod scenario;
pub mod sampler;
pub mod normalizer;
pub mod trainer;
pub mod rprop;
pub mod grid;
pub mod render;
