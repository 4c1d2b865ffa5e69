//! Environment services injected into the engine.

pub mod rng;

pub use rng::{PcgRng, RngOracle, compute_seed};
