//! Provider implementations for different decision sources.

pub mod ai;

pub use ai::HeuristicAi;
