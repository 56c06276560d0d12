//! # aurora-walk
//!
//! Walk-SAT: incomplete, randomized local search with restarts and a
//! wall-clock cutoff. Sound (every emitted assignment meets the unsat
//! target) but never exhaustive and never a proof of unsatisfiability.

pub mod kernel;
pub mod runner;

pub use kernel::{WalkConfig, WalkSat};
pub use runner::{solve, WalkReport};
