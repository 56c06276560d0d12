//! Core value types for the solvers.
//!
//! - `Lit` → a DIMACS-coded literal (variable + polarity)
//! - `Solution` → a complete assignment packed into machine words,
//!   keyed by bit-pattern for deduplication

mod lit;
mod solution;

pub use lit::Lit;
pub use solution::Solution;

/// Unique identifier for a variable, in `1..=num_vars`.
pub type VarId = u32;
