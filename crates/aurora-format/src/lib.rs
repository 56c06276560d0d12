//! # aurora-format
//!
//! File format parsing and the compiled formula representation.
//!
//! - **DIMACS CNF**: the standard SAT competition format, read and written
//! - **Formula**: the immutable indexed form both solvers run against

pub mod dimacs;
pub mod formula;

pub use dimacs::DimacsCnf;
pub use formula::Formula;
