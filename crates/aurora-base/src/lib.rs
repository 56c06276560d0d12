//! # aurora-base
//!
//! Core types and utilities shared by the Aurora solvers.
//!
//! This crate provides the foundational building blocks used across all
//! other Aurora crates, including:
//!
//! - **Literals and solutions**: the DIMACS-coded `Lit` type and the
//!   packed-bit `Solution` record
//! - **Error types**: unified error handling across the solvers
//! - **Randomness**: a fast xorshift generator and OS-entropy seeding

pub mod error;
pub mod rng;
pub mod types;

pub use error::{Error, Result};
pub use rng::XorShift64;
pub use types::{Lit, Solution, VarId};
