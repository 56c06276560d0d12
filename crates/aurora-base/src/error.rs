//! Unified error types for Aurora.

use thiserror::Error;

/// The main error type for Aurora operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed DIMACS or other input.
    #[error("parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A retain bound or buffer capacity was exceeded.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Unrecoverable communication failure in the distributed solver.
    #[error("transport error: {0}")]
    Transport(String),

    /// Cooperative stop; partial results are still available.
    #[error("solve cancelled")]
    Cancelled,

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal solver error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
