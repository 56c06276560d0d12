//! # aurora-worker
//!
//! Intra-process scheduling for the DPLL enumerator:
//!
//! - per-worker work-stealing deques (owner LIFO, thieves FIFO)
//! - a generic worker pool with quiescence detection and a cooperative
//!   stop flag
//! - the deduplicating, backpressured solution sink

pub mod deque;
pub mod pool;
pub mod sink;

pub use deque::StealDeque;
pub use pool::{Scope, WorkHandler, WorkerPool};
pub use sink::{SinkConfig, SinkReport, SolutionSink};

/// Resolves a thread-count argument: `0` means implementation-chosen.
#[must_use]
pub fn resolve_threads(requested: usize) -> usize {
    if requested > 0 {
        return requested;
    }
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(4)
}
