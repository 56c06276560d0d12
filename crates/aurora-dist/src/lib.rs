//! # aurora-dist
//!
//! The inter-process distributor: peer ranks each run a full local
//! work-stealing pool; idle ranks steal serialized branches from random
//! peers, and global termination is detected with a circulating
//! white/black token. Rank 0 aggregates and deduplicates all solutions.
//!
//! The message-passing runtime itself stays external; this crate only
//! states the [`Transport`] contract it needs, plus an in-process
//! loopback implementation for tests and single-machine simulation.

pub mod distributor;
pub mod transport;

pub use distributor::solve;
pub use transport::{LocalTransport, Transport};
