//! The transport contract and the in-process loopback.

use aurora_base::{Error, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Barrier, Mutex};

/// What the distributor requires of a message-passing runtime.
///
/// Reliable point-to-point delivery, a non-blocking send, a polled
/// receive, and a collective barrier. Ordering between any pair of ranks
/// need not be preserved beyond what the distributor itself tags.
pub trait Transport: Send {
    /// This process's rank, in `0..world_size`.
    fn rank(&self) -> usize;

    /// Number of cooperating ranks.
    fn world_size(&self) -> usize;

    /// Sends a byte buffer to a peer without blocking.
    fn send(&self, to: usize, bytes: Vec<u8>) -> Result<()>;

    /// Polls for the next delivered buffer, with its sender.
    fn try_recv(&self) -> Result<Option<(usize, Vec<u8>)>>;

    /// Blocks until every rank reaches the barrier.
    fn barrier(&self) -> Result<()>;
}

struct Hub {
    mailboxes: Vec<Mutex<VecDeque<(usize, Vec<u8>)>>>,
    barrier: Barrier,
}

/// Loopback transport: every rank is a thread in one process.
///
/// Used by the distributor tests and the CLI's `--ranks` simulation
/// mode; a production deployment supplies its own [`Transport`] over a
/// real launcher.
pub struct LocalTransport {
    hub: Arc<Hub>,
    rank: usize,
}

impl LocalTransport {
    /// Creates one connected endpoint per rank.
    #[must_use]
    pub fn create(world_size: usize) -> Vec<Self> {
        assert!(world_size > 0);
        let hub = Arc::new(Hub {
            mailboxes: (0..world_size)
                .map(|_| Mutex::new(VecDeque::new()))
                .collect(),
            barrier: Barrier::new(world_size),
        });
        (0..world_size)
            .map(|rank| Self {
                hub: Arc::clone(&hub),
                rank,
            })
            .collect()
    }
}

impl Transport for LocalTransport {
    fn rank(&self) -> usize {
        self.rank
    }

    fn world_size(&self) -> usize {
        self.hub.mailboxes.len()
    }

    fn send(&self, to: usize, bytes: Vec<u8>) -> Result<()> {
        let mailbox = self
            .hub
            .mailboxes
            .get(to)
            .ok_or_else(|| Error::Transport(format!("no such rank: {to}")))?;
        mailbox.lock().unwrap().push_back((self.rank, bytes));
        Ok(())
    }

    fn try_recv(&self) -> Result<Option<(usize, Vec<u8>)>> {
        Ok(self.hub.mailboxes[self.rank].lock().unwrap().pop_front())
    }

    fn barrier(&self) -> Result<()> {
        self.hub.barrier.wait();
        Ok(())
    }
}
