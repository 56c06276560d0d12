//! Deduplicated solution aggregation.
//!
//! Workers emit solutions into a bounded channel; a dedicated sink thread
//! drains it into a set keyed by assignment bit-pattern. The channel is a
//! `sync_channel`, so a full sink applies backpressure by blocking the
//! producer instead of dropping solutions.

use aurora_base::Solution;
use std::collections::HashSet;
use std::sync::mpsc::{self, SyncSender};
use std::thread::JoinHandle;

/// Sink configuration.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Channel capacity before producers block.
    pub channel_capacity: usize,
    /// Retain at most this many distinct solutions; `None` grows
    /// unboundedly.
    pub retain: Option<usize>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            retain: None,
        }
    }
}

/// What the sink saw over the whole solve.
#[derive(Debug, Clone, Default)]
pub struct SinkReport {
    /// Distinct solutions, in arrival order.
    pub solutions: Vec<Solution>,
    /// Re-emissions of an already-recorded assignment.
    pub duplicates: u64,
    /// Distinct solutions dropped by the retain bound.
    pub overflow: u64,
}

/// The deduplicating solution sink.
pub struct SolutionSink {
    tx: SyncSender<Solution>,
    collector: JoinHandle<SinkReport>,
}

impl SolutionSink {
    /// Spawns the sink thread.
    #[must_use]
    pub fn spawn(config: SinkConfig) -> Self {
        let (tx, rx) = mpsc::sync_channel::<Solution>(config.channel_capacity.max(1));
        let collector = std::thread::Builder::new()
            .name("aurora-sink".to_string())
            .spawn(move || {
                let mut seen: HashSet<Box<[u64]>> = HashSet::new();
                let mut report = SinkReport::default();
                for solution in rx.iter() {
                    if !seen.insert(solution.bits().into()) {
                        report.duplicates += 1;
                        continue;
                    }
                    match config.retain {
                        Some(bound) if report.solutions.len() >= bound => {
                            report.overflow += 1;
                        }
                        _ => report.solutions.push(solution),
                    }
                }
                report
            })
            .expect("failed to spawn sink thread");
        Self { tx, collector }
    }

    /// A producer handle. Every clone must be dropped before
    /// [`SolutionSink::finish`] can return.
    #[must_use]
    pub fn sender(&self) -> SyncSender<Solution> {
        self.tx.clone()
    }

    /// Closes the sink's own producer side and collects the report.
    pub fn finish(self) -> SinkReport {
        drop(self.tx);
        self.collector.join().expect("sink thread panicked")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(values: &[bool], unsat: u32) -> Solution {
        Solution::from_values(values, unsat)
    }

    #[test]
    fn test_dedup_by_bit_pattern() {
        let sink = SolutionSink::spawn(SinkConfig::default());
        let tx = sink.sender();
        tx.send(solution(&[true, false], 0)).unwrap();
        tx.send(solution(&[true, false], 0)).unwrap();
        tx.send(solution(&[false, true], 0)).unwrap();
        drop(tx);
        let report = sink.finish();
        assert_eq!(report.solutions.len(), 2);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.overflow, 0);
    }

    #[test]
    fn test_retain_bound_counts_overflow() {
        let sink = SolutionSink::spawn(SinkConfig {
            channel_capacity: 4,
            retain: Some(2),
        });
        let tx = sink.sender();
        for i in 0..5u8 {
            let values = [i & 1 == 1, i & 2 == 2, i & 4 == 4];
            tx.send(solution(&values, 0)).unwrap();
        }
        drop(tx);
        let report = sink.finish();
        assert_eq!(report.solutions.len(), 2);
        assert_eq!(report.overflow, 3);
    }

    #[test]
    fn test_many_producers() {
        use std::thread;
        let sink = SolutionSink::spawn(SinkConfig {
            channel_capacity: 2,
            retain: None,
        });
        let handles: Vec<_> = (0..4u8)
            .map(|t| {
                let tx = sink.sender();
                thread::spawn(move || {
                    for i in 0..64u8 {
                        let values: Vec<bool> =
                            (0..8).map(|b| (t.wrapping_mul(64) + i) >> b & 1 == 1).collect();
                        tx.send(Solution::from_values(&values, 0)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let report = sink.finish();
        assert_eq!(report.solutions.len(), 256);
    }
}
