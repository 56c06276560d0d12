//! The threaded Walk-SAT runner.
//!
//! Threads are independent kernels over the shared formula; worker `i`
//! derives its generator from `seed ^ i` when a seed was given, and from
//! OS entropy otherwise. Solutions funnel into the deduplicating sink.
//! With a zero cutoff the first solution found anywhere stops every
//! worker through the shared flag.

use crate::kernel::{WalkConfig, WalkSat};
use aurora_base::{Result, Solution};
use aurora_format::Formula;
use aurora_worker::{SinkConfig, SolutionSink};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// What a Walk-SAT run produced.
#[derive(Debug, Clone)]
pub struct WalkReport {
    /// Distinct solutions meeting the target.
    pub solutions: Vec<Solution>,
    /// Flips across all workers.
    pub flips: u64,
    /// Restart rounds across all workers.
    pub restarts: u64,
}

impl WalkReport {
    /// Whether any solution met the target. Reaching the deadline
    /// without one is a normal outcome, not an error.
    #[must_use]
    pub fn found(&self) -> bool {
        !self.solutions.is_empty()
    }
}

/// Runs Walk-SAT over the formula with the given parameters.
pub fn solve(formula: &Arc<Formula>, config: &WalkConfig) -> Result<WalkReport> {
    let threads = config.threads.max(1);
    let stop = Arc::new(AtomicBool::new(false));
    let sink = SolutionSink::spawn(SinkConfig::default());

    tracing::info!(
        num_vars = formula.num_vars(),
        num_clauses = formula.num_clauses(),
        target_unsat = config.target_unsat,
        max_steps = config.max_steps,
        threads,
        "starting Walk-SAT"
    );

    let workers: Vec<_> = (0..threads)
        .map(|id| {
            let seed = if config.seed == 0 {
                0
            } else {
                config.seed ^ id as u64
            };
            let mut kernel = WalkSat::new(Arc::clone(formula), config.clone(), seed);
            let stop = Arc::clone(&stop);
            let emit = sink.sender();
            let first_solution_stops = config.cutoff.is_zero();
            thread::Builder::new()
                .name(format!("aurora-walk-{id}"))
                .spawn(move || {
                    let found = kernel.run(&stop, |solution| {
                        let _ = emit.send(solution);
                    });
                    if found && first_solution_stops {
                        stop.store(true, Ordering::Relaxed);
                    }
                    (kernel.flips(), kernel.restarts())
                })
                .expect("failed to spawn walk thread")
        })
        .collect();

    let mut flips = 0;
    let mut restarts = 0;
    for worker in workers {
        let (f, r) = worker.join().expect("walk thread panicked");
        flips += f;
        restarts += r;
    }

    let report = sink.finish();
    tracing::info!(
        solutions = report.solutions.len(),
        flips,
        restarts,
        "Walk-SAT finished"
    );

    Ok(WalkReport {
        solutions: report.solutions,
        flips,
        restarts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_format::DimacsCnf;

    fn formula(text: &str) -> Arc<Formula> {
        Arc::new(Formula::from_dimacs(&DimacsCnf::parse(text).unwrap()).unwrap())
    }

    #[test]
    fn test_single_thread_finds_solution() {
        let f = formula("p cnf 3 3\n1 2 0\n-1 3 0\n-2 -3 0\n");
        let report = solve(
            &f,
            &WalkConfig {
                max_steps: 10_000,
                seed: 1234,
                ..WalkConfig::default()
            },
        )
        .unwrap();
        assert!(report.found());
        for s in &report.solutions {
            assert_eq!(f.count_unsat(s), 0);
        }
    }

    #[test]
    fn test_multi_thread_stops_on_first_solution() {
        let f = formula("p cnf 2 1\n1 2 0\n");
        let report = solve(
            &f,
            &WalkConfig {
                max_steps: 1000,
                seed: 5,
                threads: 4,
                ..WalkConfig::default()
            },
        )
        .unwrap();
        assert!(report.found());
    }
}
