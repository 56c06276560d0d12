//! The user-facing parallel enumerator.

use crate::frontier::WorkItem;
use crate::propagate::PropStatus;
use crate::search::SearchContext;
use aurora_base::{Lit, Result, Solution};
use aurora_format::Formula;
use aurora_worker::{
    resolve_threads, Scope, SinkConfig, SolutionSink, WorkHandler, WorkerPool,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::SyncSender;
use std::sync::Arc;

/// Configuration for the DPLL enumerator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DpllConfig {
    /// Emit every assignment falsifying at most this many clauses.
    pub max_unsat: u32,
    /// Worker threads; `0` picks the hardware parallelism.
    pub threads: usize,
    /// Retain at most this many distinct solutions.
    pub max_solutions: Option<usize>,
    /// Stop early once this many solutions were emitted.
    pub stop_after: Option<u64>,
}

impl Default for DpllConfig {
    fn default() -> Self {
        Self {
            max_unsat: 0,
            threads: 0,
            max_solutions: None,
            stop_after: None,
        }
    }
}

/// Shared solver statistics, updated with relaxed atomics on the hot
/// path.
#[derive(Debug, Default)]
pub struct SearchStats {
    decisions: AtomicU64,
    propagations: AtomicU64,
    conflicts: AtomicU64,
    solutions: AtomicU64,
}

impl SearchStats {
    pub(crate) fn record_decision(&self) {
        self.decisions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_propagation(&self) {
        self.propagations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_conflict(&self) {
        self.conflicts.fetch_add(1, Ordering::Relaxed);
    }

    fn record_solution(&self) -> u64 {
        self.solutions.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// A plain-value copy for reporting.
    #[must_use]
    pub fn snapshot(&self) -> DpllStats {
        DpllStats {
            decisions: self.decisions.load(Ordering::Relaxed),
            propagations: self.propagations.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
            solutions: self.solutions.load(Ordering::Relaxed),
        }
    }
}

/// Solver statistics at the end of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DpllStats {
    /// Branch decisions made.
    pub decisions: u64,
    /// Literals propagated.
    pub propagations: u64,
    /// Subtrees pruned for exceeding the bound.
    pub conflicts: u64,
    /// Solutions emitted (before deduplication).
    pub solutions: u64,
}

/// The result of an enumeration run.
#[derive(Debug, Clone)]
pub struct Enumeration {
    /// Distinct solutions, unspecified order.
    pub solutions: Vec<Solution>,
    /// Counters over the whole run.
    pub stats: DpllStats,
    /// Whether the search space was exhausted. `false` after an early
    /// stop; the solutions gathered so far are still returned.
    pub complete: bool,
}

/// The bounded-unsat DPLL enumerator.
pub struct DpllSolver {
    formula: Arc<Formula>,
    config: DpllConfig,
}

impl DpllSolver {
    /// Creates a solver over a formula.
    #[must_use]
    pub fn new(formula: Arc<Formula>, config: DpllConfig) -> Self {
        Self { formula, config }
    }

    /// Enumerates every complete assignment with at most
    /// `config.max_unsat` falsified clauses.
    pub fn solve(&self) -> Result<Enumeration> {
        let threads = resolve_threads(self.config.threads);
        let stats = Arc::new(SearchStats::default());
        let sink = SolutionSink::spawn(SinkConfig {
            channel_capacity: 1024,
            retain: self.config.max_solutions,
        });

        tracing::info!(
            num_vars = self.formula.num_vars(),
            num_clauses = self.formula.num_clauses(),
            max_unsat = self.config.max_unsat,
            threads,
            "starting DPLL enumeration"
        );

        let pool = WorkerPool::new(threads, |_| DpllWorker {
            ctx: SearchContext::new(
                Arc::clone(&self.formula),
                self.config.max_unsat,
                Arc::clone(&stats),
            ),
            emit: sink.sender(),
            stats: Arc::clone(&stats),
            stop_after: self.config.stop_after,
        });

        pool.inject(WorkItem::root(self.config.max_unsat));
        let complete = pool.wait_idle();
        pool.join();
        let report = sink.finish();

        let stats = stats.snapshot();
        tracing::info!(
            solutions = report.solutions.len(),
            duplicates = report.duplicates,
            decisions = stats.decisions,
            conflicts = stats.conflicts,
            complete,
            "DPLL enumeration finished"
        );

        Ok(Enumeration {
            solutions: report.solutions,
            stats,
            complete,
        })
    }
}

/// Per-worker handler: owns a search context, explores popped branches
/// depth-first and sheds `v = false` siblings onto its own deque.
pub struct DpllWorker {
    ctx: SearchContext,
    emit: SyncSender<Solution>,
    stats: Arc<SearchStats>,
    stop_after: Option<u64>,
}

impl DpllWorker {
    /// Builds a handler around an existing context; the distributor uses
    /// this to run pools outside [`DpllSolver`].
    #[must_use]
    pub fn from_context(
        ctx: SearchContext,
        emit: SyncSender<Solution>,
        stats: Arc<SearchStats>,
        stop_after: Option<u64>,
    ) -> Self {
        Self {
            ctx,
            emit,
            stats,
            stop_after,
        }
    }
}

impl WorkHandler<WorkItem> for DpllWorker {
    fn handle(&mut self, item: WorkItem, scope: &Scope<'_, WorkItem>) {
        if scope.stop_requested() || !self.ctx.align(&item.decisions) {
            return;
        }
        loop {
            if scope.stop_requested() {
                return;
            }
            match self.ctx.next_unset() {
                None => {
                    // Leaf: a complete assignment within the bound.
                    let emitted = self.stats.record_solution();
                    if self.emit.send(self.ctx.snapshot_solution()).is_err() {
                        tracing::warn!("solution sink closed early");
                        scope.request_stop();
                        return;
                    }
                    if self.stop_after.is_some_and(|bound| emitted >= bound) {
                        scope.request_stop();
                    }
                    return;
                }
                Some(var) => {
                    let decision = Lit::from_var(var, true);
                    let mut sibling = self.ctx.decisions().to_vec();
                    sibling.push(decision.negated());
                    scope.push(WorkItem::new(sibling, item.max_unsat));

                    self.ctx.decide(decision);
                    if self.ctx.propagate() == PropStatus::Conflict {
                        self.stats.record_conflict();
                        return;
                    }
                }
            }
        }
    }
}
