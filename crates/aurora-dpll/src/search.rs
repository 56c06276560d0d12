//! The iterative search context.
//!
//! One `SearchContext` lives on each worker thread. It owns the mutable
//! search state (assignment, trail, watch index, unsat counter) while the
//! formula itself is shared read-only. A context is repositioned between
//! work items by `align`, which backtracks to the longest common decision
//! prefix and replays the rest; propagation is a pure function of the
//! decision sequence, so replay reproduces the shipped state exactly.

use crate::assignment::Assignment;
use crate::propagate::PropStatus;
use crate::solver::SearchStats;
use crate::watch::WatchLists;
use aurora_base::{Lit, Solution, VarId};
use aurora_format::Formula;
use std::collections::VecDeque;
use std::sync::Arc;

/// Per-worker DPLL search state.
pub struct SearchContext {
    pub(crate) formula: Arc<Formula>,
    pub(crate) assign: Assignment,
    pub(crate) watches: WatchLists,
    pub(crate) queue: VecDeque<Lit>,
    /// Clauses currently falsified.
    pub(crate) unsat: u32,
    pub(crate) max_unsat: u32,
    pub(crate) stats: Arc<SearchStats>,
    /// `unsat` as it was before each level's decision, for backtracking.
    saved_unsat: Vec<u32>,
    decisions: Vec<Lit>,
    root_conflict: bool,
    /// Every variable below this 0-based index is known assigned.
    hint: u32,
}

impl SearchContext {
    /// Builds a context and runs the eager root propagation: empty
    /// clauses are counted, and input unit clauses are forced when the
    /// budget is already spent.
    #[must_use]
    pub fn new(formula: Arc<Formula>, max_unsat: u32, stats: Arc<SearchStats>) -> Self {
        let watches = WatchLists::build(&formula);
        let num_vars = formula.num_vars();
        let mut ctx = Self {
            assign: Assignment::new(num_vars),
            watches,
            queue: VecDeque::new(),
            unsat: 0,
            max_unsat,
            stats,
            saved_unsat: Vec::new(),
            decisions: Vec::new(),
            root_conflict: false,
            hint: 0,
            formula,
        };
        ctx.propagate_root();
        ctx
    }

    fn propagate_root(&mut self) {
        let formula = Arc::clone(&self.formula);
        self.unsat = formula.clauses().filter(|c| c.is_empty()).count() as u32;
        if self.unsat > self.max_unsat {
            self.root_conflict = true;
            return;
        }
        if self.unsat == self.max_unsat {
            // Zero budget left: every input unit is genuinely forced.
            for clause in formula.clauses() {
                if let [only] = clause {
                    match self.assign.lit_value(*only) {
                        Some(true) => {}
                        None => self.enqueue_assign(*only),
                        Some(false) => {
                            self.unsat += 1;
                            self.root_conflict = true;
                            return;
                        }
                    }
                    if self.propagate() == PropStatus::Conflict {
                        self.root_conflict = true;
                        return;
                    }
                }
            }
        }
    }

    /// Whether the root state already exceeds the bound; no assignment
    /// can satisfy it and the whole solve is an empty enumeration.
    #[must_use]
    pub fn root_conflict(&self) -> bool {
        self.root_conflict
    }

    /// The current decision sequence.
    #[must_use]
    pub fn decisions(&self) -> &[Lit] {
        &self.decisions
    }

    /// Current falsified-clause count.
    #[must_use]
    pub fn unsat(&self) -> u32 {
        self.unsat
    }

    /// Opens a new level and assigns the decision literal. The caller
    /// must propagate afterwards.
    pub fn decide(&mut self, lit: Lit) {
        debug_assert!(self.assign.value(lit.var()).is_none());
        self.assign.push_mark();
        self.saved_unsat.push(self.unsat);
        self.decisions.push(lit);
        self.enqueue_assign(lit);
        self.stats.record_decision();
    }

    /// Unwinds to `level`, restoring the unsat counter. Watches stay put,
    /// unassignment cannot invalidate them.
    pub fn backtrack_to(&mut self, level: usize) {
        self.queue.clear();
        self.assign.backtrack_to(level);
        self.unsat = self.saved_unsat[level];
        self.saved_unsat.truncate(level);
        self.decisions.truncate(level);
        self.hint = 0;
    }

    /// Repositions the context onto the given decision prefix: backtrack
    /// to the longest common prefix, then replay the remainder with
    /// propagation. Returns `false` when the replayed branch dies on the
    /// way down.
    pub fn align(&mut self, target: &[Lit]) -> bool {
        if self.root_conflict {
            return false;
        }
        let common = self
            .decisions
            .iter()
            .zip(target)
            .take_while(|(a, b)| a == b)
            .count();
        if self.decisions.len() > common {
            self.backtrack_to(common);
        }
        for &lit in &target[common..] {
            self.decide(lit);
            if self.propagate() == PropStatus::Conflict {
                self.stats.record_conflict();
                return false;
            }
        }
        true
    }

    /// The smallest-index unset variable, the fixed deterministic
    /// branching rule.
    pub fn next_unset(&mut self) -> Option<VarId> {
        let num_vars = self.formula.num_vars();
        while self.hint < num_vars {
            if self.assign.value(self.hint + 1).is_none() {
                return Some(self.hint + 1);
            }
            self.hint += 1;
        }
        None
    }

    /// Packs the current complete assignment with its unsat count.
    #[must_use]
    pub fn snapshot_solution(&self) -> Solution {
        debug_assert!(self.assign.is_complete());
        Solution::from_values(&self.assign.complete_values(), self.unsat)
    }
}
