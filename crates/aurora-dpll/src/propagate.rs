//! Budget-aware boolean constraint propagation.
//!
//! Standard two-watched-literal BCP with two twists required by bounded
//! enumeration:
//!
//! - A unit clause forces its literal only when the remaining budget
//!   `max_unsat - unsat` is zero. With budget left, an assignment that
//!   falsifies the clause can still meet the bound, so both polarities
//!   must stay reachable; the falsification is picked up by the watch
//!   walk when the clause's last literal dies.
//! - A dead clause increments `unsat` instead of aborting; propagation
//!   stops only once `unsat` exceeds the bound. Because the search keeps
//!   running past dead clauses, a clause whose two watched literals fall
//!   in the same propagation burst would be seen dead twice; it is
//!   counted only on the walk of its last-assigned literal.

use crate::search::SearchContext;
use crate::watch::Watch;
use aurora_base::Lit;
use aurora_format::Formula;
use std::sync::Arc;

/// Outcome of a propagation fixpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropStatus {
    /// Fixpoint reached with `unsat <= max_unsat`.
    Ok,
    /// The falsified-clause count exceeded the bound.
    Conflict,
}

impl SearchContext {
    /// Assigns a literal and queues it for the watch walk.
    pub(crate) fn enqueue_assign(&mut self, lit: Lit) {
        self.assign.assign(lit);
        self.queue.push_back(lit);
    }

    /// Drains the propagation queue to fixpoint.
    pub fn propagate(&mut self) -> PropStatus {
        while let Some(assigned) = self.queue.pop_front() {
            self.stats.record_propagation();
            if self.walk_watchers(assigned.negated()) == PropStatus::Conflict {
                self.queue.clear();
                return PropStatus::Conflict;
            }
        }
        PropStatus::Ok
    }

    /// Processes the watcher list of a literal that just became false.
    fn walk_watchers(&mut self, dead: Lit) -> PropStatus {
        let formula = Arc::clone(&self.formula);
        let code = dead.code();
        let mut watchers = std::mem::take(&mut self.watches.lists[code]);
        let mut status = PropStatus::Ok;
        let mut kept = 0;
        let mut i = 0;

        'walk: while i < watchers.len() {
            let w = watchers[i];
            i += 1;

            // Satisfied already; the cached blocker saves the clause load.
            if self.assign.lit_value(w.blocker) == Some(true) {
                watchers[kept] = w;
                kept += 1;
                continue;
            }

            let c = w.clause as usize;
            let clause = formula.clause(c);
            let [s0, s1] = self.watches.slots[c];
            let (slot, other_pos) = if clause[s0 as usize] == dead {
                (0, s1)
            } else {
                (1, s0)
            };
            // For a unit clause's self-watch `other` is `dead` itself,
            // which reads as false and falls through to the dead case.
            let other = clause[other_pos as usize];
            let other_value = self.assign.lit_value(other);
            if other_value == Some(true) {
                watchers[kept] = Watch {
                    clause: w.clause,
                    blocker: other,
                };
                kept += 1;
                continue;
            }

            // Look for a non-false literal to take over this watch.
            let my_pos = self.watches.slots[c][slot];
            for (j, &candidate) in clause.iter().enumerate() {
                let j = j as u32;
                if j == my_pos || j == other_pos {
                    continue;
                }
                if self.assign.lit_value(candidate) != Some(false) {
                    self.watches.slots[c][slot] = j;
                    self.watches.lists[candidate.code()].push(Watch {
                        clause: w.clause,
                        blocker: other,
                    });
                    continue 'walk;
                }
            }

            watchers[kept] = Watch {
                clause: w.clause,
                blocker: other,
            };
            kept += 1;

            if other_value.is_none() {
                // Unit. Forced only once the budget is spent.
                if self.unsat == self.max_unsat {
                    self.enqueue_assign(other);
                }
            } else if died_last(&formula, self, c, dead) {
                self.unsat += 1;
                if self.unsat > self.max_unsat {
                    status = PropStatus::Conflict;
                    // Keep the unprocessed tail of the list intact.
                    while i < watchers.len() {
                        watchers[kept] = watchers[i];
                        kept += 1;
                        i += 1;
                    }
                    break;
                }
            }
        }

        watchers.truncate(kept);
        self.watches.lists[code] = watchers;
        status
    }
}

/// Whether `dead` is the last-assigned literal of the (fully false)
/// clause `c`.
fn died_last(formula: &Formula, ctx: &SearchContext, c: usize, dead: Lit) -> bool {
    let position = ctx.assign.trail_position(dead.var());
    formula
        .clause(c)
        .iter()
        .all(|l| ctx.assign.trail_position(l.var()) <= position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SearchStats;
    use aurora_format::DimacsCnf;

    fn context(text: &str, max_unsat: u32) -> SearchContext {
        let formula =
            Arc::new(Formula::from_dimacs(&DimacsCnf::parse(text).unwrap()).unwrap());
        SearchContext::new(formula, max_unsat, Arc::new(SearchStats::default()))
    }

    #[test]
    fn test_unit_chain_propagates_at_zero_budget() {
        // 1 forces 2 forces 3.
        let mut ctx = context("p cnf 3 2\n-1 2 0\n-2 3 0\n", 0);
        ctx.decide(Lit::new(1));
        assert_eq!(ctx.propagate(), PropStatus::Ok);
        assert_eq!(ctx.assign.value(2), Some(true));
        assert_eq!(ctx.assign.value(3), Some(true));
        assert_eq!(ctx.unsat(), 0);
    }

    #[test]
    fn test_no_forcing_with_budget_left() {
        let mut ctx = context("p cnf 2 1\n-1 2 0\n", 1);
        ctx.decide(Lit::new(1));
        assert_eq!(ctx.propagate(), PropStatus::Ok);
        assert_eq!(ctx.assign.value(2), None);
    }

    #[test]
    fn test_dead_clause_counts_once_in_a_burst() {
        // Deciding -2 kills (1 2), spending the budget; the now-forced
        // units 3 and 4 then kill (-3 -4), whose two watched literals
        // both fall inside the same burst. The burst must record exactly
        // two deaths, not three.
        let mut ctx = context("p cnf 4 4\n1 2 0\n2 3 0\n2 4 0\n-3 -4 0\n", 1);
        ctx.decide(Lit::new(-1));
        assert_eq!(ctx.propagate(), PropStatus::Ok);
        ctx.decide(Lit::new(-2));
        assert_eq!(ctx.propagate(), PropStatus::Conflict);
        assert_eq!(ctx.unsat(), 2);
    }

    #[test]
    fn test_conflict_when_bound_exceeded() {
        let mut ctx = context("p cnf 2 2\n1 0\n2 0\n", 0);
        assert!(!ctx.root_conflict());
        // Both units were forced at the root.
        assert_eq!(ctx.assign.value(1), Some(true));
        assert_eq!(ctx.assign.value(2), Some(true));

        // With x1 false one of (1 2), (1 -2) dies whatever x2 is; the
        // forced unit collides inside the same propagation burst.
        let mut ctx = context("p cnf 2 2\n1 2 0\n1 -2 0\n", 0);
        ctx.decide(Lit::new(-1));
        assert_eq!(ctx.propagate(), PropStatus::Conflict);
        assert_eq!(ctx.unsat(), 1);
    }

    #[test]
    fn test_fixpoint_invariant() {
        // After propagation every clause is satisfied, has two or more
        // unassigned literals, is pending-unit, or is counted dead.
        let mut ctx = context("p cnf 4 3\n1 2 3 0\n-1 4 0\n-3 -4 0\n", 2);
        ctx.decide(Lit::new(1));
        assert_eq!(ctx.propagate(), PropStatus::Ok);
        let formula = Arc::clone(&ctx.formula);
        let mut dead = 0;
        for clause in formula.clauses() {
            let satisfied = clause
                .iter()
                .any(|&l| ctx.assign.lit_value(l) == Some(true));
            let unassigned = clause
                .iter()
                .filter(|&&l| ctx.assign.lit_value(l).is_none())
                .count();
            let all_false = clause
                .iter()
                .all(|&l| ctx.assign.lit_value(l) == Some(false));
            if all_false {
                dead += 1;
            }
            assert!(satisfied || unassigned >= 1 || all_false);
        }
        assert_eq!(ctx.unsat(), dead);
    }

    #[test]
    fn test_dead_clause_recounted_after_backtrack() {
        let mut ctx = context("p cnf 2 1\n1 2 0\n", 1);
        ctx.decide(Lit::new(-1));
        assert_eq!(ctx.propagate(), PropStatus::Ok);
        ctx.decide(Lit::new(-2));
        assert_eq!(ctx.propagate(), PropStatus::Ok);
        assert_eq!(ctx.unsat(), 1);

        ctx.backtrack_to(1);
        assert_eq!(ctx.unsat(), 0);

        ctx.decide(Lit::new(-2));
        assert_eq!(ctx.propagate(), PropStatus::Ok);
        assert_eq!(ctx.unsat(), 1);
    }
}
