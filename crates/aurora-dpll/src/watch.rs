//! The two-watched-literal index.
//!
//! Watch state is per-worker: the clause buffer is shared read-only
//! across workers, so the watched positions live here as indices into
//! each clause's literal slice rather than as a reordering of the
//! clause itself. Each watch entry caches a blocker literal; when the
//! blocker is true the clause is satisfied and the walk can skip it
//! without touching the clause at all.
//!
//! Length-1 clauses get a single self-watch (both slots on position 0),
//! so their falsification is detected by the same walk as everything
//! else. Watches never need rollback on backtracking: unassignment only
//! makes watched literals non-false again.

use aurora_base::Lit;
use aurora_format::Formula;

/// A watch entry in a literal's watcher list.
#[derive(Debug, Clone, Copy)]
pub struct Watch {
    /// The clause being watched.
    pub clause: u32,
    /// A cached literal of the clause, distinct from the list's literal
    /// in clauses of length ≥ 2.
    pub blocker: Lit,
}

/// Per-worker watch index.
#[derive(Debug, Clone)]
pub struct WatchLists {
    /// Watcher lists by literal code.
    pub(crate) lists: Vec<Vec<Watch>>,
    /// The two watched positions of each clause.
    pub(crate) slots: Vec<[u32; 2]>,
}

impl WatchLists {
    /// Builds the pristine watch index for a formula: the first two
    /// literals of every clause.
    #[must_use]
    pub fn build(formula: &Formula) -> Self {
        let mut lists = vec![Vec::new(); Lit::code_space(formula.num_vars() as usize)];
        let mut slots = vec![[0u32; 2]; formula.num_clauses()];

        for (c, clause) in formula.clauses().enumerate() {
            match clause {
                [] => {}
                [only] => {
                    lists[only.code()].push(Watch {
                        clause: c as u32,
                        blocker: *only,
                    });
                }
                [first, second, ..] => {
                    slots[c] = [0, 1];
                    lists[first.code()].push(Watch {
                        clause: c as u32,
                        blocker: *second,
                    });
                    lists[second.code()].push(Watch {
                        clause: c as u32,
                        blocker: *first,
                    });
                }
            }
        }

        Self { lists, slots }
    }

    /// The watcher list of a literal.
    #[must_use]
    pub fn watchers(&self, lit: Lit) -> &[Watch] {
        &self.lists[lit.code()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_format::DimacsCnf;

    fn build(text: &str) -> (Formula, WatchLists) {
        let formula = Formula::from_dimacs(&DimacsCnf::parse(text).unwrap()).unwrap();
        let watches = WatchLists::build(&formula);
        (formula, watches)
    }

    #[test]
    fn test_first_two_literals_watched() {
        let (_, w) = build("p cnf 3 1\n1 -2 3 0\n");
        assert_eq!(w.watchers(Lit::new(1)).len(), 1);
        assert_eq!(w.watchers(Lit::new(-2)).len(), 1);
        assert!(w.watchers(Lit::new(3)).is_empty());
        assert_eq!(w.slots[0], [0, 1]);
    }

    #[test]
    fn test_unit_clause_self_watch() {
        let (_, w) = build("p cnf 2 1\n-2 0\n");
        let entries = w.watchers(Lit::new(-2));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].blocker, Lit::new(-2));
    }

    #[test]
    fn test_empty_clause_unwatched() {
        let (f, w) = build("p cnf 1 1\n0\n");
        assert_eq!(f.num_clauses(), 1);
        assert!(w.watchers(Lit::new(1)).is_empty());
        assert!(w.watchers(Lit::new(-1)).is_empty());
    }
}
