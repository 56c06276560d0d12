//! The compiled, immutable formula both solvers run against.

use crate::dimacs::DimacsCnf;
use aurora_base::{Error, Lit, Result, Solution};

/// An indexed CNF formula.
///
/// Clauses live in one flat literal buffer addressed by per-clause
/// offsets; per-literal occurrence lists give the clauses a literal
/// appears in. The formula is immutable for the lifetime of a solve and
/// shared across workers by reference.
///
/// Normalization happens here, once, at build time: duplicate literals
/// inside a clause are removed (keeping first-occurrence order) and
/// tautological clauses are dropped. Empty clauses are kept; they are the
/// unsatisfiable sentinel and count toward every assignment's unsat total.
#[derive(Debug, Clone)]
pub struct Formula {
    num_vars: u32,
    lits: Vec<Lit>,
    offsets: Vec<u32>,
    occurrences: Vec<Vec<u32>>,
}

impl Formula {
    /// Compiles a parsed DIMACS formula.
    ///
    /// Fails with `Error::Parse` if a clause references a variable
    /// outside `1..=num_vars`.
    pub fn from_dimacs(cnf: &DimacsCnf) -> Result<Self> {
        let num_vars = cnf.num_vars as u32;
        let mut lits = Vec::new();
        let mut offsets = vec![0u32];
        let mut occurrences = vec![Vec::new(); Lit::code_space(cnf.num_vars)];
        let mut dropped = 0usize;
        let mut seen: Vec<Lit> = Vec::new();

        for raw_clause in &cnf.clauses {
            seen.clear();
            let mut tautology = false;
            for &raw in raw_clause {
                let var = raw.unsigned_abs();
                if var == 0 || var > num_vars {
                    return Err(Error::Parse(format!(
                        "literal {raw} outside variable range 1..={num_vars}"
                    )));
                }
                let lit = Lit::new(raw);
                if seen.contains(&lit) {
                    continue;
                }
                if seen.contains(&lit.negated()) {
                    tautology = true;
                    break;
                }
                seen.push(lit);
            }
            if tautology {
                dropped += 1;
                continue;
            }
            let clause_id = offsets.len() as u32 - 1;
            for &lit in &seen {
                occurrences[lit.code()].push(clause_id);
                lits.push(lit);
            }
            offsets.push(lits.len() as u32);
        }

        if dropped > 0 {
            tracing::debug!(dropped, "dropped tautological clauses at load");
        }

        Ok(Self {
            num_vars,
            lits,
            offsets,
            occurrences,
        })
    }

    /// Number of variables.
    #[must_use]
    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    /// Number of clauses after normalization.
    #[must_use]
    pub fn num_clauses(&self) -> usize {
        self.offsets.len() - 1
    }

    /// The literals of clause `c`.
    #[must_use]
    pub fn clause(&self, c: usize) -> &[Lit] {
        &self.lits[self.offsets[c] as usize..self.offsets[c + 1] as usize]
    }

    /// Iterates over all clauses.
    pub fn clauses(&self) -> impl Iterator<Item = &[Lit]> + '_ {
        (0..self.num_clauses()).map(move |c| self.clause(c))
    }

    /// Ids of the clauses containing `lit`.
    #[must_use]
    pub fn occurrences(&self, lit: Lit) -> &[u32] {
        &self.occurrences[lit.code()]
    }

    /// Counts the clauses a complete assignment falsifies.
    #[must_use]
    pub fn count_unsat(&self, solution: &Solution) -> u32 {
        self.clauses()
            .filter(|clause| {
                clause
                    .iter()
                    .all(|lit| !lit.apply(solution.value(lit.var())))
            })
            .count() as u32
    }

    /// Serializes back to the DIMACS form of the normalized formula.
    #[must_use]
    pub fn to_dimacs(&self) -> DimacsCnf {
        DimacsCnf {
            num_vars: self.num_vars as usize,
            clauses: self
                .clauses()
                .map(|c| c.iter().map(|l| l.to_dimacs()).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(text: &str) -> Formula {
        Formula::from_dimacs(&DimacsCnf::parse(text).unwrap()).unwrap()
    }

    #[test]
    fn test_indexing() {
        let f = build("p cnf 3 2\n1 -2 0\n2 3 0\n");
        assert_eq!(f.num_vars(), 3);
        assert_eq!(f.num_clauses(), 2);
        assert_eq!(f.clause(0), &[Lit::new(1), Lit::new(-2)]);
        assert_eq!(f.clause(1), &[Lit::new(2), Lit::new(3)]);
        assert_eq!(f.occurrences(Lit::new(2)), &[1]);
        assert_eq!(f.occurrences(Lit::new(-2)), &[0]);
    }

    #[test]
    fn test_tautology_dropped() {
        let f = build("p cnf 2 2\n1 -1 0\n1 2 0\n");
        assert_eq!(f.num_clauses(), 1);
        assert_eq!(f.clause(0), &[Lit::new(1), Lit::new(2)]);
    }

    #[test]
    fn test_duplicate_literals_removed_in_order() {
        let f = build("p cnf 2 1\n2 1 2 1 0\n");
        assert_eq!(f.clause(0), &[Lit::new(2), Lit::new(1)]);
    }

    #[test]
    fn test_empty_clause_kept() {
        let f = build("p cnf 2 2\n0\n1 0\n");
        assert_eq!(f.num_clauses(), 2);
        assert!(f.clause(0).is_empty());
    }

    #[test]
    fn test_out_of_range_variable_rejected() {
        let cnf = DimacsCnf::parse("p cnf 2 1\n1 3 0\n").unwrap();
        assert!(Formula::from_dimacs(&cnf).is_err());
    }

    #[test]
    fn test_dimacs_round_trip_is_fixpoint() {
        let f = build("p cnf 3 3\n1 -1 0\n1 2 1 0\n-3 0\n");
        let serialized = f.to_dimacs();
        let reloaded = Formula::from_dimacs(&serialized).unwrap();
        assert_eq!(serialized, reloaded.to_dimacs());
    }

    #[test]
    fn test_count_unsat() {
        let f = build("p cnf 2 2\n1 2 0\n-1 -2 0\n");
        let both_true = Solution::from_values(&[true, true], 0);
        let mixed = Solution::from_values(&[true, false], 0);
        assert_eq!(f.count_unsat(&both_true), 1);
        assert_eq!(f.count_unsat(&mixed), 0);
    }
}
