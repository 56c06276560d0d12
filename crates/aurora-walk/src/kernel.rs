//! The Walk-SAT local-search kernel.
//!
//! State is a complete assignment plus incremental bookkeeping: a
//! satisfied-literal count per clause and the set of currently falsified
//! clauses, kept as an indexable collection so a uniform random draw and
//! a membership toggle are both O(1). A flip touches only the clauses
//! containing the flipped variable.
//!
//! Empty clauses can never be satisfied; they are counted as a constant
//! baseline instead of living in the flip set, so a drawn clause always
//! has variables to flip.

use aurora_base::{rng::entropy_seed, Lit, Solution, VarId, XorShift64};
use aurora_format::Formula;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Walk-SAT parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Flips per restart round. `0` restarts immediately, so only the
    /// initial random assignment of each round is ever inspected.
    pub max_steps: u64,
    /// Probability of a random walk move when no free flip exists.
    pub noise: f64,
    /// Emit assignments falsifying at most this many clauses.
    pub target_unsat: u32,
    /// PRNG seed; `0` seeds from OS entropy.
    pub seed: u64,
    /// Wall-clock budget. Zero means stop at the first solution.
    pub cutoff: Duration,
    /// Independent search threads; `0` and `1` both mean single-threaded.
    pub threads: usize,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            max_steps: 10_000,
            noise: 0.5,
            target_unsat: 0,
            seed: 0,
            cutoff: Duration::ZERO,
            threads: 1,
        }
    }
}

const NO_POSITION: u32 = u32::MAX;

/// The falsified-clause set: uniform draw and O(1) insert/remove.
#[derive(Debug, Clone)]
struct UnsatSet {
    items: Vec<u32>,
    position: Vec<u32>,
}

impl UnsatSet {
    fn new(num_clauses: usize) -> Self {
        Self {
            items: Vec::new(),
            position: vec![NO_POSITION; num_clauses],
        }
    }

    fn insert(&mut self, clause: u32) {
        if self.position[clause as usize] == NO_POSITION {
            self.position[clause as usize] = self.items.len() as u32;
            self.items.push(clause);
        }
    }

    fn remove(&mut self, clause: u32) {
        let pos = self.position[clause as usize];
        if pos == NO_POSITION {
            return;
        }
        let last = self.items.pop().unwrap();
        if last != clause {
            self.items[pos as usize] = last;
            self.position[last as usize] = pos;
        }
        self.position[clause as usize] = NO_POSITION;
    }

    fn clear(&mut self) {
        for &c in &self.items {
            self.position[c as usize] = NO_POSITION;
        }
        self.items.clear();
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn choose(&self, rng: &mut XorShift64) -> u32 {
        self.items[rng.next_below(self.items.len())]
    }
}

/// One Walk-SAT search instance.
pub struct WalkSat {
    formula: Arc<Formula>,
    config: WalkConfig,
    values: Vec<bool>,
    sat_count: Vec<u32>,
    unsat: UnsatSet,
    /// Empty clauses: falsified under every assignment.
    baseline: u32,
    rng: XorShift64,
    flips: u64,
    restarts: u64,
}

impl WalkSat {
    /// Creates a kernel with its own generator seeded as given (`0`
    /// draws from OS entropy).
    #[must_use]
    pub fn new(formula: Arc<Formula>, config: WalkConfig, seed: u64) -> Self {
        let num_vars = formula.num_vars() as usize;
        let num_clauses = formula.num_clauses();
        let baseline = formula.clauses().filter(|c| c.is_empty()).count() as u32;
        let seed = if seed == 0 { entropy_seed() } else { seed };
        Self {
            formula,
            config,
            values: vec![false; num_vars],
            sat_count: vec![0; num_clauses],
            unsat: UnsatSet::new(num_clauses),
            baseline,
            rng: XorShift64::new(seed),
            flips: 0,
            restarts: 0,
        }
    }

    /// Total falsified clauses under the current assignment.
    #[must_use]
    pub fn total_unsat(&self) -> u32 {
        self.baseline + self.unsat.len() as u32
    }

    /// Flips performed so far.
    #[must_use]
    pub fn flips(&self) -> u64 {
        self.flips
    }

    /// Restart rounds begun after exhausting `max_steps`.
    #[must_use]
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// Draws a fresh random assignment and rebuilds the bookkeeping in
    /// one pass over the formula.
    fn randomize(&mut self) {
        for value in &mut self.values {
            *value = self.rng.next_u64() & 1 == 1;
        }
        self.unsat.clear();
        for (c, clause) in self.formula.clauses().enumerate() {
            let satisfied = clause
                .iter()
                .filter(|&&lit| lit.apply(self.values[lit.var() as usize - 1]))
                .count() as u32;
            self.sat_count[c] = satisfied;
            if satisfied == 0 && !clause.is_empty() {
                self.unsat.insert(c as u32);
            }
        }
    }

    /// Clauses that would die if `var` flipped: those satisfied solely
    /// by its current value.
    fn break_count(&self, var: VarId) -> u32 {
        let current = Lit::from_var(var, self.values[var as usize - 1]);
        self.formula
            .occurrences(current)
            .iter()
            .filter(|&&c| self.sat_count[c as usize] == 1)
            .count() as u32
    }

    fn flip(&mut self, var: VarId) {
        let dying = Lit::from_var(var, self.values[var as usize - 1]);
        let rising = dying.negated();
        self.values[var as usize - 1] = rising.is_positive();
        self.flips += 1;

        for &c in self.formula.occurrences(dying) {
            self.sat_count[c as usize] -= 1;
            if self.sat_count[c as usize] == 0 {
                self.unsat.insert(c);
            }
        }
        for &c in self.formula.occurrences(rising) {
            self.sat_count[c as usize] += 1;
            if self.sat_count[c as usize] == 1 {
                self.unsat.remove(c);
            }
        }
    }

    /// One flip: free move if some variable of the drawn clause breaks
    /// nothing, else random walk with probability `noise`, else the
    /// minimum-break variable. Ties break toward the smallest index.
    fn step(&mut self) {
        let clause_id = self.unsat.choose(&mut self.rng);
        let clause = self.formula.clause(clause_id as usize);

        let mut freebie: Option<VarId> = None;
        let mut best_var = 0;
        let mut best_break = u32::MAX;
        for &lit in clause {
            let var = lit.var();
            let breaks = self.break_count(var);
            if breaks == 0 {
                freebie = Some(match freebie {
                    None => var,
                    Some(prev) => prev.min(var),
                });
            }
            if breaks < best_break || (breaks == best_break && var < best_var) {
                best_break = breaks;
                best_var = var;
            }
        }

        let chosen = if let Some(var) = freebie {
            var
        } else if self.rng.next_f64() < self.config.noise {
            clause[self.rng.next_below(clause.len())].var()
        } else {
            best_var
        };
        self.flip(chosen);
    }

    /// The current assignment with its falsified-clause count.
    #[must_use]
    pub fn snapshot(&self) -> Solution {
        Solution::from_values(&self.values, self.total_unsat())
    }

    /// Runs restarts until the cutoff elapses, the stop flag rises, or
    /// (with a zero cutoff) the first solution is found. Returns whether
    /// any solution was emitted.
    pub fn run<F: FnMut(Solution)>(&mut self, stop: &AtomicBool, mut emit: F) -> bool {
        let deadline = (!self.config.cutoff.is_zero()).then(|| Instant::now() + self.config.cutoff);
        let mut found = false;

        'restart: loop {
            self.randomize();
            let mut steps = 0u64;
            loop {
                if stop.load(Ordering::Relaxed) {
                    return found;
                }
                if let Some(deadline) = deadline {
                    if Instant::now() >= deadline {
                        return found;
                    }
                }
                if self.total_unsat() <= self.config.target_unsat {
                    emit(self.snapshot());
                    found = true;
                    if deadline.is_none() {
                        return true;
                    }
                    if self.unsat.is_empty() {
                        // Nothing left to flip toward; rerandomize for
                        // more solutions until the deadline.
                        continue 'restart;
                    }
                }
                if steps >= self.config.max_steps {
                    self.restarts += 1;
                    continue 'restart;
                }
                if self.unsat.is_empty() {
                    // Only empty clauses remain falsified; flipping
                    // cannot reach the target from here.
                    continue 'restart;
                }
                steps += 1;
                self.step();
            }
        }
    }
}
