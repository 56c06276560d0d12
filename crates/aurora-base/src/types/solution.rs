//! Complete assignments emitted by the solvers.

use super::{Lit, VarId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A complete assignment plus its falsified-clause count.
///
/// The assignment is packed into `u64` words, one bit per variable;
/// two solutions are the same solution iff their bit-patterns match,
/// which is what the result sink deduplicates on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Solution {
    bits: Vec<u64>,
    num_vars: u32,
    unsat: u32,
}

impl Solution {
    /// Packs a complete assignment given as one bool per variable.
    #[must_use]
    pub fn from_values(values: &[bool], unsat: u32) -> Self {
        let mut bits = vec![0u64; values.len().div_ceil(64)];
        for (i, &v) in values.iter().enumerate() {
            if v {
                bits[i / 64] |= 1 << (i % 64);
            }
        }
        Self {
            bits,
            num_vars: values.len() as u32,
            unsat,
        }
    }

    /// Rebuilds a solution from its wire parts.
    #[must_use]
    pub fn from_parts(bits: Vec<u64>, num_vars: u32, unsat: u32) -> Self {
        Self {
            bits,
            num_vars,
            unsat,
        }
    }

    /// The value of variable `var`.
    #[must_use]
    pub fn value(&self, var: VarId) -> bool {
        let i = var as usize - 1;
        self.bits[i / 64] >> (i % 64) & 1 == 1
    }

    /// Number of variables in the assignment.
    #[must_use]
    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    /// Falsified-clause count under this assignment.
    #[must_use]
    pub fn unsat(&self) -> u32 {
        self.unsat
    }

    /// The packed words; the deduplication key.
    #[must_use]
    pub fn bits(&self) -> &[u64] {
        &self.bits
    }

    /// The literals this assignment makes true, in variable order.
    pub fn literals(&self) -> impl Iterator<Item = Lit> + '_ {
        (1..=self.num_vars).map(|v| Lit::from_var(v, self.value(v)))
    }
}

impl fmt::Display for Solution {
    /// Prints the unsat count, the signed literals, and a terminating `0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.unsat)?;
        for lit in self.literals() {
            write!(f, " {lit}")?;
        }
        write!(f, " 0")
    }
}
