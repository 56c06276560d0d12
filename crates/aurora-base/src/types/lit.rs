//! Literals in the DIMACS sign convention.

use super::VarId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A literal: a variable paired with a polarity.
///
/// Stored as a nonzero signed integer exactly as DIMACS writes it, so
/// parsing and printing are free. `code()` maps a literal onto a dense
/// index for watch and occurrence lists.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Lit(i32);

impl Lit {
    /// Creates a literal from a nonzero DIMACS integer.
    ///
    /// Panics on zero; zero is the clause terminator, never a literal.
    #[must_use]
    pub fn new(dimacs: i32) -> Self {
        assert!(dimacs != 0, "0 is not a valid literal");
        Self(dimacs)
    }

    /// Creates the positive or negative literal of `var`.
    #[must_use]
    pub fn from_var(var: VarId, positive: bool) -> Self {
        debug_assert!(var >= 1);
        Self(if positive { var as i32 } else { -(var as i32) })
    }

    /// The underlying variable.
    #[must_use]
    pub fn var(self) -> VarId {
        self.0.unsigned_abs()
    }

    /// Whether this is the positive literal of its variable.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// The complementary literal.
    #[must_use]
    pub fn negated(self) -> Self {
        Self(-self.0)
    }

    /// Dense index for per-literal tables: `2*(v-1)` for positive,
    /// `2*(v-1) + 1` for negative.
    #[must_use]
    pub fn code(self) -> usize {
        let base = (self.var() as usize - 1) * 2;
        if self.is_positive() { base } else { base + 1 }
    }

    /// Number of distinct literal codes for `num_vars` variables.
    #[must_use]
    pub const fn code_space(num_vars: usize) -> usize {
        num_vars * 2
    }

    /// The DIMACS integer form.
    #[must_use]
    pub fn to_dimacs(self) -> i32 {
        self.0
    }

    /// The value this literal takes under the given variable value.
    #[must_use]
    pub fn apply(self, var_value: bool) -> bool {
        var_value == self.is_positive()
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_dimacs() {
        for raw in [1, -1, 42, -42] {
            assert_eq!(Lit::new(raw).to_dimacs(), raw);
        }
    }

    #[test]
    fn test_codes_are_dense_and_distinct() {
        assert_eq!(Lit::new(1).code(), 0);
        assert_eq!(Lit::new(-1).code(), 1);
        assert_eq!(Lit::new(3).code(), 4);
        assert_eq!(Lit::new(-3).code(), 5);
    }

    #[test]
    fn test_negation() {
        let l = Lit::new(-7);
        assert_eq!(l.negated(), Lit::new(7));
        assert_eq!(l.negated().negated(), l);
        assert_eq!(l.var(), 7);
    }

    #[test]
    fn test_apply() {
        assert!(Lit::new(2).apply(true));
        assert!(!Lit::new(2).apply(false));
        assert!(Lit::new(-2).apply(false));
        assert!(!Lit::new(-2).apply(true));
    }
}
