//! Partial assignments and the trail.

use aurora_base::{Lit, VarId};

const UNASSIGNED: u32 = u32::MAX;

/// A partial assignment with its trail and decision-level marks.
///
/// Invariants: every trail entry is a set variable; the number of marks
/// equals the current decision level; entries after a level's mark were
/// propagated, not decided.
#[derive(Debug, Clone)]
pub struct Assignment {
    values: Vec<Option<bool>>,
    /// Trail index per variable, `UNASSIGNED` when unset. Used to decide
    /// which literal of a dead clause died last.
    order: Vec<u32>,
    trail: Vec<Lit>,
    /// Trail length at the moment each decision level was opened.
    marks: Vec<u32>,
}

impl Assignment {
    /// Creates an all-unset assignment over `num_vars` variables.
    #[must_use]
    pub fn new(num_vars: u32) -> Self {
        Self {
            values: vec![None; num_vars as usize],
            order: vec![UNASSIGNED; num_vars as usize],
            trail: Vec::with_capacity(num_vars as usize),
            marks: Vec::new(),
        }
    }

    /// The value of a variable.
    #[must_use]
    pub fn value(&self, var: VarId) -> Option<bool> {
        self.values[var as usize - 1]
    }

    /// The value a literal takes, `None` while its variable is unset.
    #[must_use]
    pub fn lit_value(&self, lit: Lit) -> Option<bool> {
        self.value(lit.var()).map(|v| lit.apply(v))
    }

    /// Makes `lit` true and records it on the trail.
    pub fn assign(&mut self, lit: Lit) {
        let i = lit.var() as usize - 1;
        debug_assert!(self.values[i].is_none(), "variable assigned twice");
        self.values[i] = Some(lit.is_positive());
        self.order[i] = self.trail.len() as u32;
        self.trail.push(lit);
    }

    /// Trail position of a set variable.
    #[must_use]
    pub fn trail_position(&self, var: VarId) -> u32 {
        self.order[var as usize - 1]
    }

    /// Number of set variables.
    #[must_use]
    pub fn assigned(&self) -> usize {
        self.trail.len()
    }

    /// Whether every variable is set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.trail.len() == self.values.len()
    }

    /// Current decision level.
    #[must_use]
    pub fn level(&self) -> usize {
        self.marks.len()
    }

    /// Opens a new decision level.
    pub fn push_mark(&mut self) {
        self.marks.push(self.trail.len() as u32);
    }

    /// Unwinds to `level`, unassigning everything above its mark.
    pub fn backtrack_to(&mut self, level: usize) {
        debug_assert!(level < self.marks.len());
        let target = self.marks[level] as usize;
        self.marks.truncate(level);
        while self.trail.len() > target {
            let lit = self.trail.pop().unwrap();
            let i = lit.var() as usize - 1;
            self.values[i] = None;
            self.order[i] = UNASSIGNED;
        }
    }

    /// The complete assignment as one bool per variable.
    ///
    /// Panics when called on an incomplete assignment.
    #[must_use]
    pub fn complete_values(&self) -> Vec<bool> {
        self.values
            .iter()
            .map(|v| v.expect("assignment is not complete"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(raw: i32) -> Lit {
        Lit::new(raw)
    }

    #[test]
    fn test_assign_and_read() {
        let mut a = Assignment::new(3);
        a.assign(lit(1));
        a.assign(lit(-3));
        assert_eq!(a.value(1), Some(true));
        assert_eq!(a.value(2), None);
        assert_eq!(a.value(3), Some(false));
        assert_eq!(a.lit_value(lit(-3)), Some(true));
        assert_eq!(a.lit_value(lit(3)), Some(false));
    }

    #[test]
    fn test_trail_matches_assigned_count() {
        let mut a = Assignment::new(4);
        a.push_mark();
        a.assign(lit(2));
        a.assign(lit(4));
        assert_eq!(a.assigned(), 2);
        assert_eq!(a.level(), 1);
    }

    #[test]
    fn test_backtrack_unassigns_above_mark() {
        let mut a = Assignment::new(4);
        a.assign(lit(1));
        a.push_mark();
        a.assign(lit(2));
        a.assign(lit(3));
        a.push_mark();
        a.assign(lit(4));

        a.backtrack_to(1);
        assert_eq!(a.level(), 1);
        assert_eq!(a.value(4), None);
        assert_eq!(a.value(3), Some(true));

        a.backtrack_to(0);
        assert_eq!(a.level(), 0);
        assert_eq!(a.assigned(), 1);
        assert_eq!(a.value(1), Some(true));
    }

    #[test]
    fn test_trail_positions_order_assignments() {
        let mut a = Assignment::new(3);
        a.assign(lit(2));
        a.assign(lit(-1));
        assert!(a.trail_position(1) > a.trail_position(2));
    }
}
