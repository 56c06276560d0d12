//! Suspended search branches.

use aurora_base::{Error, Lit, Result};
use serde::{Deserialize, Serialize};

/// A suspended search frontier: the decision sequence reaching it plus
/// the unsat bound it runs under.
///
/// Propagations are not recorded; they replay deterministically from the
/// decisions, so a work item plus the shared formula uniquely determines
/// the subtree still to explore. Items are created by a worker splitting
/// off the `v = false` sibling of each branch point and consumed by
/// exactly one worker; stealing transfers ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// The decision literals, outermost first.
    pub decisions: Vec<Lit>,
    /// The falsified-clause bound.
    pub max_unsat: u32,
}

impl WorkItem {
    /// The root item: the whole tree.
    #[must_use]
    pub fn root(max_unsat: u32) -> Self {
        Self {
            decisions: Vec::new(),
            max_unsat,
        }
    }

    /// An item for the given decision prefix.
    #[must_use]
    pub fn new(decisions: Vec<Lit>, max_unsat: u32) -> Self {
        Self {
            decisions,
            max_unsat,
        }
    }

    /// Depth of the frontier; shallow items cover large subtrees.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.decisions.len()
    }

    /// Flattens the decisions into signed DIMACS integers for the wire.
    #[must_use]
    pub fn to_wire(&self) -> Vec<i32> {
        self.decisions.iter().map(|l| l.to_dimacs()).collect()
    }

    /// Rebuilds an item from wire form.
    pub fn from_wire(decisions: &[i32], max_unsat: u32) -> Result<Self> {
        let decisions = decisions
            .iter()
            .map(|&raw| {
                if raw == 0 {
                    Err(Error::Serialization(
                        "work item contains a zero literal".to_string(),
                    ))
                } else {
                    Ok(Lit::new(raw))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            decisions,
            max_unsat,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_round_trip() {
        let item = WorkItem::new(vec![Lit::new(3), Lit::new(-1), Lit::new(2)], 2);
        let wire = item.to_wire();
        assert_eq!(wire, vec![3, -1, 2]);
        assert_eq!(WorkItem::from_wire(&wire, 2).unwrap(), item);
    }

    #[test]
    fn test_zero_literal_rejected() {
        assert!(WorkItem::from_wire(&[1, 0, 2], 0).is_err());
    }

    #[test]
    fn test_root_is_shallowest() {
        assert_eq!(WorkItem::root(0).depth(), 0);
    }
}
