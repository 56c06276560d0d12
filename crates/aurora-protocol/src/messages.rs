//! Distributor message types.

use rkyv::{Archive, Deserialize, Serialize};

/// A suspended branch in wire form: the decision literals in DIMACS
/// coding plus the unsat bound they run under.
#[derive(Archive, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub struct WireItem {
    /// Decision literals, outermost first, nonzero DIMACS integers.
    pub decisions: Vec<i32>,
    /// The falsified-clause bound.
    pub max_unsat: u32,
}

/// A solution in wire form: the packed assignment bits plus counts.
#[derive(Archive, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub struct WireSolution {
    /// Assignment bit-pattern, one bit per variable.
    pub bits: Vec<u64>,
    /// Number of variables packed into `bits`.
    pub num_vars: u32,
    /// Falsified-clause count of the assignment.
    pub unsat: u32,
}

/// Peer-to-peer distributor messages.
#[derive(Archive, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub enum PeerMessage {
    /// An idle rank asking a peer for work.
    StealRequest,
    /// The peer's answer: one shed branch, or nothing to share.
    StealReply(Option<WireItem>),
    /// The circulating termination token. `black` means some rank
    /// shipped work since the token last passed it.
    Token { black: bool },
    /// Rank 0's broadcast: global quiescence reached, wrap up.
    Done,
    /// A rank's locally deduplicated solutions, sent to rank 0 after
    /// `Done`.
    SolutionBatch(Vec<WireSolution>),
}
