//! Voter-side nodes of the election graph.

use serde::{Deserialize, Serialize};
use stake_types::{AccountId, Balance};

/// A ballot: a nominator (any target set) or a validator's self-vote
/// (singleton target equal to itself).
///
/// Targets are expected to be unique; duplicates and negative stakes are not
/// rejected and are the caller's responsibility.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub nominator_id: AccountId,
    pub stake: Balance,
    pub targets: Vec<AccountId>,
}

impl Voter {
    pub fn new(nominator_id: impl Into<AccountId>, stake: Balance, targets: Vec<AccountId>) -> Self {
        Self {
            nominator_id: nominator_id.into(),
            stake,
            targets,
        }
    }

    /// A validator backing itself with its own bonded stake.
    pub fn self_vote(validator_id: AccountId, stake: Balance) -> Self {
        Self {
            targets: vec![validator_id.clone()],
            nominator_id: validator_id,
            stake,
        }
    }
}

/// One nominator → candidate edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub validator_id: AccountId,
    /// Arena slot of the candidate this edge points at.
    pub(crate) candidate: usize,
    /// Share of the nominator's load attributed to this candidate.
    pub load: Balance,
    /// Portion of the nominator's budget assigned to this candidate.
    pub weight: Balance,
}

impl Edge {
    pub(crate) fn new(validator_id: AccountId, candidate: usize) -> Self {
        Self {
            validator_id,
            candidate,
            load: Balance::ZERO,
            weight: Balance::ZERO,
        }
    }
}

/// Election-time state of one voter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nominator {
    pub nominator_id: AccountId,
    pub budget: Balance,
    pub edges: Vec<Edge>,
    /// Non-decreasing potential; equals the score of the last winner this
    /// nominator backed.
    pub load: Balance,
}

impl Nominator {
    /// Sum of edge weights, i.e. how much of the budget is currently assigned.
    pub fn assigned(&self) -> Balance {
        self.edges.iter().map(|e| e.weight).sum()
    }
}
