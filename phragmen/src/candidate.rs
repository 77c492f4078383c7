//! Candidate arena and graph setup.
//!
//! Candidates live in a `Vec` addressed by slot index; edges refer to their
//! candidate by slot. Slot order is the order in which a validator id first
//! appears in the voter list, and every iteration over the arena (score
//! resets, winner selection) follows it.

use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use stake_types::{AccountId, Balance};

use crate::voter::{Edge, Nominator, Voter};

/// Validator-side node of the election graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub validator_id: AccountId,
    /// Sum of the stakes of every voter listing this candidate. Fixed after setup.
    pub approval_stake: Balance,
    /// Stake assigned to this candidate once elected.
    pub backed_stake: Balance,
    pub elected: bool,
    /// Phragmén score; the winning score is kept after election.
    pub score: Balance,
    /// Number of voters with an edge to this candidate. Fixed after setup.
    pub backers: u32,
}

impl Candidate {
    fn new(validator_id: AccountId) -> Self {
        Self {
            validator_id,
            approval_stake: Balance::ZERO,
            backed_stake: Balance::ZERO,
            elected: false,
            score: Balance::ZERO,
            backers: 0,
        }
    }

    pub fn has_approval(&self) -> bool {
        self.approval_stake > Balance::ZERO
    }
}

/// Slot-addressed candidate storage with an id → slot lookup.
#[derive(Clone, Debug, Default)]
pub struct CandidateArena {
    candidates: Vec<Candidate>,
    slots: HashMap<AccountId, usize>,
}

impl CandidateArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot of `validator_id`, creating an empty candidate on first reference.
    fn slot_or_insert(&mut self, validator_id: &AccountId) -> usize {
        if let Some(&slot) = self.slots.get(validator_id) {
            return slot;
        }
        let slot = self.candidates.len();
        self.candidates.push(Candidate::new(validator_id.clone()));
        self.slots.insert(validator_id.clone(), slot);
        slot
    }

    pub fn get(&self, validator_id: &AccountId) -> Option<&Candidate> {
        self.slots.get(validator_id).map(|&slot| &self.candidates[slot])
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Candidate> {
        self.candidates.iter_mut()
    }
}

impl Index<usize> for CandidateArena {
    type Output = Candidate;

    fn index(&self, slot: usize) -> &Candidate {
        &self.candidates[slot]
    }
}

impl IndexMut<usize> for CandidateArena {
    fn index_mut(&mut self, slot: usize) -> &mut Candidate {
        &mut self.candidates[slot]
    }
}

/// Build the bipartite voter/candidate graph.
///
/// Accumulates approval stake and backer counts per candidate and creates one
/// zeroed nominator per voter with one zeroed edge per target.
pub fn setup(voters: &[Voter]) -> (CandidateArena, Vec<Nominator>) {
    let mut arena = CandidateArena::new();
    let nominators = voters
        .iter()
        .map(|voter| {
            let edges = voter
                .targets
                .iter()
                .map(|target| {
                    let slot = arena.slot_or_insert(target);
                    let candidate = &mut arena[slot];
                    candidate.approval_stake += voter.stake;
                    candidate.backers += 1;
                    Edge::new(target.clone(), slot)
                })
                .collect();
            Nominator {
                nominator_id: voter.nominator_id.clone(),
                budget: voter.stake,
                edges,
                load: Balance::ZERO,
            }
        })
        .collect();
    (arena, nominators)
}
