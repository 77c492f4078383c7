//! Election results.

use serde::{Deserialize, Serialize};
use stake_types::{AccountId, Balance};

use crate::voter::Nominator;

/// An elected candidate and the stake assigned to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectedValidator {
    pub validator_id: AccountId,
    pub backed_stake: Balance,
    /// Score at which the candidate was elected.
    pub score: Balance,
    pub backers: u32,
}

/// Final nominator state plus the elected set, descending by backed stake.
#[derive(Clone, Debug, Default)]
pub struct ElectionOutcome {
    pub nominators: Vec<Nominator>,
    pub elected: Vec<ElectedValidator>,
}

impl ElectionOutcome {
    pub fn is_empty(&self) -> bool {
        self.elected.is_empty()
    }

    /// Stake assigned across the whole elected set.
    pub fn total_backing(&self) -> Balance {
        self.elected.iter().map(|v| v.backed_stake).sum()
    }

    pub fn min_backing(&self) -> Option<Balance> {
        self.elected.iter().map(|v| v.backed_stake).min()
    }

    pub fn max_backing(&self) -> Option<Balance> {
        self.elected.iter().map(|v| v.backed_stake).max()
    }

    pub fn get(&self, validator_id: &AccountId) -> Option<&ElectedValidator> {
        self.elected.iter().find(|v| &v.validator_id == validator_id)
    }
}
