//! Chain-state records consumed by the selection engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use stake_types::{AccountId, Balance, EraIndex, Perbill, RewardPoints};

/// Funds scheduled to become redeemable at `era`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockChunk {
    pub value: Balance,
    pub era: EraIndex,
}

/// Bonded funds of one stash, keyed on chain by its controller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingLedger {
    pub stash: AccountId,
    /// Active plus unbonding funds.
    pub total: Balance,
    /// Funds currently at stake.
    pub active: Balance,
    #[serde(default)]
    pub unlocking: Vec<UnlockChunk>,
}

impl StakingLedger {
    /// Funds on their way out of the bond.
    pub fn unbonding(&self) -> Balance {
        self.total - self.active
    }
}

/// A validator's preferences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorPrefs {
    pub commission: Perbill,
    /// Whether the validator refuses new nominations.
    #[serde(default)]
    pub blocked: bool,
}

/// A nominator's chosen targets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nominations {
    pub targets: Vec<AccountId>,
}

/// Reward points handed out during one era.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraRewardPoints {
    #[serde(default)]
    pub total: RewardPoints,
    pub individual: BTreeMap<AccountId, RewardPoints>,
}

/// Free and reserved balance of an account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub free: Balance,
    #[serde(default)]
    pub reserved: Balance,
}
