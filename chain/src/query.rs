//! Names of the individual chain reads, used in errors and logs.

use serde::{Deserialize, Serialize};
use stake_types::EraIndex;
use std::fmt;

/// One read against chain state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainQuery {
    Bonded,
    Ledgers,
    Validators,
    Nominators,
    ValidatorCount,
    ActiveEra,
    EraRewardPoints(EraIndex),
    BondedController,
    Ledger,
    AccountBalance,
    CurrentEra,
    ExistentialDeposit,
}

impl ChainQuery {
    /// Storage item name as exposed by the staking pallet.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bonded => "staking.bonded",
            Self::Ledgers => "staking.ledger",
            Self::Validators => "staking.validators",
            Self::Nominators => "staking.nominators",
            Self::ValidatorCount => "staking.validatorCount",
            Self::ActiveEra => "staking.activeEra",
            Self::EraRewardPoints(_) => "staking.erasRewardPoints",
            Self::BondedController => "staking.bonded(account)",
            Self::Ledger => "staking.ledger(controller)",
            Self::AccountBalance => "system.account",
            Self::CurrentEra => "staking.currentEra",
            Self::ExistentialDeposit => "balances.existentialDeposit",
        }
    }
}

impl fmt::Display for ChainQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EraRewardPoints(era) => write!(f, "{}({era})", self.as_str()),
            other => f.write_str(other.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn era_query_displays_index() {
        assert_eq!(
            ChainQuery::EraRewardPoints(42).to_string(),
            "staking.erasRewardPoints(42)"
        );
        assert_eq!(ChainQuery::Bonded.to_string(), "staking.bonded");
    }
}
