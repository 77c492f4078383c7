//! Capabilities for reading chain state.
//!
//! The selection engine never talks to a node directly; it is handed a
//! reader. Live clients, JSON snapshots and test doubles all implement the
//! same traits.

use async_trait::async_trait;
use stake_types::{AccountId, Balance, EraIndex};

use crate::{
    AccountBalance, ChainError, EraRewardPoints, Nominations, StakingLedger, ValidatorPrefs,
};

/// Bulk staking state needed to run a validator election.
#[async_trait]
pub trait ChainStateReader: Send + Sync {
    /// Every stash → controller binding.
    async fn bonded(&self) -> Result<Vec<(AccountId, AccountId)>, ChainError>;

    /// Every staking ledger, keyed by controller.
    async fn ledgers(&self) -> Result<Vec<(AccountId, StakingLedger)>, ChainError>;

    /// Every validator candidate and its preferences.
    async fn validators(&self) -> Result<Vec<(AccountId, ValidatorPrefs)>, ChainError>;

    /// Every nominator and its targets.
    async fn nominators(&self) -> Result<Vec<(AccountId, Nominations)>, ChainError>;

    /// Target number of active validators.
    async fn validator_count(&self) -> Result<u32, ChainError>;

    /// Index of the currently active era.
    async fn active_era(&self) -> Result<EraIndex, ChainError>;

    /// Reward points for `era`.
    async fn era_reward_points(&self, era: EraIndex) -> Result<EraRewardPoints, ChainError>;
}

/// Per-account staking state, used to compute staking balances.
#[async_trait]
pub trait AccountStateReader: Send + Sync {
    /// Controller bound to `stash`, if `stash` is bonded.
    async fn bonded_controller(&self, stash: &AccountId) -> Result<Option<AccountId>, ChainError>;

    /// Ledger controlled by `controller`, if any.
    async fn ledger(&self, controller: &AccountId) -> Result<Option<StakingLedger>, ChainError>;

    async fn account_balance(&self, account: &AccountId) -> Result<AccountBalance, ChainError>;

    /// Era currently being planned (may run ahead of the active era).
    async fn current_era(&self) -> Result<EraIndex, ChainError>;

    /// Minimum balance an account must keep to exist.
    async fn existential_deposit(&self) -> Result<Balance, ChainError>;
}
