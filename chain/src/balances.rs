//! Staking balances of a single account.
//!
//! An account may be a stash (it has a controller bound), a controller (it
//! owns a ledger), both, or neither. The figures shown to a staker depend on
//! which role the account plays:
//!
//! * `staked`: active bonded funds;
//! * `unbonding`: bonded funds on their way out;
//! * `redeemable`: unbonded funds whose lock has expired;
//! * `unlocking`: still-locked chunks grouped by eras remaining;
//! * `available`: what can still be staked (stash) or re-bonded (controller).

use serde::{Deserialize, Serialize};
use stake_types::{AccountId, Balance, EraIndex};

use crate::{AccountBalance, AccountStateReader, ChainError, StakingLedger};

/// Funds still locked, with the number of eras until they unlock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockingBalance {
    pub value: Balance,
    pub eras_remaining: EraIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingBalances {
    pub staked: Balance,
    pub unbonding: Balance,
    pub redeemable: Balance,
    pub unlocking: Vec<UnlockingBalance>,
    pub available: Balance,
    pub total: Balance,
    /// The account is a stash whose controller is another account.
    pub only_stash: bool,
    pub stash: AccountId,
    pub controller: AccountId,
}

/// Chain state gathered for one account.
#[derive(Clone, Debug)]
pub struct AccountStakingState {
    pub account: AccountId,
    /// Controller bound to `account` when it is a stash.
    pub controller: Option<AccountId>,
    /// Ledger owned by `account` when it is a controller.
    pub own_ledger: Option<StakingLedger>,
    /// Ledger of the bound controller when the account is only a stash.
    pub controller_ledger: Option<StakingLedger>,
    /// Balance of the stash account.
    pub stash_balance: AccountBalance,
    pub existential_deposit: Balance,
    pub current_era: EraIndex,
}

impl StakingBalances {
    /// Balances of an account that is neither stash nor controller.
    fn unstaked(account: &AccountId, balance: AccountBalance, existential_deposit: Balance) -> Self {
        Self {
            staked: Balance::ZERO,
            unbonding: Balance::ZERO,
            redeemable: Balance::ZERO,
            unlocking: Vec::new(),
            available: floor_sub(balance.free, existential_deposit),
            total: balance.free + balance.reserved,
            only_stash: false,
            stash: account.clone(),
            controller: account.clone(),
        }
    }

    pub fn compute(state: &AccountStakingState) -> Result<Self, ChainError> {
        let is_stash = state.controller.is_some();
        let is_controller = state.own_ledger.is_some();
        let balance = state.stash_balance;

        let (controller, ledger) = match (&state.own_ledger, &state.controller) {
            (Some(ledger), _) => (state.account.clone(), ledger),
            (None, Some(controller)) => {
                let ledger = state
                    .controller_ledger
                    .as_ref()
                    .ok_or_else(|| ChainError::MissingLedger(controller.clone()))?;
                (controller.clone(), ledger)
            }
            (None, None) => {
                return Ok(Self::unstaked(&state.account, balance, state.existential_deposit));
            }
        };
        let stash = if is_stash {
            state.account.clone()
        } else {
            ledger.stash.clone()
        };

        let staked = ledger.active;
        let unbonding = ledger.unbonding();
        let era = state.current_era;
        let redeemable = ledger
            .unlocking
            .iter()
            .filter(|chunk| chunk.era <= era)
            .map(|chunk| chunk.value)
            .sum();
        let unlocking = group_unlocking(ledger, era);

        let only_stash = is_stash && !is_controller;
        let bonded = if only_stash { ledger.total } else { staked };
        let available = if is_stash {
            floor_sub(
                floor_sub(balance.free, bonded),
                state.existential_deposit,
            )
        } else {
            unbonding
        };

        Ok(Self {
            staked,
            unbonding,
            redeemable,
            unlocking,
            available,
            total: balance.free + balance.reserved,
            only_stash,
            stash,
            controller,
        })
    }
}

/// Sum locked chunks per eras-remaining, keeping first-appearance order.
fn group_unlocking(ledger: &StakingLedger, current_era: EraIndex) -> Vec<UnlockingBalance> {
    let mut grouped: Vec<UnlockingBalance> = Vec::new();
    for chunk in ledger.unlocking.iter().filter(|c| c.era > current_era) {
        let eras_remaining = chunk.era - current_era;
        match grouped.iter_mut().find(|g| g.eras_remaining == eras_remaining) {
            Some(group) => group.value += chunk.value,
            None => grouped.push(UnlockingBalance {
                value: chunk.value,
                eras_remaining,
            }),
        }
    }
    grouped
}

fn floor_sub(a: Balance, b: Balance) -> Balance {
    if a > b {
        a - b
    } else {
        Balance::ZERO
    }
}

/// Gather the chain state of `account` and compute its staking balances.
pub async fn fetch_staking_balances<R: AccountStateReader + ?Sized>(
    reader: &R,
    account: &AccountId,
) -> Result<StakingBalances, ChainError> {
    let (current_era, controller, own_ledger, existential_deposit) = futures_util::try_join!(
        reader.current_era(),
        reader.bonded_controller(account),
        reader.ledger(account),
        reader.existential_deposit(),
    )?;

    // A controller that is not itself bonded reports the balance of its stash.
    let stash = match (&controller, &own_ledger) {
        (None, Some(ledger)) => ledger.stash.clone(),
        _ => account.clone(),
    };
    let controller_ledger = match (&controller, &own_ledger) {
        (Some(controller), None) => reader.ledger(controller).await?,
        _ => None,
    };
    let stash_balance = reader.account_balance(&stash).await?;

    let state = AccountStakingState {
        account: account.clone(),
        controller,
        own_ledger,
        controller_ledger,
        stash_balance,
        existential_deposit,
        current_era,
    };
    StakingBalances::compute(&state)
}
