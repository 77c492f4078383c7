//! Nullable chain reader: fixture data with programmable faults.

use async_trait::async_trait;
use stake_chain::{
    AccountBalance, AccountStateReader, ChainError, ChainQuery, ChainSnapshot, ChainStateReader,
    EraRewardPoints, Nominations, SnapshotReader, StakingLedger, ValidatorPrefs,
};
use stake_types::{AccountId, Balance, EraIndex};
use std::collections::HashSet;
use std::sync::Mutex;

/// A chain reader backed by a [`ChainSnapshot`].
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullChainReader {
    inner: SnapshotReader,
    failing: Mutex<HashSet<ChainQuery>>,
    stalled: Mutex<HashSet<ChainQuery>>,
    log: Mutex<Vec<ChainQuery>>,
}

impl NullChainReader {
    pub fn new(snapshot: ChainSnapshot) -> Self {
        Self {
            inner: SnapshotReader::new(snapshot),
            failing: Mutex::new(HashSet::new()),
            stalled: Mutex::new(HashSet::new()),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Make `query` return [`ChainError::Unavailable`].
    pub fn fail_on(&self, query: ChainQuery) {
        self.failing.lock().unwrap().insert(query);
    }

    /// Make `query` never complete.
    pub fn stall_on(&self, query: ChainQuery) {
        self.stalled.lock().unwrap().insert(query);
    }

    /// Every query received so far, in arrival order.
    pub fn queries(&self) -> Vec<ChainQuery> {
        self.log.lock().unwrap().clone()
    }

    /// Forget recorded queries and injected faults.
    pub fn reset(&self) {
        self.failing.lock().unwrap().clear();
        self.stalled.lock().unwrap().clear();
        self.log.lock().unwrap().clear();
    }

    async fn enter(&self, query: ChainQuery) -> Result<(), ChainError> {
        self.log.lock().unwrap().push(query);
        if self.failing.lock().unwrap().contains(&query) {
            return Err(ChainError::Unavailable {
                query,
                reason: "injected failure".into(),
            });
        }
        let stalled = self.stalled.lock().unwrap().contains(&query);
        if stalled {
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}

#[async_trait]
impl ChainStateReader for NullChainReader {
    async fn bonded(&self) -> Result<Vec<(AccountId, AccountId)>, ChainError> {
        self.enter(ChainQuery::Bonded).await?;
        self.inner.bonded().await
    }

    async fn ledgers(&self) -> Result<Vec<(AccountId, StakingLedger)>, ChainError> {
        self.enter(ChainQuery::Ledgers).await?;
        self.inner.ledgers().await
    }

    async fn validators(&self) -> Result<Vec<(AccountId, ValidatorPrefs)>, ChainError> {
        self.enter(ChainQuery::Validators).await?;
        self.inner.validators().await
    }

    async fn nominators(&self) -> Result<Vec<(AccountId, Nominations)>, ChainError> {
        self.enter(ChainQuery::Nominators).await?;
        self.inner.nominators().await
    }

    async fn validator_count(&self) -> Result<u32, ChainError> {
        self.enter(ChainQuery::ValidatorCount).await?;
        self.inner.validator_count().await
    }

    async fn active_era(&self) -> Result<EraIndex, ChainError> {
        self.enter(ChainQuery::ActiveEra).await?;
        self.inner.active_era().await
    }

    async fn era_reward_points(&self, era: EraIndex) -> Result<EraRewardPoints, ChainError> {
        self.enter(ChainQuery::EraRewardPoints(era)).await?;
        self.inner.era_reward_points(era).await
    }
}

#[async_trait]
impl AccountStateReader for NullChainReader {
    async fn bonded_controller(&self, stash: &AccountId) -> Result<Option<AccountId>, ChainError> {
        self.enter(ChainQuery::BondedController).await?;
        self.inner.bonded_controller(stash).await
    }

    async fn ledger(&self, controller: &AccountId) -> Result<Option<StakingLedger>, ChainError> {
        self.enter(ChainQuery::Ledger).await?;
        self.inner.ledger(controller).await
    }

    async fn account_balance(&self, account: &AccountId) -> Result<AccountBalance, ChainError> {
        self.enter(ChainQuery::AccountBalance).await?;
        self.inner.account_balance(account).await
    }

    async fn current_era(&self) -> Result<EraIndex, ChainError> {
        self.enter(ChainQuery::CurrentEra).await?;
        self.inner.current_era().await
    }

    async fn existential_deposit(&self) -> Result<Balance, ChainError> {
        self.enter(ChainQuery::ExistentialDeposit).await?;
        self.inner.existential_deposit().await
    }
}
