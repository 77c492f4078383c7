//! One consistent read of everything a selection needs.

use futures_util::future::try_join_all;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::ops::RangeInclusive;
use std::time::Duration;

use stake_chain::{
    ChainError, ChainQuery, ChainStateReader, EraRewardPoints, Nominations, StakingLedger,
    ValidatorPrefs,
};
use stake_types::{AccountId, EraIndex};

use crate::PerformanceHistory;

/// Chain state gathered for one selection.
#[derive(Clone, Debug, Default)]
pub struct ChainData {
    /// stash -> controller
    pub controllers: HashMap<AccountId, AccountId>,
    /// controller -> ledger
    pub ledgers: HashMap<AccountId, StakingLedger>,
    pub validators: BTreeMap<AccountId, ValidatorPrefs>,
    pub nominators: BTreeMap<AccountId, Nominations>,
    /// Seats in the validator set.
    pub count: u32,
    pub active_era: EraIndex,
    pub performance: PerformanceHistory,
}

impl ChainData {
    /// Ledger of the controller bonded to `stash`, if both exist.
    pub fn stash_ledger(&self, stash: &AccountId) -> Option<&StakingLedger> {
        self.controllers.get(stash).and_then(|c| self.ledgers.get(c))
    }
}

/// Eras whose reward points are sampled: `eras` past eras plus the active one,
/// clamped at genesis.
pub fn era_window(active_era: EraIndex, eras: u32) -> RangeInclusive<EraIndex> {
    let first = if active_era > eras { active_era - eras } else { 0 };
    first..=active_era
}

async fn timed<T>(
    query: ChainQuery,
    limit: Duration,
    read: impl Future<Output = Result<T, ChainError>>,
) -> Result<T, ChainError> {
    tokio::time::timeout(limit, read)
        .await
        .map_err(|_| ChainError::Timeout { query })?
}

/// Read current staking state and the reward points of the era window.
///
/// The six bulk reads run concurrently, then all era reads run concurrently.
/// Any failed or timed-out read fails the whole fetch.
pub async fn fetch_chain_data<R: ChainStateReader + ?Sized>(
    reader: &R,
    eras: u32,
    limit: Duration,
) -> Result<ChainData, ChainError> {
    let (bonded, ledgers, validators, nominators, count, active_era) = tokio::try_join!(
        timed(ChainQuery::Bonded, limit, reader.bonded()),
        timed(ChainQuery::Ledgers, limit, reader.ledgers()),
        timed(ChainQuery::Validators, limit, reader.validators()),
        timed(ChainQuery::Nominators, limit, reader.nominators()),
        timed(ChainQuery::ValidatorCount, limit, reader.validator_count()),
        timed(ChainQuery::ActiveEra, limit, reader.active_era()),
    )?;

    let window = era_window(active_era, eras);
    tracing::debug!(
        first = window.start(),
        last = window.end(),
        "fetching era reward points"
    );
    let points: Vec<EraRewardPoints> = try_join_all(window.map(move |era| {
        timed(
            ChainQuery::EraRewardPoints(era),
            limit,
            reader.era_reward_points(era),
        )
    }))
    .await?;

    let data = ChainData {
        controllers: bonded.into_iter().collect(),
        ledgers: ledgers.into_iter().collect(),
        validators: validators.into_iter().collect(),
        nominators: nominators.into_iter().collect(),
        count,
        active_era,
        performance: PerformanceHistory::from_eras(&points),
    };
    tracing::debug!(
        controllers = data.controllers.len(),
        validators = data.validators.len(),
        nominators = data.nominators.len(),
        count = data.count,
        active_era = data.active_era,
        "chain data fetched"
    );
    Ok(data)
}
