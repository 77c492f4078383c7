//! Chain state captured in a JSON document.
//!
//! A snapshot holds the result of every query the selection engine makes, so
//! a selection can be replayed offline. [`SnapshotReader`] serves it through
//! the reader traits.
//!
//! ```json
//! {
//!   "bonded": { "stash": "controller" },
//!   "ledgers": { "controller": { "stash": "stash", "total": "100", "active": "100" } },
//!   "validators": { "stash": { "commission": 50000000, "blocked": false } },
//!   "nominators": { "nom": { "targets": ["stash"] } },
//!   "validator_count": 1,
//!   "active_era": 10,
//!   "era_points": { "10": { "total": 20, "individual": { "stash": 20 } } }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use stake_types::{AccountId, Balance, EraIndex, RewardPoints};

use crate::{
    AccountBalance, AccountStateReader, ChainError, ChainQuery, ChainStateReader,
    EraRewardPoints, Nominations, StakingLedger, ValidatorPrefs,
};

/// Serializable chain state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    #[serde(default)]
    pub bonded: BTreeMap<AccountId, AccountId>,
    #[serde(default)]
    pub ledgers: BTreeMap<AccountId, StakingLedger>,
    #[serde(default)]
    pub validators: BTreeMap<AccountId, ValidatorPrefs>,
    #[serde(default)]
    pub nominators: BTreeMap<AccountId, Nominations>,
    #[serde(default)]
    pub validator_count: u32,
    #[serde(default)]
    pub active_era: Option<EraIndex>,
    #[serde(default)]
    pub current_era: Option<EraIndex>,
    #[serde(default)]
    pub era_points: BTreeMap<EraIndex, EraRewardPoints>,
    #[serde(default)]
    pub accounts: BTreeMap<AccountId, AccountBalance>,
    #[serde(default)]
    pub existential_deposit: Balance,
}

impl ChainSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json_str(s: &str) -> Result<Self, ChainError> {
        serde_json::from_str(s).map_err(|e| ChainError::Snapshot(e.to_string()))
    }

    /// Load a snapshot from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ChainError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ChainError::Snapshot(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String, ChainError> {
        serde_json::to_string_pretty(self).map_err(|e| ChainError::Snapshot(e.to_string()))
    }

    /// Bond `stash` to `controller` with `active` funds fully staked.
    pub fn with_bond(mut self, stash: &AccountId, controller: &AccountId, active: Balance) -> Self {
        self.bonded.insert(stash.clone(), controller.clone());
        self.ledgers.insert(
            controller.clone(),
            StakingLedger {
                stash: stash.clone(),
                total: active,
                active,
                unlocking: Vec::new(),
            },
        );
        self
    }

    /// Register a self-controlled validator with `stake` bonded.
    pub fn with_validator(mut self, id: &AccountId, prefs: ValidatorPrefs, stake: Balance) -> Self {
        self.validators.insert(id.clone(), prefs);
        self.validator_count = self.validator_count.max(self.validators.len() as u32);
        self.with_bond(id, id, stake)
    }

    /// Register a self-controlled nominator with `stake` bonded.
    pub fn with_nominator(mut self, id: &AccountId, stake: Balance, targets: &[AccountId]) -> Self {
        self.nominators.insert(
            id.clone(),
            Nominations {
                targets: targets.to_vec(),
            },
        );
        self.with_bond(id, id, stake)
    }

    /// Record the reward points earned in `era`.
    pub fn with_era_points(mut self, era: EraIndex, points: &[(AccountId, RewardPoints)]) -> Self {
        let individual: BTreeMap<AccountId, RewardPoints> = points.iter().cloned().collect();
        let total = individual.values().sum();
        self.era_points.insert(era, EraRewardPoints { total, individual });
        self
    }

    pub fn with_active_era(mut self, era: EraIndex) -> Self {
        self.active_era = Some(era);
        self.current_era.get_or_insert(era);
        self
    }

    pub fn with_validator_count(mut self, count: u32) -> Self {
        self.validator_count = count;
        self
    }

    pub fn with_account(mut self, id: &AccountId, balance: AccountBalance) -> Self {
        self.accounts.insert(id.clone(), balance);
        self
    }
}

/// Serves a [`ChainSnapshot`] through the reader traits.
#[derive(Clone, Debug)]
pub struct SnapshotReader {
    snapshot: ChainSnapshot,
}

impl SnapshotReader {
    pub fn new(snapshot: ChainSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ChainError> {
        let snapshot = ChainSnapshot::from_json_file(path)?;
        tracing::debug!(
            validators = snapshot.validators.len(),
            nominators = snapshot.nominators.len(),
            eras = snapshot.era_points.len(),
            "loaded chain snapshot"
        );
        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &ChainSnapshot {
        &self.snapshot
    }
}

fn entries<V: Clone>(map: &BTreeMap<AccountId, V>) -> Vec<(AccountId, V)> {
    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

#[async_trait]
impl ChainStateReader for SnapshotReader {
    async fn bonded(&self) -> Result<Vec<(AccountId, AccountId)>, ChainError> {
        Ok(entries(&self.snapshot.bonded))
    }

    async fn ledgers(&self) -> Result<Vec<(AccountId, StakingLedger)>, ChainError> {
        Ok(entries(&self.snapshot.ledgers))
    }

    async fn validators(&self) -> Result<Vec<(AccountId, ValidatorPrefs)>, ChainError> {
        Ok(entries(&self.snapshot.validators))
    }

    async fn nominators(&self) -> Result<Vec<(AccountId, Nominations)>, ChainError> {
        Ok(entries(&self.snapshot.nominators))
    }

    async fn validator_count(&self) -> Result<u32, ChainError> {
        Ok(self.snapshot.validator_count)
    }

    async fn active_era(&self) -> Result<EraIndex, ChainError> {
        self.snapshot.active_era.ok_or(ChainError::Unavailable {
            query: ChainQuery::ActiveEra,
            reason: "snapshot has no active era".into(),
        })
    }

    async fn era_reward_points(&self, era: EraIndex) -> Result<EraRewardPoints, ChainError> {
        // Eras without recorded points read as empty, as on chain.
        Ok(self.snapshot.era_points.get(&era).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl AccountStateReader for SnapshotReader {
    async fn bonded_controller(&self, stash: &AccountId) -> Result<Option<AccountId>, ChainError> {
        Ok(self.snapshot.bonded.get(stash).cloned())
    }

    async fn ledger(&self, controller: &AccountId) -> Result<Option<StakingLedger>, ChainError> {
        Ok(self.snapshot.ledgers.get(controller).cloned())
    }

    async fn account_balance(&self, account: &AccountId) -> Result<AccountBalance, ChainError> {
        Ok(self.snapshot.accounts.get(account).copied().unwrap_or_default())
    }

    async fn current_era(&self) -> Result<EraIndex, ChainError> {
        self.snapshot.current_era.ok_or(ChainError::Unavailable {
            query: ChainQuery::CurrentEra,
            reason: "snapshot has no current era".into(),
        })
    }

    async fn existential_deposit(&self) -> Result<Balance, ChainError> {
        Ok(self.snapshot.existential_deposit)
    }
}
