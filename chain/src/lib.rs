//! Chain-state access for the validator selection engine.
//!
//! The rest of the workspace depends only on the reader traits defined here.
//! [`SnapshotReader`] serves a JSON chain snapshot; test doubles live in
//! `stake-nullables`.

pub mod balances;
pub mod error;
pub mod query;
pub mod reader;
pub mod records;
pub mod snapshot;

pub use balances::{fetch_staking_balances, AccountStakingState, StakingBalances, UnlockingBalance};
pub use error::ChainError;
pub use query::ChainQuery;
pub use reader::{AccountStateReader, ChainStateReader};
pub use records::{
    AccountBalance, EraRewardPoints, Nominations, StakingLedger, UnlockChunk, ValidatorPrefs,
};
pub use snapshot::{ChainSnapshot, SnapshotReader};
