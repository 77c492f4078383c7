use stake_types::AccountId;
use thiserror::Error;

use crate::ChainQuery;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("chain query {query} failed: {reason}")]
    Unavailable { query: ChainQuery, reason: String },

    #[error("chain query {query} timed out")]
    Timeout { query: ChainQuery },

    #[error("no staking ledger for controller {0}")]
    MissingLedger(AccountId),

    #[error("invalid chain snapshot: {0}")]
    Snapshot(String),
}
