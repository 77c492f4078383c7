use stake_chain::ChainError;
use stake_types::AccountId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("no controller bonded to stash {0}")]
    MissingController(AccountId),

    #[error("no staking ledger for controller {0}")]
    MissingLedger(AccountId),

    #[error("config error: {0}")]
    Config(String),

    #[error("static list fetch failed: {0}")]
    StaticList(String),
}
