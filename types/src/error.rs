//! Errors raised while constructing the shared types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("account id must not be empty")]
    EmptyAccountId,

    #[error("invalid balance {raw:?}: {reason}")]
    InvalidBalance { raw: String, reason: String },

    #[error("perbill parts {0} exceed 1_000_000_000")]
    PerbillOutOfRange(u32),
}
