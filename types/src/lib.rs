//! Fundamental types for validator selection.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account identifiers, decimal balances, era indices and fixed-point commission.

pub mod address;
pub mod balance;
pub mod error;
pub mod perbill;

pub use address::AccountId;
pub use balance::{parse_balance, saturating_div, Balance};
pub use error::TypesError;
pub use perbill::Perbill;

/// Index of a staking era.
pub type EraIndex = u32;

/// Reward points earned by a validator within one era.
pub type RewardPoints = u32;
