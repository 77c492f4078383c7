//! Validator selection for nominators.
//!
//! Reads staking state through a [`ChainStateReader`](stake_chain::ChainStateReader),
//! elects a validator set with sequential Phragmén, estimates the return a
//! new nomination would earn with each elected validator and returns the
//! best eligible ones.
//!
//! The pipeline, as run by [`SelectionService::select_validators`]:
//!
//! 1. [`fetch_chain_data`]: bonds, ledgers, prefs, nominations, seat count
//!    and the reward points of the recent era window.
//! 2. [`build_voters`]: nominators plus validator self-votes.
//! 3. [`stake_phragmen::elect`] with one seat per validator slot.
//! 4. [`order_validators_by_return`]: return estimate, [`ValidatorFilters`],
//!    descending sort, truncation.

pub mod chain_data;
pub mod config;
pub mod error;
pub mod filters;
pub mod performance;
pub mod ranking;
pub mod service;
pub mod voters;

pub use chain_data::{era_window, fetch_chain_data, ChainData};
pub use config::SelectionConfig;
pub use error::SelectionError;
pub use filters::{parse_static_list, Rejection, StaticListClient, StaticListMode, ValidatorFilters};
pub use performance::PerformanceHistory;
pub use ranking::{
    average_stake, compute_return, order_validators_by_return, ElectedWithReturn, RankingParams,
};
pub use service::SelectionService;
pub use voters::build_voters;
