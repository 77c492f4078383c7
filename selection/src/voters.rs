//! Voter list construction from chain data.

use std::collections::HashSet;

use stake_phragmen::Voter;
use stake_types::{AccountId, Balance};

use crate::{ChainData, SelectionError};

fn active_stake(data: &ChainData, stash: &AccountId) -> Result<Balance, SelectionError> {
    let controller = data
        .controllers
        .get(stash)
        .ok_or_else(|| SelectionError::MissingController(stash.clone()))?;
    data.ledgers
        .get(controller)
        .map(|ledger| ledger.active)
        .ok_or_else(|| SelectionError::MissingLedger(controller.clone()))
}

/// Nominators first, ascending by id and without `exclude`, then one
/// self-vote per validator, ascending by id.
///
/// Targets keep their first occurrence and must be current validators.
pub fn build_voters(data: &ChainData, exclude: &AccountId) -> Result<Vec<Voter>, SelectionError> {
    let mut voters = Vec::with_capacity(data.nominators.len() + data.validators.len());

    for (nominator, nominations) in &data.nominators {
        if nominator == exclude {
            continue;
        }
        let mut seen = HashSet::new();
        let targets: Vec<AccountId> = nominations
            .targets
            .iter()
            .filter(|t| seen.insert(*t))
            .filter(|t| data.validators.contains_key(*t))
            .cloned()
            .collect();
        voters.push(Voter::new(nominator.clone(), active_stake(data, nominator)?, targets));
    }

    for validator in data.validators.keys() {
        voters.push(Voter::self_vote(validator.clone(), active_stake(data, validator)?));
    }

    Ok(voters)
}
