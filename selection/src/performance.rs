//! Relative reward-point performance per validator.

use std::collections::BTreeMap;

use stake_chain::EraRewardPoints;
use stake_types::{AccountId, Balance};

/// Per-validator samples of `points / mean points` across eras.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PerformanceHistory {
    samples: BTreeMap<AccountId, Vec<Balance>>,
}

impl PerformanceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the history from eras in window order.
    pub fn from_eras<'a>(eras: impl IntoIterator<Item = &'a EraRewardPoints>) -> Self {
        let mut history = Self::new();
        for era in eras {
            history.record_era(era);
        }
        history
    }

    /// Add one sample for every validator that earned points in `era`.
    ///
    /// The mean is taken over the validators listed in the era, so only
    /// they receive samples. An era without points adds nothing.
    pub fn record_era(&mut self, era: &EraRewardPoints) {
        let count = era.individual.len();
        let total: u64 = era.individual.values().map(|&p| u64::from(p)).sum();
        if count == 0 || total == 0 {
            return;
        }
        let mean = Balance::from(total) / Balance::from(count as u64);
        for (validator, &points) in &era.individual {
            self.samples
                .entry(validator.clone())
                .or_default()
                .push(Balance::from(points) / mean);
        }
    }

    pub fn samples(&self, validator: &AccountId) -> &[Balance] {
        self.samples.get(validator).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mean of the validator's samples, or `default` without any.
    pub fn average(&self, validator: &AccountId, default: Balance) -> Balance {
        let samples = self.samples(validator);
        if samples.is_empty() {
            return default;
        }
        samples.iter().sum::<Balance>() / Balance::from(samples.len() as u64)
    }

    /// Number of validators with at least one sample.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
