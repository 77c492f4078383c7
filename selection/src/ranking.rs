//! Estimated return per elected validator, and the final ranking.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use stake_chain::ValidatorPrefs;
use stake_phragmen::ElectedValidator;
use stake_types::{saturating_div, AccountId, Balance};

use crate::{PerformanceHistory, ValidatorFilters};

/// An elected validator with its estimated nominator return.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectedWithReturn {
    pub validator_id: AccountId,
    pub backed_stake: Balance,
    pub score: Balance,
    pub backers: u32,
    #[serde(rename = "return")]
    pub estimated_return: Balance,
    pub blocked: bool,
}

/// `avg_performance * (avg_stake / backed_stake) * (1 - commission)`.
///
/// A validator without backing gets a stake ratio of one. Results too large
/// for a [`Balance`] saturate at [`Balance::MAX`].
pub fn compute_return(
    elected: &ElectedValidator,
    prefs: &ValidatorPrefs,
    avg_performance: Balance,
    avg_stake: Balance,
) -> ElectedWithReturn {
    let stake_ratio = if elected.backed_stake.is_zero() {
        Balance::ONE
    } else {
        saturating_div(avg_stake, elected.backed_stake)
    };
    let keep = Balance::ONE - prefs.commission.to_fraction();
    ElectedWithReturn {
        validator_id: elected.validator_id.clone(),
        backed_stake: elected.backed_stake,
        score: elected.score,
        backers: elected.backers,
        estimated_return: avg_performance.saturating_mul(stake_ratio).saturating_mul(keep),
        blocked: prefs.blocked,
    }
}

/// Mean backed stake of the elected set.
pub fn average_stake(elected: &[ElectedValidator]) -> Balance {
    if elected.is_empty() {
        return Balance::ZERO;
    }
    elected.iter().map(|v| v.backed_stake).sum::<Balance>() / Balance::from(elected.len() as u64)
}

pub struct RankingParams {
    pub target_count: usize,
    pub default_performance: Balance,
}

/// Compute returns, drop ineligible validators, sort descending by return
/// and keep the first `target_count`.
///
/// The sort is stable; equal returns keep election-outcome order.
pub fn order_validators_by_return(
    elected: &[ElectedValidator],
    validators: &BTreeMap<AccountId, ValidatorPrefs>,
    performance: &PerformanceHistory,
    filters: &ValidatorFilters,
    params: &RankingParams,
) -> Vec<ElectedWithReturn> {
    let avg_stake = average_stake(elected);

    let mut ranked: Vec<ElectedWithReturn> = elected
        .iter()
        .filter_map(|v| {
            let prefs = validators.get(&v.validator_id).copied().unwrap_or_default();
            let avg_performance = performance.average(&v.validator_id, params.default_performance);
            let ranked = compute_return(v, &prefs, avg_performance, avg_stake);
            match filters.check(&ranked, &prefs) {
                Ok(()) => Some(ranked),
                Err(reason) => {
                    tracing::debug!(validator = %v.validator_id, %reason, "validator filtered");
                    None
                }
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.estimated_return.cmp(&a.estimated_return));
    ranked.truncate(params.target_count);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use stake_chain::EraRewardPoints;
    use stake_types::Perbill;

    fn id(s: &str) -> AccountId {
        AccountId::new(s)
    }

    fn elected(name: &str, backed: i64, backers: u32) -> ElectedValidator {
        ElectedValidator {
            validator_id: id(name),
            backed_stake: Balance::from(backed),
            score: Balance::ONE,
            backers,
        }
    }

    fn params() -> RankingParams {
        RankingParams {
            target_count: 16,
            default_performance: Balance::new(25, 2),
        }
    }

    #[test]
    fn return_formula() {
        let prefs = ValidatorPrefs {
            commission: Perbill::from_percent(10),
            blocked: false,
        };
        let r = compute_return(&elected("v", 50, 1), &prefs, Balance::TWO, Balance::from(100));
        // 2 * (100 / 50) * 0.9
        assert_eq!(r.estimated_return, Balance::new(36, 1));
        assert!(!r.blocked);
    }

    #[test]
    fn zero_backing_uses_unit_ratio() {
        let r = compute_return(
            &elected("v", 0, 1),
            &ValidatorPrefs::default(),
            Balance::new(25, 2),
            Balance::from(100),
        );
        assert_eq!(r.estimated_return, Balance::new(25, 2));
    }

    #[test]
    fn tiny_backing_saturates_ratio() {
        let r = compute_return(
            &ElectedValidator {
                validator_id: id("tiny"),
                backed_stake: Balance::new(1, 12),
                score: Balance::ONE,
                backers: 1,
            },
            &ValidatorPrefs::default(),
            Balance::new(25, 2),
            Balance::from(10u64.pow(18)),
        );
        assert_eq!(r.estimated_return, Balance::MAX * Balance::new(25, 2));
    }

    #[test]
    fn extreme_stake_spread_ranks_without_overflow() {
        use stake_phragmen::{elect, Voter};

        let outcome = elect(
            &[
                Voter::self_vote(id("big"), Balance::from(10u64.pow(18))),
                Voter::self_vote(id("tiny"), Balance::new(1, 12)),
            ],
            2,
        );
        let validators = BTreeMap::from([
            (id("big"), ValidatorPrefs::default()),
            (id("tiny"), ValidatorPrefs::default()),
        ]);
        let ranked = order_validators_by_return(
            &outcome.elected,
            &validators,
            &PerformanceHistory::new(),
            &ValidatorFilters::new(256),
            &params(),
        );
        let ids: Vec<&str> = ranked.iter().map(|r| r.validator_id.as_str()).collect();
        assert_eq!(ids, ["tiny", "big"]);
    }

    #[test]
    fn serializes_return_field() {
        let r = compute_return(&elected("v", 1, 1), &ValidatorPrefs::default(), Balance::ONE, Balance::ONE);
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("return").is_some());
        assert!(json.get("estimated_return").is_none());
        assert_eq!(json["validator_id"], "v");
    }

    #[test]
    fn uses_default_performance_without_history() {
        let validators = BTreeMap::from([(id("a"), ValidatorPrefs::default())]);
        let ranked = order_validators_by_return(
            &[elected("a", 10, 1)],
            &validators,
            &PerformanceHistory::new(),
            &ValidatorFilters::new(256),
            &params(),
        );
        assert_eq!(ranked[0].estimated_return, Balance::new(25, 2));
    }

    #[test]
    fn ranks_descending_and_filters() {
        let validators = BTreeMap::from([
            (id("a"), ValidatorPrefs::default()),
            (id("b"), ValidatorPrefs::default()),
            (id("c"), ValidatorPrefs { commission: Perbill::ZERO, blocked: true }),
            (id("d"), ValidatorPrefs::default()),
        ]);
        let set = [elected("a", 40, 1), elected("b", 10, 1), elected("c", 5, 1), elected("d", 5, 256)];
        let ranked = order_validators_by_return(
            &set,
            &validators,
            &PerformanceHistory::new(),
            &ValidatorFilters::new(256),
            &params(),
        );
        let ids: Vec<&str> = ranked.iter().map(|r| r.validator_id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn performance_changes_order() {
        let validators = BTreeMap::from([
            (id("a"), ValidatorPrefs::default()),
            (id("b"), ValidatorPrefs::default()),
        ]);
        let history = PerformanceHistory::from_eras(&[EraRewardPoints {
            total: 100,
            individual: BTreeMap::from([(id("a"), 90), (id("b"), 10)]),
        }]);
        let ranked = order_validators_by_return(
            &[elected("a", 20, 1), elected("b", 10, 1)],
            &validators,
            &history,
            &ValidatorFilters::new(256),
            &params(),
        );
        assert_eq!(ranked[0].validator_id, id("a"));
    }

    #[test]
    fn truncates_to_target_count() {
        let validators: BTreeMap<AccountId, ValidatorPrefs> =
            (0..20).map(|i| (id(&format!("v{i:02}")), ValidatorPrefs::default())).collect();
        let set: Vec<ElectedValidator> =
            (0..20).map(|i| elected(&format!("v{i:02}"), 10 + i, 1)).collect();
        let ranked = order_validators_by_return(
            &set,
            &validators,
            &PerformanceHistory::new(),
            &ValidatorFilters::new(256),
            &params(),
        );
        assert_eq!(ranked.len(), 16);
        assert!(ranked.windows(2).all(|w| w[0].estimated_return >= w[1].estimated_return));
    }

    #[test]
    fn equal_returns_keep_input_order() {
        let validators = BTreeMap::from([
            (id("x"), ValidatorPrefs::default()),
            (id("y"), ValidatorPrefs::default()),
        ]);
        let ranked = order_validators_by_return(
            &[elected("y", 10, 1), elected("x", 10, 1)],
            &validators,
            &PerformanceHistory::new(),
            &ValidatorFilters::new(256),
            &params(),
        );
        assert_eq!(ranked[0].validator_id, id("y"));
    }

    #[test]
    fn empty_election_ranks_nothing() {
        let ranked = order_validators_by_return(
            &[],
            &BTreeMap::new(),
            &PerformanceHistory::new(),
            &ValidatorFilters::new(256),
            &params(),
        );
        assert!(ranked.is_empty());
        assert_eq!(average_stake(&[]), Balance::ZERO);
    }
}
