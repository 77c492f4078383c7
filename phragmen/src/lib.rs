//! Sequential Phragmén election with equalisation.
//!
//! Elects a stake-weighted, proportional set of validators from a list of
//! voters (nominators plus validator self-votes):
//!
//! 1. [`setup`] builds the voter/candidate graph and approval stakes.
//! 2. Each round scores every unelected candidate by the load its voters
//!    would carry and elects the lowest score.
//! 3. Loads are converted into per-edge weights (backed stake).
//! 4. [`equalise`] rebalances multi-target nominators for
//!    [`EQUALISE_ITERATIONS`] passes.
//!
//! The computation is pure and deterministic: identical voter lists give
//! identical outcomes. Winner ties go to the candidate appearing first in
//! the voter list.

pub mod candidate;
pub mod equalise;
pub mod outcome;
pub mod sequential;
pub mod voter;

pub use candidate::{setup, Candidate, CandidateArena};
pub use equalise::{equalise, EQUALISE_ITERATIONS};
pub use outcome::{ElectedValidator, ElectionOutcome};
pub use sequential::ZERO_APPROVAL_SCORE;
pub use voter::{Edge, Nominator, Voter};

/// Elect `min(seat_count, distinct candidates)` validators.
///
/// The elected set is ordered by descending backed stake; equal stakes keep
/// election order.
pub fn elect(voters: &[Voter], seat_count: usize) -> ElectionOutcome {
    let (mut arena, mut nominators) = setup(voters);
    let rounds = seat_count.min(arena.len());

    let winners = sequential::run_rounds(&mut arena, &mut nominators, rounds);
    sequential::assign_backing(&mut arena, &mut nominators);
    equalise(&mut nominators, &mut arena, EQUALISE_ITERATIONS);

    let mut elected: Vec<ElectedValidator> = winners
        .into_iter()
        .map(|slot| {
            let c = &arena[slot];
            ElectedValidator {
                validator_id: c.validator_id.clone(),
                backed_stake: c.backed_stake,
                score: c.score,
                backers: c.backers,
            }
        })
        .collect();
    elected.sort_by(|a, b| b.backed_stake.cmp(&a.backed_stake));

    let outcome = ElectionOutcome {
        nominators,
        elected,
    };
    tracing::info!(
        voters = voters.len(),
        candidates = arena.len(),
        elected = outcome.elected.len(),
        total_backing = %outcome.total_backing(),
        min_backing = %outcome.min_backing().unwrap_or_default(),
        max_backing = %outcome.max_backing().unwrap_or_default(),
        "phragmen election complete"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use stake_types::{AccountId, Balance};

    fn id(s: &str) -> AccountId {
        AccountId::new(s)
    }

    fn tolerance() -> Balance {
        Balance::new(1, 18)
    }

    fn scenario() -> Vec<Voter> {
        vec![
            Voter::new("a", Balance::from(100), vec![id("x"), id("y")]),
            Voter::new("b", Balance::from(50), vec![id("y")]),
            Voter::self_vote(id("x"), Balance::from(10)),
        ]
    }

    #[test]
    fn three_voter_scenario_elects_both() {
        let outcome = elect(&scenario(), 2);
        let mut ids: Vec<&str> = outcome.elected.iter().map(|v| v.validator_id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, ["x", "y"]);
        assert!((outcome.total_backing() - Balance::from(160)).abs() < tolerance());
    }

    #[test]
    fn three_voter_scenario_is_balanced() {
        let outcome = elect(&scenario(), 2);
        for v in &outcome.elected {
            assert!((v.backed_stake - Balance::from(80)).abs() < tolerance());
        }
        assert_eq!(outcome.get(&id("x")).unwrap().backers, 2);
        assert_eq!(outcome.get(&id("y")).unwrap().backers, 2);
    }

    #[test]
    fn single_voter_single_target() {
        let voters = vec![Voter::new("a", Balance::new(12345, 2), vec![id("x")])];
        let outcome = elect(&voters, 1);
        assert_eq!(outcome.elected.len(), 1);
        assert_eq!(outcome.elected[0].validator_id, id("x"));
        assert_eq!(outcome.elected[0].backed_stake, Balance::new(12345, 2));
        assert_eq!(outcome.nominators[0].edges[0].weight, Balance::new(12345, 2));
    }

    #[test]
    fn zero_seats_elect_nobody() {
        let outcome = elect(&scenario(), 0);
        assert!(outcome.is_empty());
        assert_eq!(outcome.nominators.len(), 3);
        assert!(outcome.nominators.iter().all(|n| n.assigned().is_zero()));
    }

    #[test]
    fn empty_voters_elect_nobody() {
        let outcome = elect(&[], 5);
        assert!(outcome.is_empty());
        assert!(outcome.nominators.is_empty());
        assert_eq!(outcome.min_backing(), None);
    }

    #[test]
    fn seats_capped_by_candidates() {
        let outcome = elect(&scenario(), 10);
        assert_eq!(outcome.elected.len(), 2);
    }

    #[test]
    fn unapproved_candidate_elected_last() {
        let voters = vec![
            Voter::self_vote(id("z"), Balance::ZERO),
            Voter::new("a", Balance::from(100), vec![id("x")]),
            Voter::new("b", Balance::from(40), vec![id("y")]),
        ];
        let one = elect(&voters, 1);
        assert_eq!(one.elected[0].validator_id, id("x"));

        let two = elect(&voters, 2);
        assert!(two.get(&id("z")).is_none());

        let three = elect(&voters, 3);
        let z = three.get(&id("z")).unwrap();
        assert!(z.backed_stake.is_zero());
        assert_eq!(z.score, ZERO_APPROVAL_SCORE);
        assert_eq!(three.elected.last().unwrap().validator_id, id("z"));
    }

    #[test]
    fn conservation_across_three_targets() {
        let voters = vec![
            Voter::new("a", Balance::from(900), vec![id("x"), id("y"), id("z")]),
            Voter::new("b", Balance::from(300), vec![id("x")]),
            Voter::new("c", Balance::from(200), vec![id("y"), id("z")]),
        ];
        let outcome = elect(&voters, 3);
        for n in &outcome.nominators {
            assert!((n.assigned() - n.budget).abs() < tolerance(), "{}", n.nominator_id);
        }
    }

    #[test]
    fn elected_sorted_by_backing() {
        let voters = vec![
            Voter::new("a", Balance::from(10), vec![id("x")]),
            Voter::new("b", Balance::from(30), vec![id("y")]),
            Voter::new("c", Balance::from(20), vec![id("z")]),
        ];
        let outcome = elect(&voters, 3);
        let ids: Vec<&str> = outcome.elected.iter().map(|v| v.validator_id.as_str()).collect();
        assert_eq!(ids, ["y", "z", "x"]);
    }

    #[test]
    fn equal_backing_keeps_election_order() {
        let voters = vec![
            Voter::new("a", Balance::from(10), vec![id("x")]),
            Voter::new("b", Balance::from(10), vec![id("y")]),
        ];
        let outcome = elect(&voters, 2);
        let ids: Vec<&str> = outcome.elected.iter().map(|v| v.validator_id.as_str()).collect();
        assert_eq!(ids, ["x", "y"]);
    }
}
