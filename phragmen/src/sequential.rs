//! Sequential Phragmén rounds.
//!
//! Each round is four ordered passes over the arena and the nominators:
//! score reset, score accumulation, winner selection, load update. After the
//! last round the nominator loads are turned into edge weights.

use stake_types::{saturating_div, Balance};

use crate::candidate::CandidateArena;
use crate::voter::Nominator;

/// Score given to a candidate nobody approves of.
///
/// Selection additionally ranks zero-approval candidates after every
/// approved one, so a real score above this value still wins.
pub const ZERO_APPROVAL_SCORE: Balance = Balance::ONE_THOUSAND;

/// Run `rounds` election rounds, returning the winners' slots in election order.
pub(crate) fn run_rounds(
    arena: &mut CandidateArena,
    nominators: &mut [Nominator],
    rounds: usize,
) -> Vec<usize> {
    let mut winners = Vec::with_capacity(rounds);
    for round in 0..rounds {
        reset_scores(arena);
        accumulate_scores(arena, nominators);
        let Some(winner) = select_winner(arena) else {
            break;
        };
        arena[winner].elected = true;
        update_loads(arena, nominators, winner);
        tracing::debug!(
            round,
            winner = %arena[winner].validator_id,
            score = %arena[winner].score,
            "phragmen round elected candidate"
        );
        winners.push(winner);
    }
    winners
}

/// Reset every unelected candidate's score to `1 / approval`.
fn reset_scores(arena: &mut CandidateArena) {
    for candidate in arena.iter_mut().filter(|c| !c.elected) {
        candidate.score = if candidate.has_approval() {
            saturating_div(Balance::ONE, candidate.approval_stake)
        } else {
            ZERO_APPROVAL_SCORE
        };
    }
}

/// Add each nominator's load contribution to the candidates it still approves.
fn accumulate_scores(arena: &mut CandidateArena, nominators: &[Nominator]) {
    for nominator in nominators {
        for edge in &nominator.edges {
            let candidate = &mut arena[edge.candidate];
            if !candidate.elected && candidate.has_approval() {
                let share = load_share(nominator.load, nominator.budget, candidate.approval_stake);
                candidate.score = candidate.score.saturating_add(share);
            }
        }
    }
}

/// `load * budget / approval`, saturating at [`Balance::MAX`].
///
/// Falls back to `load * (budget / approval)` when the product alone
/// overflows.
fn load_share(load: Balance, budget: Balance, approval: Balance) -> Balance {
    match load.checked_mul(budget) {
        Some(product) => saturating_div(product, approval),
        None => load.saturating_mul(saturating_div(budget, approval)),
    }
}

/// The unelected candidate with the lowest score.
///
/// Approved candidates always beat unapproved ones; among equals the lowest
/// slot (earliest appearance in the voter list) wins.
fn select_winner(arena: &CandidateArena) -> Option<usize> {
    let mut best: Option<(usize, bool, Balance)> = None;
    for (slot, candidate) in arena.iter().enumerate() {
        if candidate.elected {
            continue;
        }
        let unapproved = !candidate.has_approval();
        let better = match best {
            None => true,
            Some((_, best_unapproved, best_score)) => {
                (unapproved, candidate.score) < (best_unapproved, best_score)
            }
        };
        if better {
            best = Some((slot, unapproved, candidate.score));
        }
    }
    best.map(|(slot, _, _)| slot)
}

/// Move the load of every nominator backing `winner` up to the winner's score.
fn update_loads(arena: &CandidateArena, nominators: &mut [Nominator], winner: usize) {
    let winner_score = arena[winner].score;
    for nominator in nominators.iter_mut() {
        for edge in nominator.edges.iter_mut().filter(|e| e.candidate == winner) {
            edge.load = winner_score - nominator.load;
            nominator.load = winner_score;
        }
    }
}

/// Convert loads into edge weights and accumulate backed stake.
///
/// `weight = edge.load / nominator.load * budget` for elected candidates,
/// zero otherwise (and zero when the nominator never backed a winner).
pub(crate) fn assign_backing(arena: &mut CandidateArena, nominators: &mut [Nominator]) {
    for nominator in nominators.iter_mut() {
        let load = nominator.load;
        let budget = nominator.budget;
        for edge in nominator.edges.iter_mut() {
            let candidate = &mut arena[edge.candidate];
            edge.weight = if candidate.elected && !load.is_zero() {
                edge.load / load * budget
            } else {
                Balance::ZERO
            };
            candidate.backed_stake += edge.weight;
        }
    }
}
