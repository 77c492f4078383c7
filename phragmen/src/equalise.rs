//! Post-election load balancing.
//!
//! Each nominator backing more than one elected candidate re-splits its
//! budget by water-filling: its least-backed candidates are topped up to a
//! common level, and whatever budget remains is shared evenly across them.
//! The pass count is fixed rather than run to convergence, so the result is
//! an approximation of max-min fairness and must stay bit-for-bit
//! reproducible.

use stake_types::Balance;

use crate::candidate::CandidateArena;
use crate::voter::Nominator;

/// Number of equalise passes applied after every election.
pub const EQUALISE_ITERATIONS: usize = 10;

/// Rebalance every multi-target nominator, `iterations` times.
pub fn equalise(nominators: &mut [Nominator], arena: &mut CandidateArena, iterations: usize) {
    for _ in 0..iterations {
        for nominator in nominators.iter_mut() {
            equalise_nominator(nominator, arena);
        }
    }
}

fn equalise_nominator(nominator: &mut Nominator, arena: &mut CandidateArena) {
    let mut elected_edges: Vec<usize> = nominator
        .edges
        .iter()
        .enumerate()
        .filter(|(_, edge)| arena[edge.candidate].elected)
        .map(|(i, _)| i)
        .collect();
    if elected_edges.len() <= 1 {
        return;
    }

    for &i in &elected_edges {
        let edge = &mut nominator.edges[i];
        arena[edge.candidate].backed_stake -= edge.weight;
        edge.weight = Balance::ZERO;
    }

    // Stable: equally backed candidates keep their edge order.
    elected_edges.sort_by(|&a, &b| backed(arena, nominator, a).cmp(&backed(arena, nominator, b)));

    let budget = nominator.budget;
    let mut total = Balance::ZERO;
    let mut last = elected_edges.len() - 1;
    for (idx, &i) in elected_edges.iter().enumerate() {
        let stake = backed(arena, nominator, i);
        if stake.saturating_mul(Balance::from(idx)) - total > budget {
            last = idx.saturating_sub(1);
            break;
        }
        total += stake;
    }

    let last_stake = backed(arena, nominator, elected_edges[last]);
    let ways = Balance::from(last + 1);
    let excess = budget.saturating_add(total) - last_stake.saturating_mul(ways);
    for &i in &elected_edges[..=last] {
        let edge = &mut nominator.edges[i];
        let candidate = &mut arena[edge.candidate];
        edge.weight = excess / ways + last_stake - candidate.backed_stake;
        candidate.backed_stake += edge.weight;
    }
}

/// Current backed stake of the candidate behind `nominator.edges[edge]`.
fn backed(arena: &CandidateArena, nominator: &Nominator, edge: usize) -> Balance {
    arena[nominator.edges[edge].candidate].backed_stake
}
