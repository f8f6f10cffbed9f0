//! Swap neighbourhood: every unordered pair of distinct cells.

use std::sync::OnceLock;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::domain::cube::CubeState;
use crate::domain::objective::CostTracker;
use crate::spatial::lattice::CELL_COUNT;

/// 125 choose 2
pub const PAIR_COUNT: usize = CELL_COUNT * (CELL_COUNT - 1) / 2;

/// Pairs in lexicographic order; the position is the tie-break rank.
fn pairs() -> &'static [(usize, usize)] {
    static PAIRS: OnceLock<Vec<(usize, usize)>> = OnceLock::new();
    PAIRS.get_or_init(|| {
        let mut pairs = Vec::with_capacity(PAIR_COUNT);
        for a in 0..CELL_COUNT {
            for b in (a + 1)..CELL_COUNT {
                pairs.push((a, b));
            }
        }
        pairs
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    pub a: usize,
    pub b: usize,
    pub cost: f64,
    rank: usize,
}

impl Candidate {
    fn better(self, other: Candidate) -> Candidate {
        match self.cost.total_cmp(&other.cost).then(self.rank.cmp(&other.rank)) {
            std::cmp::Ordering::Greater => other,
            _ => self,
        }
    }
}

/// Lowest-cost neighbour among the pairs `allow` accepts; ties go to the lowest pair.
/// Sequential and parallel scans return the same candidate.
pub(crate) fn best_neighbor<F>(cube: &CubeState, tracker: &CostTracker, allow: F) -> Option<Candidate>
where
    F: Fn(usize, usize) -> bool + Sync,
{
    let allow = &allow;
    let score = move |(rank, &(a, b)): (usize, &(usize, usize))| {
        allow(a, b).then(|| Candidate {
            a,
            b,
            cost: tracker.cost_after_swap(cube, a, b),
            rank,
        })
    };

    #[cfg(feature = "parallel")]
    {
        pairs()
            .par_iter()
            .enumerate()
            .filter_map(score)
            .reduce_with(Candidate::better)
    }
    #[cfg(not(feature = "parallel"))]
    {
        pairs()
            .iter()
            .enumerate()
            .filter_map(score)
            .reduce(Candidate::better)
    }
}

/// Two distinct flat indices drawn uniformly.
pub(crate) fn random_pair(rng: &mut fastrand::Rng) -> (usize, usize) {
    let a = rng.usize(0..CELL_COUNT);
    let mut b = rng.usize(0..CELL_COUNT);
    while b == a {
        b = rng.usize(0..CELL_COUNT);
    }
    (a, b)
}
