use log::debug;

use super::neighborhood::best_neighbor;
use super::{Search, SearchContext, SearchOutcome};
use crate::domain::cube::CubeState;
use crate::domain::dataset::StepRecord;
use crate::domain::objective::CostTracker;

pub struct SteepestAscent;

/// Where a climb ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ClimbEnd {
    Solved,
    LocalOptimum,
    IterationCap,
}

/// Move to the strictly best neighbour until nothing improves, the cube is solved
/// or `limit` moves were made. Returns the number of moves and why it stopped.
pub(super) fn climb(
    cube: &mut CubeState,
    tracker: &mut CostTracker,
    limit: u32,
    steps: &mut Vec<StepRecord>,
) -> (u32, ClimbEnd) {
    let mut moves = 0;
    loop {
        if tracker.is_solved() {
            return (moves, ClimbEnd::Solved);
        }
        if moves >= limit {
            return (moves, ClimbEnd::IterationCap);
        }
        let current = tracker.cost();
        match best_neighbor(cube, tracker, |_, _| true) {
            Some(best) if best.cost < current => {
                tracker.apply_swap(cube, best.a, best.b);
                steps.push(StepRecord::swap(best.a, best.b, tracker.cost()));
                moves += 1;
            }
            _ => return (moves, ClimbEnd::LocalOptimum),
        }
    }
}

impl Search for SteepestAscent {
    fn run(&self, start: &CubeState, ctx: &mut SearchContext) -> SearchOutcome {
        let mut cube = start.clone();
        let mut tracker = CostTracker::new(ctx.objective, &cube);
        let mut steps = Vec::new();

        let (moves, end) = climb(&mut cube, &mut tracker, ctx.params.max_iterations, &mut steps);
        debug!("steepest ascent: {:?} after {} moves", end, moves);

        let cost = tracker.cost();
        SearchOutcome::trajectory(start.clone(), cube, cost, steps)
    }
}
