use super::neighborhood::random_pair;
use super::{Search, SearchContext, SearchOutcome};
use crate::domain::cube::CubeState;
use crate::domain::dataset::StepRecord;
use crate::domain::objective::CostTracker;

/// One random swap per iteration, kept only when it strictly improves.
pub struct Stochastic;

impl Search for Stochastic {
    fn run(&self, start: &CubeState, ctx: &mut SearchContext) -> SearchOutcome {
        let mut cube = start.clone();
        let mut tracker = CostTracker::new(ctx.objective, &cube);
        let mut steps = Vec::with_capacity(ctx.params.max_iterations as usize);

        for _ in 0..ctx.params.max_iterations {
            if tracker.is_solved() {
                break;
            }
            let (a, b) = random_pair(ctx.rng);
            if tracker.cost_after_swap(&cube, a, b) < tracker.cost() {
                tracker.apply_swap(&mut cube, a, b);
                steps.push(StepRecord::swap(a, b, tracker.cost()));
            } else {
                steps.push(StepRecord::idle(tracker.cost()));
            }
        }

        let cost = tracker.cost();
        SearchOutcome::trajectory(start.clone(), cube, cost, steps)
    }
}
