use log::debug;

use super::steepest::{climb, ClimbEnd};
use super::{Search, SearchContext, SearchOutcome};
use crate::domain::cube::CubeState;
use crate::domain::dataset::StepRecord;
use crate::domain::objective::CostTracker;

/// Repeated steepest ascent; restart 0 climbs from the given cube, later ones from a shuffle.
/// Keeps the restart that ended lowest, together with its own start and steps.
pub struct RandomRestart;

impl Search for RandomRestart {
    fn run(&self, start: &CubeState, ctx: &mut SearchContext) -> SearchOutcome {
        let params = ctx.params;
        let mut best: Option<(CubeState, CubeState, f64, Vec<StepRecord>)> = None;
        let mut iterations_per_restart = Vec::new();

        for restart in 0..params.max_restarts.max(1) {
            let origin = if restart == 0 {
                start.clone()
            } else {
                CubeState::shuffled(ctx.rng)
            };
            let mut cube = origin.clone();
            let mut tracker = CostTracker::new(ctx.objective, &cube);
            let mut steps = Vec::new();

            let (moves, end) = climb(&mut cube, &mut tracker, params.iterations_per_restart, &mut steps);
            if end == ClimbEnd::LocalOptimum {
                steps.push(StepRecord::idle(tracker.cost()));
            }
            iterations_per_restart.push(moves);
            debug!("restart {}: {:?}, cost {}", restart, end, tracker.cost());

            let cost = tracker.cost();
            if best.as_ref().map_or(true, |(_, _, c, _)| cost < *c) {
                best = Some((origin, cube, cost, steps));
            }
            if end == ClimbEnd::Solved {
                break;
            }
        }

        let (origin, cube, cost, steps) = match best {
            Some(best) => best,
            None => {
                let cost = ctx.objective.evaluate(start);
                (start.clone(), start.clone(), cost, Vec::new())
            }
        };
        SearchOutcome {
            iterations_per_restart,
            ..SearchOutcome::trajectory(origin, cube, cost, steps)
        }
    }
}
