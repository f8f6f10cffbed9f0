use log::debug;

use super::neighborhood::random_pair;
use super::{Search, SearchContext, SearchOutcome};
use crate::domain::cube::CubeState;
use crate::domain::dataset::StepRecord;
use crate::domain::objective::CostTracker;

/// Random swaps accepted with probability `exp(-delta / T)`, geometric cooling.
/// Returns the best state seen, which may precede the end of the recorded steps.
pub struct SimulatedAnnealing;

/// Metropolis acceptance probability for a cost change.
pub(super) fn acceptance(delta: f64, temperature: f64) -> f64 {
    if delta <= 0.0 {
        1.0
    } else {
        (-delta / temperature).exp()
    }
}

impl Search for SimulatedAnnealing {
    fn run(&self, start: &CubeState, ctx: &mut SearchContext) -> SearchOutcome {
        let params = ctx.params;
        let mut cube = start.clone();
        let mut tracker = CostTracker::new(ctx.objective, &cube);
        let mut steps = Vec::new();

        let mut best = cube.clone();
        let mut best_cost = tracker.cost();
        let mut temperature = params.initial_temperature;
        let mut non_improving = 0u32;
        let mut stuck = 0u32;

        for _ in 0..params.max_iterations {
            if temperature < params.min_temperature || tracker.is_solved() {
                break;
            }
            let (a, b) = random_pair(ctx.rng);
            let current = tracker.cost();
            let delta = tracker.cost_after_swap(&cube, a, b) - current;
            let probability = acceptance(delta, temperature);

            if ctx.rng.f64() < probability {
                tracker.apply_swap(&mut cube, a, b);
                steps.push(StepRecord::swap(a, b, tracker.cost()).with_acceptance(probability));
                if delta < 0.0 {
                    non_improving = 0;
                    if tracker.cost() < best_cost {
                        best_cost = tracker.cost();
                        best = cube.clone();
                    }
                } else {
                    non_improving += 1;
                }
            } else {
                steps.push(StepRecord::idle(current).with_acceptance(probability));
                non_improving += 1;
            }

            if non_improving > params.stuck_threshold {
                stuck += 1;
                non_improving = 0;
            }
            temperature *= params.cooling_rate;
        }

        debug!(
            "annealing: {} iterations, best {}, stuck {} times, final T {:.4}",
            steps.len(),
            best_cost,
            stuck,
            temperature
        );
        SearchOutcome {
            stuck_count: Some(stuck),
            ..SearchOutcome::trajectory(start.clone(), best, best_cost, steps)
        }
    }
}
