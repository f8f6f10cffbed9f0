use std::collections::{HashMap, VecDeque};

use log::debug;

use super::neighborhood::best_neighbor;
use super::{Search, SearchContext, SearchOutcome};
use crate::domain::cube::CubeState;
use crate::domain::dataset::StepRecord;
use crate::domain::objective::CostTracker;

/// Steepest ascent that may also take equal-cost moves while its sideways budget lasts.
pub struct SidewaysMove;

impl Search for SidewaysMove {
    fn run(&self, start: &CubeState, ctx: &mut SearchContext) -> SearchOutcome {
        let params = ctx.params;
        let mut cube = start.clone();
        let mut tracker = CostTracker::new(ctx.objective, &cube);
        let mut steps = Vec::new();

        let mut tabu: VecDeque<(usize, usize)> = VecDeque::with_capacity(params.tabu_size + 1);
        let mut repeats: HashMap<(usize, usize), u32> = HashMap::new();
        let mut sideways_used = 0u32;
        let mut iteration = 0u32;

        while !tracker.is_solved() && iteration < params.max_iterations {
            let current = tracker.cost();
            let Some(best) = best_neighbor(&cube, &tracker, |a, b| !tabu.contains(&(a, b))) else {
                break;
            };

            let sideways = best.cost == current;
            if best.cost > current || (sideways && sideways_used >= params.max_sideways_moves) {
                debug!("sideways move: no admissible neighbour at iteration {}", iteration);
                break;
            }
            if sideways {
                sideways_used += 1;
            }

            tracker.apply_swap(&mut cube, best.a, best.b);
            steps.push(StepRecord::swap(best.a, best.b, tracker.cost()));
            iteration += 1;

            if params.tabu_size > 0 {
                tabu.push_back((best.a, best.b));
                if tabu.len() > params.tabu_size {
                    tabu.pop_front();
                }
            }

            let seen = repeats.entry((best.a, best.b)).or_insert(0);
            *seen += 1;
            if *seen >= params.max_repeated_swaps {
                debug!("sideways move: pair ({}, {}) repeated {} times", best.a, best.b, seen);
                break;
            }
        }

        debug!(
            "sideways move: {} moves, {} sideways, cost {}",
            steps.len(),
            sideways_used,
            tracker.cost()
        );
        let cost = tracker.cost();
        SearchOutcome::trajectory(start.clone(), cube, cost, steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::objective::Objective;
    use crate::systems::search::{SearchAlgorithm, SearchParams};

    fn run(params: &SearchParams, start: &CubeState) -> SearchOutcome {
        let mut rng = fastrand::Rng::with_seed(params.seed);
        let mut ctx = SearchContext {
            params,
            objective: Objective::Violations,
            rng: &mut rng,
        };
        SidewaysMove.run(start, &mut ctx)
    }

    #[test]
    fn sideways_budget_bounds_equal_cost_moves() {
        let params = SearchParams {
            max_iterations: 200,
            max_sideways_moves: 4,
            ..SearchParams::for_algorithm(SearchAlgorithm::SidewaysMove)
        };
        let start = CubeState::shuffled(&mut fastrand::Rng::with_seed(8));
        let outcome = run(&params, &start);

        let mut previous = Objective::Violations.evaluate(&start);
        let mut flat = 0;
        for step in &outcome.steps {
            assert!(step.cost <= previous);
            if step.cost == previous {
                flat += 1;
            }
            previous = step.cost;
        }
        assert!(flat <= 4);
    }

    #[test]
    fn tabu_blocks_immediate_undo() {
        let params = SearchParams {
            max_iterations: 30,
            tabu_size: 5,
            ..SearchParams::for_algorithm(SearchAlgorithm::SidewaysMove)
        };
        let start = CubeState::shuffled(&mut fastrand::Rng::with_seed(13));
        let outcome = run(&params, &start);
        for pair in outcome.steps.windows(2) {
            assert_ne!((pair[0].index1, pair[0].index2), (pair[1].index1, pair[1].index2));
        }
    }
}
