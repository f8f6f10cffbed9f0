use log::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::neighborhood::random_pair;
use super::{Search, SearchContext, SearchOutcome};
use crate::domain::cube::{CubeState, Label};
use crate::domain::dataset::GenerationRecord;
use crate::domain::objective::Objective;
use crate::spatial::lattice::{CELL_COUNT, EXTENT};

/// Population search with tournament selection, slice crossover and swap mutation.
/// Produces per-generation statistics instead of step records.
pub struct Genetic;

fn fitness(population: &[CubeState], objective: Objective) -> Vec<f64> {
    #[cfg(feature = "parallel")]
    {
        population.par_iter().map(|cube| objective.evaluate(cube)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        population.iter().map(|cube| objective.evaluate(cube)).collect()
    }
}

/// Index of the fittest among `size` distinct random members.
fn tournament(scores: &[f64], size: usize, rng: &mut fastrand::Rng) -> usize {
    let mut entrants: Vec<usize> = (0..scores.len()).collect();
    rng.shuffle(&mut entrants);
    entrants.truncate(size.clamp(1, scores.len()));
    entrants
        .into_iter()
        .min_by(|&a, &b| scores[a].total_cmp(&scores[b]).then(a.cmp(&b)))
        .unwrap_or(0)
}

/// Child takes `first` everywhere except a leading slice (whole layers or leading
/// columns in every layer) copied from `second`, then duplicates are repaired.
pub(super) fn crossover(first: &CubeState, second: &CubeState, rng: &mut fastrand::Rng) -> CubeState {
    let point = rng.usize(0..EXTENT as usize);
    let by_layer = rng.bool();
    let from_second = |idx: usize| {
        let (x, y) = (idx / 25, (idx / 5) % 5);
        if by_layer {
            x < point
        } else {
            y < point
        }
    };

    let mut child = first.clone();
    let labels = child.labels_mut();
    for idx in (0..CELL_COUNT).filter(|&idx| from_second(idx)) {
        labels[idx] = second.get(idx);
    }
    repair(labels, from_second);
    child
}

/// Keep the inherited slice intact; cells outside it holding an already used label
/// receive the missing labels in ascending order.
fn repair(labels: &mut [Label], fixed: impl Fn(usize) -> bool) {
    let mut used = [false; CELL_COUNT + 1];
    for idx in (0..CELL_COUNT).filter(|&idx| fixed(idx)) {
        used[labels[idx] as usize] = true;
    }
    let mut holes = Vec::new();
    for idx in (0..CELL_COUNT).filter(|&idx| !fixed(idx)) {
        let slot = labels[idx] as usize;
        if used[slot] {
            holes.push(idx);
        } else {
            used[slot] = true;
        }
    }
    let missing = (1..=CELL_COUNT).filter(|&label| !used[label]);
    for (idx, label) in holes.into_iter().zip(missing) {
        labels[idx] = label as Label;
    }
}

impl Search for Genetic {
    fn run(&self, start: &CubeState, ctx: &mut SearchContext) -> SearchOutcome {
        let params = ctx.params;
        let size = params.population_size.max(2);

        let mut population: Vec<CubeState> = Vec::with_capacity(size);
        population.push(start.clone());
        while population.len() < size {
            population.push(CubeState::shuffled(ctx.rng));
        }

        let mut best = start.clone();
        let mut best_cost = ctx.objective.evaluate(start);
        let mut generations = Vec::new();

        for generation in 0..params.generations {
            let scores = fitness(&population, ctx.objective);
            let (leader, &leader_cost) = scores
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.total_cmp(b.1).then(a.0.cmp(&b.0)))
                .unwrap_or((0, &best_cost));
            let mean_cost = scores.iter().sum::<f64>() / scores.len() as f64;
            generations.push(GenerationRecord {
                best_cost: leader_cost,
                mean_cost,
            });

            if leader_cost < best_cost {
                best_cost = leader_cost;
                best = population[leader].clone();
                debug!("generation {}: best {}", generation, best_cost);
            }
            if best_cost == 0.0 {
                break;
            }

            let mut next = Vec::with_capacity(size);
            if params.elitism {
                next.push(best.clone());
            }
            while next.len() < size {
                let a = tournament(&scores, params.tournament_size, ctx.rng);
                let b = tournament(&scores, params.tournament_size, ctx.rng);
                let mut child = crossover(&population[a], &population[b], ctx.rng);
                if ctx.rng.f64() < params.mutation_rate {
                    let (i, j) = random_pair(ctx.rng);
                    child.swap(i, j);
                }
                next.push(child);
            }
            population = next;
        }

        SearchOutcome {
            generations,
            ..SearchOutcome::trajectory(start.clone(), best, best_cost, Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::search::{SearchAlgorithm, SearchParams};

    #[test]
    fn crossover_children_are_permutations() {
        let mut rng = fastrand::Rng::with_seed(99);
        for _ in 0..200 {
            let a = CubeState::shuffled(&mut rng);
            let b = CubeState::shuffled(&mut rng);
            let child = crossover(&a, &b, &mut rng);
            assert!(child.is_permutation());
        }
    }

    #[test]
    fn crossover_of_identical_parents_is_the_parent() {
        let mut rng = fastrand::Rng::with_seed(1);
        let parent = CubeState::shuffled(&mut rng);
        assert_eq!(crossover(&parent, &parent, &mut rng), parent);
    }

    #[test]
    fn tournament_picks_the_fittest_entrant() {
        let mut rng = fastrand::Rng::with_seed(5);
        let scores = [5.0, 1.0, 3.0];
        assert_eq!(tournament(&scores, 3, &mut rng), 1);
        assert_eq!(tournament(&scores, 10, &mut rng), 1);
    }

    #[test]
    fn best_cost_never_increases_with_elitism() {
        let params = SearchParams {
            generations: 8,
            population_size: 6,
            ..SearchParams::for_algorithm(SearchAlgorithm::Genetic)
        };
        let mut rng = fastrand::Rng::with_seed(12);
        let start = CubeState::shuffled(&mut rng);
        let mut ctx = SearchContext {
            params: &params,
            objective: params.objective(),
            rng: &mut rng,
        };
        let outcome = Genetic.run(&start, &mut ctx);

        assert_eq!(outcome.generations.len(), 8);
        assert!(outcome.steps.is_empty());
        assert!(outcome
            .generations
            .windows(2)
            .all(|w| w[1].best_cost <= w[0].best_cost));
        assert!(outcome.generations.iter().all(|g| g.best_cost <= g.mean_cost));
        assert!(outcome.best.is_permutation());
    }
}
