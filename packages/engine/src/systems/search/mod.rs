//! Search - local-search algorithms that produce the replayable dataset
//!
//! Every algorithm moves through the same neighbourhood (swap two distinct cells)
//! and records one `StepRecord` per iteration, using flat indices.

mod annealing;
mod genetic;
mod neighborhood;
mod random_restart;
mod sideways;
mod steepest;
mod stochastic;

use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Serialize};

pub use annealing::SimulatedAnnealing;
pub use genetic::Genetic;
pub use neighborhood::PAIR_COUNT;
pub use random_restart::RandomRestart;
pub use sideways::SidewaysMove;
pub use steepest::SteepestAscent;
pub use stochastic::Stochastic;

use crate::core::utils::clock::Stopwatch;
use crate::core::{EngineError, EngineResult};
use crate::domain::cube::CubeState;
use crate::domain::dataset::{GenerationRecord, RunRecord, SearchDataset, StepRecord};
use crate::domain::objective::Objective;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchAlgorithm {
    SteepestAscent,
    SidewaysMove,
    Stochastic,
    RandomRestart,
    SimulatedAnnealing,
    Genetic,
}

impl SearchAlgorithm {
    pub const ALL: [SearchAlgorithm; 6] = [
        SearchAlgorithm::SteepestAscent,
        SearchAlgorithm::SidewaysMove,
        SearchAlgorithm::RandomRestart,
        SearchAlgorithm::Stochastic,
        SearchAlgorithm::SimulatedAnnealing,
        SearchAlgorithm::Genetic,
    ];

    /// Dataset name of the algorithm.
    pub fn name(self) -> &'static str {
        match self {
            SearchAlgorithm::SteepestAscent => "steepest_ascent",
            SearchAlgorithm::SidewaysMove => "sideways_move",
            SearchAlgorithm::Stochastic => "stochastic",
            SearchAlgorithm::RandomRestart => "random_restart",
            SearchAlgorithm::SimulatedAnnealing => "simulated_annealing",
            SearchAlgorithm::Genetic => "genetic",
        }
    }

    /// Climbers use the weighted cost; the random-walk searches count violated lines.
    pub fn default_objective(self) -> Objective {
        match self {
            SearchAlgorithm::Stochastic | SearchAlgorithm::SimulatedAnnealing => {
                Objective::Violations
            }
            _ => Objective::Weighted,
        }
    }
}

impl fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchAlgorithm {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        SearchAlgorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| EngineError::UnknownAlgorithm(s.to_string()))
    }
}

/// Tuning for a single run. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub algorithm: SearchAlgorithm,
    /// Falls back to the algorithm's default objective
    pub objective: Option<Objective>,
    pub seed: u64,
    pub max_iterations: u32,
    pub max_sideways_moves: u32,
    pub max_repeated_swaps: u32,
    pub tabu_size: usize,
    pub max_restarts: u32,
    pub iterations_per_restart: u32,
    pub initial_temperature: f64,
    pub min_temperature: f64,
    pub cooling_rate: f64,
    pub stuck_threshold: u32,
    pub population_size: usize,
    pub generations: u32,
    pub tournament_size: usize,
    pub mutation_rate: f64,
    pub elitism: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            algorithm: SearchAlgorithm::SteepestAscent,
            objective: None,
            seed: 42,
            max_iterations: 1000,
            max_sideways_moves: 10,
            max_repeated_swaps: 3,
            tabu_size: 10,
            max_restarts: 3,
            iterations_per_restart: 50,
            initial_temperature: 1000.0,
            min_temperature: 1.0,
            cooling_rate: 0.99,
            stuck_threshold: 1000,
            population_size: 10,
            generations: 500,
            tournament_size: 3,
            mutation_rate: 0.1,
            elitism: true,
        }
    }
}

impl SearchParams {
    pub fn for_algorithm(algorithm: SearchAlgorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    pub fn objective(&self) -> Objective {
        self.objective
            .unwrap_or_else(|| self.algorithm.default_objective())
    }

    pub fn validate(&self) -> EngineResult<()> {
        let fail = |msg: &str| Err(EngineError::InvalidSettings(msg.to_string()));
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return fail("initial_temperature must be positive");
        }
        if !(self.min_temperature.is_finite() && self.min_temperature > 0.0) {
            return fail("min_temperature must be positive");
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return fail("cooling_rate must lie strictly between 0 and 1");
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return fail("mutation_rate must lie in [0, 1]");
        }
        if self.population_size < 2 {
            return fail("population_size must be at least 2");
        }
        if self.generations == 0 {
            return fail("generations must be at least 1");
        }
        if self.tournament_size == 0 {
            return fail("tournament_size must be at least 1");
        }
        Ok(())
    }
}

/// Per-run state handed to an algorithm.
pub struct SearchContext<'a> {
    pub params: &'a SearchParams,
    pub objective: Objective,
    pub rng: &'a mut fastrand::Rng,
}

/// What an algorithm hands back; `start` is where the recorded steps begin.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub start: CubeState,
    pub best: CubeState,
    pub best_cost: f64,
    pub steps: Vec<StepRecord>,
    pub iterations_per_restart: Vec<u32>,
    pub stuck_count: Option<u32>,
    pub generations: Vec<GenerationRecord>,
}

impl SearchOutcome {
    pub(crate) fn trajectory(start: CubeState, best: CubeState, best_cost: f64, steps: Vec<StepRecord>) -> Self {
        Self {
            start,
            best,
            best_cost,
            steps,
            iterations_per_restart: Vec::new(),
            stuck_count: None,
            generations: Vec::new(),
        }
    }
}

/// Search trait - each algorithm implements this
pub trait Search {
    fn run(&self, start: &CubeState, ctx: &mut SearchContext) -> SearchOutcome;
}

/// Search registry - dispatch by algorithm
pub struct SearchRegistry {
    steepest: SteepestAscent,
    sideways: SidewaysMove,
    stochastic: Stochastic,
    random_restart: RandomRestart,
    annealing: SimulatedAnnealing,
    genetic: Genetic,
}

impl SearchRegistry {
    pub fn new() -> Self {
        Self {
            steepest: SteepestAscent,
            sideways: SidewaysMove,
            stochastic: Stochastic,
            random_restart: RandomRestart,
            annealing: SimulatedAnnealing,
            genetic: Genetic,
        }
    }

    pub fn get(&self, algorithm: SearchAlgorithm) -> &dyn Search {
        match algorithm {
            SearchAlgorithm::SteepestAscent => &self.steepest,
            SearchAlgorithm::SidewaysMove => &self.sideways,
            SearchAlgorithm::Stochastic => &self.stochastic,
            SearchAlgorithm::RandomRestart => &self.random_restart,
            SearchAlgorithm::SimulatedAnnealing => &self.annealing,
            SearchAlgorithm::Genetic => &self.genetic,
        }
    }
}

impl Default for SearchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one search from `initial`. Reproducible for a given `params.seed`.
pub fn run_search(initial: &CubeState, params: &SearchParams) -> EngineResult<RunRecord> {
    params.validate()?;
    let mut rng = fastrand::Rng::with_seed(params.seed);
    let objective = params.objective();
    let watch = Stopwatch::start();

    let outcome = {
        let mut ctx = SearchContext {
            params,
            objective,
            rng: &mut rng,
        };
        SearchRegistry::new().get(params.algorithm).run(initial, &mut ctx)
    };

    let elapsed_secs = watch.elapsed_secs();
    info!(
        "{} finished: cost {} after {} steps in {:.3}s",
        params.algorithm,
        outcome.best_cost,
        outcome.steps.len(),
        elapsed_secs
    );

    Ok(RunRecord {
        initial_cost: objective.evaluate(&outcome.start),
        initial_cube: outcome.start,
        final_cost: outcome.best_cost,
        final_cube: outcome.best,
        elapsed_secs,
        steps: outcome.steps,
        iterations_per_restart: outcome.iterations_per_restart,
        stuck_count: outcome.stuck_count,
        generations: outcome.generations,
    })
}

/// Configuration for a whole dataset: every listed algorithm, `runs` times, from one shared cube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    pub seed: u64,
    pub runs: usize,
    pub algorithms: Vec<SearchAlgorithm>,
    /// Shared start; shuffled from `seed` when absent
    pub initial_cube: Option<CubeState>,
    /// Base parameters; `algorithm` and `seed` are overridden per run
    pub params: SearchParams,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            runs: 1,
            algorithms: SearchAlgorithm::ALL.to_vec(),
            initial_cube: None,
            params: SearchParams::default(),
        }
    }
}

impl SuiteConfig {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::InvalidSettings(e.to_string()))
    }
}

pub fn run_suite(config: &SuiteConfig) -> EngineResult<SearchDataset> {
    config.params.validate()?;
    let initial = match &config.initial_cube {
        Some(cube) => cube.clone(),
        None => CubeState::shuffled(&mut fastrand::Rng::with_seed(config.seed)),
    };
    let mut dataset = SearchDataset::new(initial.clone(), Objective::Weighted.evaluate(&initial));

    for (slot, &algorithm) in config.algorithms.iter().enumerate() {
        for run in 0..config.runs {
            let params = SearchParams {
                algorithm,
                seed: run_seed(config.seed, slot, run),
                ..config.params.clone()
            };
            debug!("{} run {} seed {}", algorithm, run, params.seed);
            let record = run_search(&initial, &params)?;
            dataset.algorithm_mut(algorithm.name()).push_run(record);
        }
    }
    info!(
        "suite finished: {} algorithms x {} runs",
        config.algorithms.len(),
        config.runs
    );
    Ok(dataset)
}

fn run_seed(base: u64, slot: usize, run: usize) -> u64 {
    base.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(((slot as u64) << 32) | run as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn quick(algorithm: SearchAlgorithm) -> SearchParams {
        SearchParams {
            algorithm,
            max_iterations: 40,
            iterations_per_restart: 3,
            max_restarts: 2,
            generations: 5,
            population_size: 6,
            ..SearchParams::default()
        }
    }

    fn replays_to(record: &RunRecord, cube: &CubeState) -> bool {
        let mut state = record.initial_cube.clone();
        for step in &record.steps {
            state.swap(step.index1, step.index2);
        }
        &state == cube
    }

    #[test]
    fn names_round_trip() {
        for algorithm in SearchAlgorithm::ALL {
            assert_eq!(algorithm.name().parse::<SearchAlgorithm>().unwrap(), algorithm);
        }
        assert_eq!("hill".parse::<SearchAlgorithm>().unwrap_err().kind(), "UnknownAlgorithm");
    }

    #[test]
    fn default_objectives() {
        assert_eq!(SearchAlgorithm::SteepestAscent.default_objective(), Objective::Weighted);
        assert_eq!(SearchAlgorithm::Stochastic.default_objective(), Objective::Violations);
        assert_eq!(
            SearchParams::for_algorithm(SearchAlgorithm::SimulatedAnnealing).objective(),
            Objective::Violations
        );
    }

    #[test]
    fn params_from_empty_json_use_defaults() {
        let params: SearchParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, SearchParams::default());
        let params: SearchParams =
            serde_json::from_str(r#"{"algorithm": "genetic", "objective": "deviation"}"#).unwrap();
        assert_eq!(params.algorithm, SearchAlgorithm::Genetic);
        assert_eq!(params.objective(), Objective::Deviation);
    }

    #[test]
    fn invalid_params_are_rejected() {
        let params = SearchParams {
            cooling_rate: 1.5,
            ..SearchParams::default()
        };
        assert_eq!(params.validate().unwrap_err().kind(), "InvalidSettings");
        let initial = CubeState::identity();
        assert!(run_search(&initial, &params).is_err());

        let params = SearchParams {
            generations: 0,
            ..SearchParams::for_algorithm(SearchAlgorithm::Genetic)
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn every_algorithm_never_worsens_its_start() {
        let initial = CubeState::shuffled(&mut fastrand::Rng::with_seed(5));
        for algorithm in SearchAlgorithm::ALL {
            let params = quick(algorithm);
            let record = run_search(&initial, &params).unwrap();
            assert!(record.final_cube.is_permutation(), "{}", algorithm);
            if algorithm != SearchAlgorithm::Genetic && algorithm != SearchAlgorithm::RandomRestart {
                assert!(record.final_cost <= record.initial_cost, "{}", algorithm);
            }
            assert_eq!(
                record.final_cost,
                params.objective().evaluate(&record.final_cube),
                "{}",
                algorithm
            );
        }
    }

    #[test]
    fn climber_steps_replay_to_the_final_cube() {
        let initial = CubeState::shuffled(&mut fastrand::Rng::with_seed(9));
        for algorithm in [
            SearchAlgorithm::SteepestAscent,
            SearchAlgorithm::SidewaysMove,
            SearchAlgorithm::Stochastic,
            SearchAlgorithm::RandomRestart,
        ] {
            let record = run_search(&initial, &quick(algorithm)).unwrap();
            assert!(replays_to(&record, &record.final_cube), "{}", algorithm);
            assert!(record.steps.iter().all(|s| s.index1 < 125 && s.index2 < 125));
        }
    }

    #[test]
    fn runs_are_reproducible() {
        let initial = CubeState::shuffled(&mut fastrand::Rng::with_seed(3));
        let params = quick(SearchAlgorithm::SimulatedAnnealing);
        let a = run_search(&initial, &params).unwrap();
        let b = run_search(&initial, &params).unwrap();
        assert_eq!(a.steps, b.steps);
        assert_eq!(a.final_cube, b.final_cube);
    }

    #[test]
    fn suite_fills_every_column() {
        let config = SuiteConfig {
            runs: 2,
            algorithms: vec![SearchAlgorithm::Stochastic, SearchAlgorithm::Genetic],
            params: SearchParams {
                max_iterations: 10,
                generations: 2,
                population_size: 4,
                ..SearchParams::default()
            },
            ..SuiteConfig::default()
        };
        let dataset = run_suite(&config).unwrap();
        assert_eq!(dataset.algorithm_names(), vec!["stochastic", "genetic"]);
        let stochastic = dataset.algorithm("stochastic").unwrap();
        assert_eq!(stochastic.run_count(), 2);
        assert_eq!(stochastic.steps[0].len(), 10);
        let genetic = dataset.algorithm("genetic").unwrap();
        assert_eq!(genetic.generations.len(), 2);

        let back = SearchDataset::from_json(&dataset.to_json().unwrap()).unwrap();
        assert_eq!(back.algorithm_names(), dataset.algorithm_names());
        assert_eq!(back.algorithm("stochastic").unwrap().steps, stochastic.steps);
        assert_eq!(back.algorithm("genetic").unwrap().final_cube, genetic.final_cube);
    }
}
