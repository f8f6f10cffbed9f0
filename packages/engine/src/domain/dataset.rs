//! Search dataset - the precomputed results the visualizer replays.
//!
//! Column-oriented per algorithm, the way the offline generator writes it:
//! `final_cost[i]`, `time[i]`, `final_cube[i]`, `steps[i]` all describe run `i`.
//! Cubes are accepted either as label arrays or as the generator's `"[1, 2, ...]"` text.

use serde::{Deserialize, Deserializer, Serialize};

use super::cube::{CubeState, Label};
use crate::core::{EngineError, EngineResult};
use crate::spatial::lattice::CELL_COUNT;

/// One search iteration: which two flat indices were swapped and the resulting cost.
/// `index1 == index2` marks an iteration that changed nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub index1: usize,
    pub index2: usize,
    pub cost: f64,
    /// Annealing acceptance probability, when the algorithm has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance: Option<f64>,
}

impl StepRecord {
    pub fn swap(index1: usize, index2: usize, cost: f64) -> Self {
        Self {
            index1,
            index2,
            cost,
            acceptance: None,
        }
    }

    pub fn idle(cost: f64) -> Self {
        Self::swap(0, 0, cost)
    }

    pub fn with_acceptance(mut self, probability: f64) -> Self {
        self.acceptance = Some(probability);
        self
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.index1 == self.index2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub best_cost: f64,
    pub mean_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialConfig {
    pub initial_cost: f64,
    #[serde(deserialize_with = "de_cube")]
    pub initial_cube: CubeState,
}

/// Result of one search run, row-oriented.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub initial_cost: f64,
    /// Start of the replayable trajectory (the best restart's start for random restart)
    pub initial_cube: CubeState,
    pub final_cost: f64,
    pub final_cube: CubeState,
    pub elapsed_secs: f64,
    pub steps: Vec<StepRecord>,
    pub iterations_per_restart: Vec<u32>,
    pub stuck_count: Option<u32>,
    pub generations: Vec<GenerationRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub initial_cost: Vec<f64>,
    #[serde(default, deserialize_with = "de_cubes", skip_serializing_if = "Vec::is_empty")]
    pub initial_cube: Vec<CubeState>,
    pub final_cost: Vec<f64>,
    pub time: Vec<f64>,
    #[serde(deserialize_with = "de_cubes")]
    pub final_cube: Vec<CubeState>,
    #[serde(default)]
    pub steps: Vec<Vec<StepRecord>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub iterations_per_restart: Vec<Vec<u32>>,
    #[serde(default, deserialize_with = "de_one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub stuck_frequency: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generations: Vec<Vec<GenerationRecord>>,
}

impl AlgorithmRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial_cost: Vec::new(),
            initial_cube: Vec::new(),
            final_cost: Vec::new(),
            time: Vec::new(),
            final_cube: Vec::new(),
            steps: Vec::new(),
            iterations_per_restart: Vec::new(),
            stuck_frequency: Vec::new(),
            generations: Vec::new(),
        }
    }

    pub fn run_count(&self) -> usize {
        self.final_cost.len()
    }

    pub fn push_run(&mut self, run: RunRecord) {
        self.initial_cost.push(run.initial_cost);
        self.initial_cube.push(run.initial_cube);
        self.final_cost.push(run.final_cost);
        self.time.push(run.elapsed_secs);
        self.final_cube.push(run.final_cube);
        self.steps.push(run.steps);
        if !run.iterations_per_restart.is_empty() {
            self.iterations_per_restart.push(run.iterations_per_restart);
        }
        if let Some(stuck) = run.stuck_count {
            self.stuck_frequency.push(stuck);
        }
        if !run.generations.is_empty() {
            self.generations.push(run.generations);
        }
    }

    fn validate(&self) -> EngineResult<()> {
        let runs = self.run_count();
        let column = |field: &str, len: usize, optional: bool| -> EngineResult<()> {
            if len == runs || (optional && len == 0) {
                Ok(())
            } else {
                Err(EngineError::InvalidDataset(format!(
                    "{}: {} has {} entries for {} runs",
                    self.name, field, len, runs
                )))
            }
        };
        column("time", self.time.len(), false)?;
        column("final_cube", self.final_cube.len(), false)?;
        column("steps", self.steps.len(), true)?;
        column("initial_cube", self.initial_cube.len(), true)?;
        column("initial_cost", self.initial_cost.len(), true)?;
        column("iterations_per_restart", self.iterations_per_restart.len(), true)?;
        column("generations", self.generations.len(), true)?;
        // older generators wrote a single stuck count for the whole algorithm
        if self.stuck_frequency.len() != 1 {
            column("stuck_frequency", self.stuck_frequency.len(), true)?;
        }

        for (run, steps) in self.steps.iter().enumerate() {
            if let Some(bad) = steps
                .iter()
                .find(|s| s.index1 >= CELL_COUNT || s.index2 >= CELL_COUNT)
            {
                return Err(EngineError::InvalidDataset(format!(
                    "{} run {}: step swaps {} and {}, indices must be below {}",
                    self.name, run, bad.index1, bad.index2, CELL_COUNT
                )));
            }
        }
        Ok(())
    }
}

/// The full dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDataset {
    pub initial_config: InitialConfig,
    pub config: Vec<AlgorithmRecord>,
}

impl SearchDataset {
    pub fn new(initial_cube: CubeState, initial_cost: f64) -> Self {
        Self {
            initial_config: InitialConfig {
                initial_cost,
                initial_cube,
            },
            config: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> EngineResult<Self> {
        let dataset: SearchDataset =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidDataset(e.to_string()))?;
        for algorithm in &dataset.config {
            algorithm.validate()?;
        }
        Ok(dataset)
    }

    pub fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string(self).map_err(|e| EngineError::InvalidDataset(e.to_string()))
    }

    pub fn algorithm_names(&self) -> Vec<&str> {
        self.config.iter().map(|a| a.name.as_str()).collect()
    }

    /// First algorithm entry with this name.
    pub fn algorithm(&self, name: &str) -> EngineResult<&AlgorithmRecord> {
        self.config
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| EngineError::UnknownAlgorithm(name.to_string()))
    }

    pub fn algorithm_mut(&mut self, name: &str) -> &mut AlgorithmRecord {
        if let Some(pos) = self.config.iter().position(|a| a.name == name) {
            &mut self.config[pos]
        } else {
            self.config.push(AlgorithmRecord::new(name));
            let last = self.config.len() - 1;
            &mut self.config[last]
        }
    }

    /// Everything needed to replay one run.
    pub fn replay(&self, name: &str, run: usize) -> EngineResult<Replay> {
        let algorithm = self.algorithm(name)?;
        if run >= algorithm.run_count() {
            return Err(EngineError::RunOutOfRange {
                algorithm: name.to_string(),
                run,
                runs: algorithm.run_count(),
            });
        }
        let initial = algorithm
            .initial_cube
            .get(run)
            .unwrap_or(&self.initial_config.initial_cube)
            .clone();
        Ok(Replay::new(
            initial,
            algorithm.steps.get(run).cloned().unwrap_or_default(),
            algorithm.final_cube[run].clone(),
        ))
    }
}

/// One run's trajectory: frame 0 is `initial`, frame k has the first k steps applied.
///
/// When the steps do not end on the recorded final cube (genetic runs record no
/// steps, annealing reports its best state) one more frame shows `final_cube`.
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    pub initial: CubeState,
    pub steps: Vec<StepRecord>,
    pub final_cube: CubeState,
    result_frame: bool,
}

impl Replay {
    pub fn new(initial: CubeState, steps: Vec<StepRecord>, final_cube: CubeState) -> Self {
        let mut replay = Self {
            initial,
            steps,
            final_cube,
            result_frame: false,
        };
        replay.result_frame = replay.walk(replay.steps.len()) != replay.final_cube;
        replay
    }

    pub fn frame_count(&self) -> usize {
        self.steps.len() + 1 + self.result_frame as usize
    }

    /// True when the last frame is `final_cube` shown on its own, not reached by a step.
    pub fn has_result_frame(&self) -> bool {
        self.result_frame
    }

    /// Cube at `frame`; frames past the end clamp to the last one.
    pub fn state_at(&self, frame: usize) -> CubeState {
        if self.result_frame && frame > self.steps.len() {
            return self.final_cube.clone();
        }
        self.walk(frame)
    }

    /// Replaying every step lands on the recorded final cube.
    pub fn is_consistent(&self) -> bool {
        !self.result_frame
    }

    fn walk(&self, frame: usize) -> CubeState {
        let mut cube = self.initial.clone();
        for step in self.steps.iter().take(frame) {
            cube.swap(step.index1, step.index2);
        }
        cube
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCube {
    Labels(Vec<Label>),
    Text(String),
}

impl RawCube {
    fn into_cube(self) -> EngineResult<CubeState> {
        match self {
            RawCube::Labels(labels) => CubeState::from_labels(labels),
            RawCube::Text(text) => CubeState::parse(&text),
        }
    }
}

fn de_cube<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CubeState, D::Error> {
    RawCube::deserialize(deserializer)?
        .into_cube()
        .map_err(serde::de::Error::custom)
}

fn de_cubes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<CubeState>, D::Error> {
    Vec::<RawCube>::deserialize(deserializer)?
        .into_iter()
        .map(|raw| raw.into_cube().map_err(serde::de::Error::custom))
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(u32),
    Many(Vec<u32>),
}

fn de_one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u32>, D::Error> {
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(v) => vec![v],
        OneOrMany::Many(v) => v,
    })
}
