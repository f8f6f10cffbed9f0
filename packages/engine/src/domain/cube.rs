//! CubeState - a permutation of the labels 1..=125 in flat-index order.

use serde::{Deserialize, Serialize};

use crate::core::{EngineError, EngineResult};
use crate::spatial::lattice::CELL_COUNT;

/// Label shown on a cell (1..=125)
pub type Label = u16;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Label>", into = "Vec<Label>")]
pub struct CubeState {
    labels: Vec<Label>,
}

impl CubeState {
    /// Labels 1..=125 in enumeration order.
    pub fn identity() -> Self {
        Self {
            labels: (1..=CELL_COUNT as Label).collect(),
        }
    }

    pub fn shuffled(rng: &mut fastrand::Rng) -> Self {
        let mut cube = Self::identity();
        rng.shuffle(&mut cube.labels);
        cube
    }

    /// Validates length and that every label appears exactly once.
    pub fn from_labels(labels: Vec<Label>) -> EngineResult<Self> {
        if labels.len() != CELL_COUNT {
            return Err(EngineError::InvalidPermutation(format!(
                "expected {} labels, got {}",
                CELL_COUNT,
                labels.len()
            )));
        }
        let mut seen = [false; CELL_COUNT + 1];
        for &label in &labels {
            let slot = label as usize;
            if slot == 0 || slot > CELL_COUNT {
                return Err(EngineError::InvalidPermutation(format!(
                    "label {} outside 1..={}",
                    label, CELL_COUNT
                )));
            }
            if seen[slot] {
                return Err(EngineError::InvalidPermutation(format!(
                    "label {} appears more than once",
                    label
                )));
            }
            seen[slot] = true;
        }
        Ok(Self { labels })
    }

    /// Accepts the generator's text rendering, e.g. `"[1, 2, 3, ...]"`.
    pub fn parse(text: &str) -> EngineResult<Self> {
        let inner = text.trim().trim_start_matches('[').trim_end_matches(']');
        let labels = inner
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<Label>().map_err(|_| {
                    EngineError::InvalidPermutation(format!("{:?} is not a label", s))
                })
            })
            .collect::<EngineResult<Vec<Label>>>()?;
        Self::from_labels(labels)
    }

    #[inline]
    pub fn get(&self, index: usize) -> Label {
        self.labels[index]
    }

    #[inline]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    #[inline]
    pub fn swap(&mut self, a: usize, b: usize) {
        self.labels.swap(a, b);
    }

    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; CELL_COUNT + 1];
        self.labels.len() == CELL_COUNT
            && self.labels.iter().all(|&label| {
                let slot = label as usize;
                slot >= 1 && slot <= CELL_COUNT && !std::mem::replace(&mut seen[slot], true)
            })
    }

    /// Flat indices whose labels differ between two states.
    pub fn diff<'a>(&'a self, other: &'a CubeState) -> impl Iterator<Item = usize> + 'a {
        self.labels
            .iter()
            .zip(other.labels.iter())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(idx, _)| idx)
    }

    pub(crate) fn labels_mut(&mut self) -> &mut [Label] {
        &mut self.labels
    }
}

impl TryFrom<Vec<Label>> for CubeState {
    type Error = EngineError;

    fn try_from(labels: Vec<Label>) -> EngineResult<Self> {
        Self::from_labels(labels)
    }
}

impl From<CubeState> for Vec<Label> {
    fn from(cube: CubeState) -> Self {
        cube.labels
    }
}
