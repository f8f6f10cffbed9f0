//! Engine error taxonomy.
//!
//! Every variant is recoverable: a failed request leaves the lattice in its last
//! settled state. `kind()` is the stable name handed across the wasm boundary.

use thiserror::Error;

use crate::spatial::lattice::Coord;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Invalid address {input:?}: {reason}")]
    InvalidAddress { input: String, reason: String },
    #[error("No cell matches address {address}")]
    CellNotFound { address: String },
    #[error("Cell {cell} is still animating a previous swap")]
    SwapInProgress { cell: Coord },
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),
    #[error("Unknown algorithm {0:?}")]
    UnknownAlgorithm(String),
    #[error("Run {run} out of range for {algorithm:?}, which has {runs} runs")]
    RunOutOfRange {
        algorithm: String,
        run: usize,
        runs: usize,
    },
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error("Not a permutation of the cube labels: {0}")]
    InvalidPermutation(String),
}

impl EngineError {
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidAddress { .. } => "InvalidAddress",
            EngineError::CellNotFound { .. } => "CellNotFound",
            EngineError::SwapInProgress { .. } => "SwapInProgress",
            EngineError::InvalidDataset(_) => "InvalidDataset",
            EngineError::UnknownAlgorithm(_) => "UnknownAlgorithm",
            EngineError::RunOutOfRange { .. } => "RunOutOfRange",
            EngineError::InvalidSettings(_) => "InvalidSettings",
            EngineError::InvalidPermutation(_) => "InvalidPermutation",
        }
    }

    pub(crate) fn invalid_address(input: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidAddress {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_are_stable() {
        let err = EngineError::invalid_address("7", "outside 1..=5");
        assert_eq!(err.kind(), "InvalidAddress");
        assert_eq!(err.to_string(), "Invalid address \"7\": outside 1..=5");

        let err = EngineError::SwapInProgress { cell: Coord::new(0, 1, 2) };
        assert_eq!(err.kind(), "SwapInProgress");
        assert!(err.to_string().contains("(1, 2, 3)"));
    }
}
