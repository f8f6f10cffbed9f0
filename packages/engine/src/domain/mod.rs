//! Domain model: the label permutation, how it is scored, and the recorded searches.

pub mod cube;
pub mod dataset;
pub mod objective;
