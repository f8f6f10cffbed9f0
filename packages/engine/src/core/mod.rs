//! Core plumbing shared by every layer: errors, timing, logging.

pub mod error;
pub(crate) mod utils;

pub use error::{EngineError, EngineResult};
