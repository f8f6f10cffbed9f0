//! Magic Cube Engine - lattice, swap and playback core for the local-search visualizer
//!
//! Architecture:
//! - core/          - Errors, timing, logging
//! - spatial/       - The 5x5x5 lattice and address resolution
//! - domain/        - Label permutation, objective functions, search dataset
//! - systems/       - Local-search algorithms that produce the dataset
//! - simulation/    - Scene orchestration, swap engine, playback, wasm facade

pub mod core;
pub mod spatial;
pub mod domain;
pub mod systems;
pub mod simulation;

use wasm_bindgen::prelude::*;

// Re-export wasm-bindgen-rayon for thread pool initialization
#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
pub use wasm_bindgen_rayon::init_thread_pool;

pub use crate::core::{EngineError, EngineResult};
pub use domain::cube::{CubeState, Label};
pub use domain::dataset::SearchDataset;
pub use domain::objective::Objective;
pub use simulation::{CubeScene, SceneCore, SceneSettings};
pub use spatial::lattice::{Address, AddressPair, Cell, Coord, Lattice, UserCoord, WorldPos};
pub use systems::search::{run_search, run_suite, SearchAlgorithm, SearchParams, SuiteConfig};

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    crate::core::utils::logging::install(log::Level::Info);
    crate::core::utils::logging::banner("🧊 Magic Cube engine initialized!");
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[wasm_bindgen]
pub fn lattice_extent() -> u8 {
    spatial::lattice::EXTENT
}

#[wasm_bindgen]
pub fn cell_count() -> usize {
    spatial::lattice::CELL_COUNT
}

#[wasm_bindgen]
pub fn magic_number() -> i32 {
    domain::objective::MAGIC_NUMBER
}

/// Run a search suite in the browser and return the dataset JSON.
#[wasm_bindgen]
pub fn generate_dataset(config_json: &str) -> Result<String, JsValue> {
    let config = SuiteConfig::from_json(config_json)?;
    Ok(run_suite(&config)?.to_json()?)
}
