use log::debug;

use crate::spatial::lattice::Lattice;

use super::scene_sink::{CommandBuffer, SceneSink};
use super::settings::SceneSettings;
use super::swap_engine::SwapEngine;
use super::SceneCore;

pub(super) fn create_scene_core(settings: SceneSettings) -> SceneCore {
    let lattice = Lattice::generate(settings.spacing);
    let swaps = SwapEngine::new(settings.transition_ms, settings.easing);
    let mut sink = CommandBuffer::new();
    populate(&lattice, &mut sink);

    SceneCore {
        settings,
        lattice,
        swaps,
        playback: None,
        dataset: None,
        sink,
    }
}

/// Reset the scene visuals and add one visual per cell.
pub(super) fn populate(lattice: &Lattice, sink: &mut impl SceneSink) {
    sink.clear();
    for cell in lattice.cells() {
        sink.add_cell(&cell);
    }
    debug!("scene populated with spacing {}", lattice.spacing());
}
