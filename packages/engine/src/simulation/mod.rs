//! Scene - owns the cube and everything that mutates it
//!
//! `SceneCore` is the single owner of the lattice, the swap engine, the loaded
//! dataset and the playback session. All mutation goes through it, one call at a
//! time, and every visual change is described to the `SceneSink`.
//!
//! Time is always passed in (`now_ms`, the JS frame timestamp), never read.

use log::debug;

use crate::core::EngineResult;
use crate::domain::cube::Label;
use crate::domain::dataset::SearchDataset;
use crate::spatial::lattice::{AddressPair, Cell, Lattice, WorldPos};

#[path = "swap/transition.rs"]
mod transition;
#[path = "swap/swap_engine.rs"]
mod swap_engine;
#[path = "playback/ticker.rs"]
mod ticker;
#[path = "playback/playback.rs"]
mod playback;
#[path = "render/scene_sink.rs"]
mod scene_sink;
#[path = "init/settings.rs"]
mod settings;
#[path = "init/init.rs"]
mod init;
#[path = "commands/commands.rs"]
mod commands;
mod facade;

pub use facade::CubeScene;
pub use playback::PlaybackController;
pub use scene_sink::{CommandBuffer, SceneCommand, SceneSink};
pub use settings::SceneSettings;
pub use swap_engine::{CellPhase, SwapEngine, SwapOutcome};
pub use ticker::Ticker;
pub use transition::{Easing, GlyphTransition};

pub struct SceneCore {
    settings: SceneSettings,
    lattice: Lattice,
    swaps: SwapEngine,
    playback: Option<PlaybackController>,
    dataset: Option<SearchDataset>,
    sink: CommandBuffer,
}

impl SceneCore {
    /// Scene with default settings; the first drain holds `clear` plus one `add_cell` per cell.
    pub fn new() -> Self {
        init::create_scene_core(SceneSettings::default())
    }

    pub fn with_settings(settings: SceneSettings) -> EngineResult<Self> {
        settings.validate()?;
        Ok(init::create_scene_core(settings))
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.lattice.cells()
    }

    pub fn label(&self, index: usize) -> Option<Label> {
        self.lattice.cell(index).map(|cell| cell.label)
    }

    pub fn labels(&self) -> &[Label] {
        self.lattice.labels().labels()
    }

    // === Swaps ===

    /// Swap two cells addressed by 1-based text coordinates, as typed by the user.
    pub fn swap_user_coordinates(
        &mut self,
        first: [&str; 3],
        second: [&str; 3],
        now_ms: f64,
    ) -> EngineResult<SwapOutcome> {
        commands::swap_user_coordinates(self, first, second, now_ms)
    }

    pub fn swap(&mut self, pair: AddressPair, now_ms: f64) -> EngineResult<SwapOutcome> {
        commands::swap(self, pair, now_ms)
    }

    pub fn phase(&self, index: usize) -> CellPhase {
        self.swaps.phase(index)
    }

    pub fn is_pending(&self, index: usize) -> bool {
        self.swaps.is_pending(index)
    }

    pub fn pending_count(&self) -> usize {
        self.swaps.pending_count()
    }

    /// Current glyph position of a pending cell.
    pub fn glyph_position(&self, index: usize, now_ms: f64) -> Option<WorldPos> {
        self.swaps.sample(index, now_ms)
    }

    /// Per-frame update: settle finished transitions, then run a due playback tick.
    pub fn advance(&mut self, now_ms: f64) {
        commands::advance(self, now_ms)
    }

    // === Dataset & playback ===

    pub fn load_dataset_json(&mut self, json: &str) -> EngineResult<()> {
        commands::load_dataset(self, json)
    }

    pub fn dataset(&self) -> Option<&SearchDataset> {
        self.dataset.as_ref()
    }

    pub fn select_run(&mut self, algorithm: &str, run: usize) -> EngineResult<usize> {
        commands::select_run(self, algorithm, run)
    }

    pub fn playback(&self) -> Option<&PlaybackController> {
        self.playback.as_ref()
    }

    pub fn playback_index(&self) -> usize {
        self.playback.as_ref().map_or(0, |p| p.index())
    }

    pub fn frame_count(&self) -> usize {
        self.playback.as_ref().map_or(0, |p| p.frame_count())
    }

    pub fn is_playing(&self) -> bool {
        self.playback.as_ref().is_some_and(|p| p.is_playing())
    }

    pub fn play(&mut self, now_ms: f64) -> bool {
        commands::play(self, now_ms)
    }

    pub fn pause(&mut self) {
        commands::pause(self)
    }

    pub fn toggle_play(&mut self, now_ms: f64) -> bool {
        commands::toggle_play(self, now_ms)
    }

    pub fn set_speed(&mut self, speed: f64) -> EngineResult<()> {
        commands::set_speed(self, speed)
    }

    pub fn scrub(&mut self, index: usize) -> usize {
        commands::scrub(self, index)
    }

    /// Back to the freshly generated cube; drops the playback session.
    pub fn reset(&mut self) {
        commands::reset(self)
    }

    // === Scene commands ===

    pub fn pending_commands(&self) -> &[SceneCommand] {
        self.sink.commands()
    }

    pub fn drain_commands(&mut self) -> Vec<SceneCommand> {
        self.sink.drain()
    }

    pub fn drain_commands_json(&mut self) -> String {
        self.sink.drain_json()
    }
}

impl Default for SceneCore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SceneCore {
    fn drop(&mut self) {
        commands::stop_playback(self);
        self.swaps.clear();
        debug!("scene dropped");
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
