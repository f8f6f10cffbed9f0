use wasm_bindgen::prelude::*;

use super::{SceneCore, SceneSettings, SwapOutcome};
use crate::core::EngineError;
use crate::spatial::lattice::{AddressPair, Coord, WorldPos};

/// Errors reach JS as `Error` objects whose `name` is the error kind.
impl From<EngineError> for JsValue {
    fn from(err: EngineError) -> JsValue {
        let js = js_sys::Error::new(&err.to_string());
        js.set_name(err.kind());
        js.into()
    }
}

/// Slider values arrive as JS numbers.
fn frame_index(value: f64) -> usize {
    if value > 0.0 {
        // saturating cast: +inf becomes usize::MAX and is clamped by the controller
        value as usize
    } else {
        0
    }
}

#[wasm_bindgen]
pub struct CubeScene {
    core: SceneCore,
}

#[wasm_bindgen]
impl CubeScene {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            core: SceneCore::new(),
        }
    }

    #[wasm_bindgen(js_name = withSettings)]
    pub fn with_settings(settings_json: &str) -> Result<CubeScene, JsValue> {
        let settings = SceneSettings::from_json(settings_json)?;
        let core = SceneCore::with_settings(settings)?;
        Ok(Self { core })
    }

    #[wasm_bindgen(getter)]
    pub fn spacing(&self) -> f32 {
        self.core.lattice().spacing()
    }

    pub fn label(&self, index: usize) -> Option<u16> {
        self.core.label(index)
    }

    /// All labels in flat-index order.
    pub fn labels(&self) -> Vec<u16> {
        self.core.labels().to_vec()
    }

    /// Swap two cells from the six coordinate text inputs (1-based).
    /// Returns false when both name the same cell.
    #[allow(clippy::too_many_arguments)]
    #[wasm_bindgen(js_name = swapUserCoordinates)]
    pub fn swap_user_coordinates(
        &mut self,
        x1: &str,
        y1: &str,
        z1: &str,
        x2: &str,
        y2: &str,
        z2: &str,
        now_ms: f64,
    ) -> Result<bool, JsValue> {
        self.core
            .swap_user_coordinates([x1, y1, z1], [x2, y2, z2], now_ms)
            .map(|outcome| outcome == SwapOutcome::Started)
            .map_err(JsValue::from)
    }

    /// Swap by 0-based grid coordinates.
    #[allow(clippy::too_many_arguments)]
    #[wasm_bindgen(js_name = swapGrid)]
    pub fn swap_grid(&mut self, x1: u8, y1: u8, z1: u8, x2: u8, y2: u8, z2: u8, now_ms: f64) -> Result<bool, JsValue> {
        let pair = AddressPair::Grid(Coord::new(x1, y1, z1), Coord::new(x2, y2, z2));
        self.core
            .swap(pair, now_ms)
            .map(|outcome| outcome == SwapOutcome::Started)
            .map_err(JsValue::from)
    }

    /// Swap by exact world positions.
    #[allow(clippy::too_many_arguments)]
    #[wasm_bindgen(js_name = swapPositions)]
    pub fn swap_positions(
        &mut self,
        x1: f32,
        y1: f32,
        z1: f32,
        x2: f32,
        y2: f32,
        z2: f32,
        now_ms: f64,
    ) -> Result<bool, JsValue> {
        let pair = AddressPair::World(WorldPos::new(x1, y1, z1), WorldPos::new(x2, y2, z2));
        self.core
            .swap(pair, now_ms)
            .map(|outcome| outcome == SwapOutcome::Started)
            .map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = isPending)]
    pub fn is_pending(&self, index: usize) -> bool {
        self.core.is_pending(index)
    }

    /// `[x, y, z]` of a moving glyph, empty when the cell is settled.
    #[wasm_bindgen(js_name = glyphPosition)]
    pub fn glyph_position(&self, index: usize, now_ms: f64) -> Vec<f32> {
        self.core
            .glyph_position(index, now_ms)
            .map(|p| vec![p.x, p.y, p.z])
            .unwrap_or_default()
    }

    /// Call once per animation frame with the frame timestamp.
    pub fn advance(&mut self, now_ms: f64) {
        self.core.advance(now_ms);
    }

    #[wasm_bindgen(js_name = loadDataset)]
    pub fn load_dataset(&mut self, json: &str) -> Result<(), JsValue> {
        Ok(self.core.load_dataset_json(json)?)
    }

    /// JSON array of algorithm names in the loaded dataset.
    #[wasm_bindgen(js_name = algorithmsJson)]
    pub fn algorithms_json(&self) -> String {
        let names = self
            .core
            .dataset()
            .map(|d| d.algorithm_names())
            .unwrap_or_default();
        serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
    }

    /// Number of runs recorded for an algorithm.
    #[wasm_bindgen(js_name = runCount)]
    pub fn run_count(&self, algorithm: &str) -> Result<usize, JsValue> {
        match self.core.dataset() {
            Some(dataset) => dataset
                .algorithm(algorithm)
                .map(|a| a.run_count())
                .map_err(JsValue::from),
            None => Ok(0),
        }
    }

    /// Returns the number of frames in the selected run.
    #[wasm_bindgen(js_name = selectRun)]
    pub fn select_run(&mut self, algorithm: &str, run: usize) -> Result<usize, JsValue> {
        self.core.select_run(algorithm, run).map_err(JsValue::from)
    }

    pub fn play(&mut self, now_ms: f64) -> bool {
        self.core.play(now_ms)
    }

    pub fn pause(&mut self) {
        self.core.pause();
    }

    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&mut self, now_ms: f64) -> bool {
        self.core.toggle_play(now_ms)
    }

    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&mut self, speed: f64) -> Result<(), JsValue> {
        self.core.set_speed(speed).map_err(JsValue::from)
    }

    /// Jump to a frame. Negative or NaN indices go to frame 0, large ones to the last frame.
    pub fn scrub(&mut self, index: f64) -> usize {
        self.core.scrub(frame_index(index))
    }

    #[wasm_bindgen(getter, js_name = playbackIndex)]
    pub fn playback_index(&self) -> usize {
        self.core.playback_index()
    }

    #[wasm_bindgen(getter, js_name = frameCount)]
    pub fn frame_count(&self) -> usize {
        self.core.frame_count()
    }

    #[wasm_bindgen(getter, js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.core.is_playing()
    }

    pub fn reset(&mut self) {
        self.core.reset();
    }

    /// Scene commands queued since the last call, as a JSON array.
    #[wasm_bindgen(js_name = drainCommands)]
    pub fn drain_commands(&mut self) -> String {
        self.core.drain_commands_json()
    }
}

impl Default for CubeScene {
    fn default() -> Self {
        Self::new()
    }
}
