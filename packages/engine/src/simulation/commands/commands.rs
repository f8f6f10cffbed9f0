use log::{debug, info, warn};

use crate::core::{EngineError, EngineResult};
use crate::domain::cube::CubeState;
use crate::domain::dataset::SearchDataset;
use crate::spatial::lattice::{AddressPair, UserCoord};

use super::playback::{check_speed, PlaybackController};
use super::scene_sink::SceneSink;
use super::swap_engine::SwapOutcome;
use super::SceneCore;

pub(super) fn swap_user_coordinates(
    scene: &mut SceneCore,
    first: [&str; 3],
    second: [&str; 3],
    now_ms: f64,
) -> EngineResult<SwapOutcome> {
    let parsed = UserCoord::parse(first[0], first[1], first[2])
        .and_then(|a| UserCoord::parse(second[0], second[1], second[2]).map(|b| (a, b)));
    let (a, b) = parsed.inspect_err(|e| warn!("swap rejected: {}", e))?;
    let spacing = scene.lattice.spacing();
    swap(scene, AddressPair::World(a.world(spacing), b.world(spacing)), now_ms)
}

pub(super) fn swap(scene: &mut SceneCore, pair: AddressPair, now_ms: f64) -> EngineResult<SwapOutcome> {
    let (first, second) = pair.split();
    let result = scene.lattice.resolve(first).and_then(|a| {
        let b = scene.lattice.resolve(second)?;
        scene
            .swaps
            .request(&mut scene.lattice, a, b, now_ms, &mut scene.sink)
    });
    result.inspect_err(|e| warn!("swap rejected: {}", e))
}

/// Settle finished transitions, then run a due playback tick.
pub(super) fn advance(scene: &mut SceneCore, now_ms: f64) {
    scene.swaps.advance(now_ms, &scene.lattice, &mut scene.sink);
    tick(scene, now_ms);
}

fn tick(scene: &mut SceneCore, now_ms: f64) {
    let Some(playback) = scene.playback.as_mut() else {
        return;
    };
    if !playback.is_due(now_ms) {
        return;
    }
    let Some(step) = playback.next_step().cloned() else {
        if playback.at_end() {
            playback.pause();
            return;
        }
        // result frame: show the recorded final cube as a whole
        let next = playback.index() + 1;
        let cube = playback.seek(next);
        scene.swaps.settle_all(&scene.lattice, &mut scene.sink);
        show(scene, cube);
        return;
    };

    if !step.is_idle() {
        if scene.swaps.is_pending(step.index1) || scene.swaps.is_pending(step.index2) {
            // wait for the running transition to settle
            return;
        }
        let duration = scene.swaps.duration_ms().min(playback.interval_ms());
        if let Err(e) = scene.swaps.request_with_duration(
            &mut scene.lattice,
            step.index1,
            step.index2,
            now_ms,
            duration,
            &mut scene.sink,
        ) {
            warn!("playback step deferred: {}", e);
            return;
        }
    }
    playback.advance(now_ms);
}

pub(super) fn load_dataset(scene: &mut SceneCore, json: &str) -> EngineResult<()> {
    let dataset = SearchDataset::from_json(json).inspect_err(|e| warn!("{}", e))?;
    info!(
        "dataset loaded: {} algorithms ({})",
        dataset.config.len(),
        dataset.algorithm_names().join(", ")
    );
    stop_playback(scene);
    scene.dataset = Some(dataset);
    Ok(())
}

/// Switch to a run and show its initial cube. Returns the frame count.
pub(super) fn select_run(scene: &mut SceneCore, algorithm: &str, run: usize) -> EngineResult<usize> {
    let dataset = scene
        .dataset
        .as_ref()
        .ok_or_else(|| EngineError::InvalidDataset("no dataset loaded".to_string()))?;
    let replay = dataset.replay(algorithm, run)?;
    if replay.has_result_frame() {
        info!(
            "{} run {}: steps do not reach the recorded final cube, shown as the last frame",
            algorithm, run
        );
    }

    let controller = PlaybackController::new(
        algorithm,
        run,
        replay,
        scene.settings.step_interval_ms,
        scene.settings.speed,
    )?;
    stop_playback(scene);
    scene.swaps.settle_all(&scene.lattice, &mut scene.sink);
    show(scene, controller.initial().clone());

    let frames = controller.frame_count();
    info!("selected {} run {} ({} frames)", algorithm, run, frames);
    scene.playback = Some(controller);
    Ok(frames)
}

/// Jump to a frame; returns the clamped index, or 0 when no run is selected.
pub(super) fn scrub(scene: &mut SceneCore, index: usize) -> usize {
    let Some(playback) = scene.playback.as_mut() else {
        return 0;
    };
    let cube = playback.seek(index);
    let clamped = playback.index();
    scene.swaps.settle_all(&scene.lattice, &mut scene.sink);
    show(scene, cube);
    debug!("scrubbed to frame {}", clamped);
    clamped
}

pub(super) fn play(scene: &mut SceneCore, now_ms: f64) -> bool {
    scene
        .playback
        .as_mut()
        .is_some_and(|playback| playback.play(now_ms))
}

pub(super) fn pause(scene: &mut SceneCore) {
    if let Some(playback) = scene.playback.as_mut() {
        playback.pause();
    }
}

pub(super) fn toggle_play(scene: &mut SceneCore, now_ms: f64) -> bool {
    if scene.is_playing() {
        pause(scene);
        false
    } else {
        play(scene, now_ms)
    }
}

pub(super) fn set_speed(scene: &mut SceneCore, speed: f64) -> EngineResult<()> {
    check_speed(speed)?;
    if let Some(playback) = scene.playback.as_mut() {
        playback.set_speed(speed)?;
    }
    scene.settings.speed = speed;
    Ok(())
}

/// Regenerate the lattice in enumeration order and rebuild every visual.
pub(super) fn reset(scene: &mut SceneCore) {
    stop_playback(scene);
    scene.swaps.clear();
    scene.lattice.set_labels(CubeState::identity());
    super::init::populate(&scene.lattice, &mut scene.sink);
}

pub(super) fn stop_playback(scene: &mut SceneCore) {
    if let Some(mut playback) = scene.playback.take() {
        playback.pause();
    }
}

/// Replace every label, emitting updates only for cells that changed.
fn show(scene: &mut SceneCore, cube: CubeState) {
    for index in scene.lattice.labels().diff(&cube) {
        scene.sink.update_label(index, cube.get(index));
    }
    scene.lattice.set_labels(cube);
}
