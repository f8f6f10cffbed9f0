//! Playback controller
//!
//! Replays one precomputed run. Frame 0 is the run's initial cube and frame k
//! has the first k step records applied, so a run with N-1 steps has N frames.
//! A run whose steps miss the recorded final cube gets one extra frame showing it.
//! The index never leaves [0, N-1].

use log::debug;

use super::ticker::Ticker;
use crate::core::{EngineError, EngineResult};
use crate::domain::cube::CubeState;
use crate::domain::dataset::{Replay, StepRecord};

pub(crate) fn check_speed(speed: f64) -> EngineResult<()> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidSettings(format!(
            "speed must be positive and finite, got {}",
            speed
        )))
    }
}

pub struct PlaybackController {
    algorithm: String,
    run: usize,
    replay: Replay,
    index: usize,
    base_interval_ms: f64,
    speed: f64,
    ticker: Ticker,
}

impl PlaybackController {
    pub fn new(
        algorithm: impl Into<String>,
        run: usize,
        replay: Replay,
        base_interval_ms: f64,
        speed: f64,
    ) -> EngineResult<Self> {
        check_speed(speed)?;
        Ok(Self {
            algorithm: algorithm.into(),
            run,
            replay,
            index: 0,
            base_interval_ms,
            speed,
            ticker: Ticker::new(base_interval_ms / speed),
        })
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn run(&self) -> usize {
        self.run
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.replay.frame_count()
    }

    #[inline]
    pub fn last_index(&self) -> usize {
        self.frame_count() - 1
    }

    pub fn at_end(&self) -> bool {
        self.index >= self.last_index()
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.ticker.is_armed()
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn interval_ms(&self) -> f64 {
        self.ticker.interval_ms()
    }

    /// Start advancing. Has no effect on the last frame.
    pub fn play(&mut self, now_ms: f64) -> bool {
        if self.at_end() {
            return false;
        }
        if !self.is_playing() {
            self.ticker.arm(now_ms);
            debug!("playback: play from frame {}", self.index);
        }
        true
    }

    pub fn pause(&mut self) {
        if self.is_playing() {
            debug!("playback: paused at frame {}", self.index);
        }
        self.ticker.cancel();
    }

    pub fn set_speed(&mut self, speed: f64) -> EngineResult<()> {
        check_speed(speed)?;
        self.speed = speed;
        self.ticker.set_interval(self.base_interval_ms / speed);
        Ok(())
    }

    pub fn is_due(&self, now_ms: f64) -> bool {
        self.ticker.is_due(now_ms)
    }

    /// Step record taking the current frame to the next one.
    pub fn next_step(&self) -> Option<&StepRecord> {
        self.replay.steps.get(self.index)
    }

    /// Move one frame forward after the step was applied; stops on the last frame.
    pub fn advance(&mut self, now_ms: f64) {
        if self.at_end() {
            self.pause();
            return;
        }
        self.index += 1;
        if self.at_end() {
            debug!("playback: reached final frame {}", self.index);
            self.ticker.cancel();
        } else {
            self.ticker.fire(now_ms);
        }
    }

    /// Jump to `index` clamped to [0, N-1] and return the cube for that frame.
    pub fn seek(&mut self, index: usize) -> CubeState {
        self.index = index.min(self.last_index());
        if self.at_end() {
            self.ticker.cancel();
        }
        self.replay.state_at(self.index)
    }

    pub fn initial(&self) -> &CubeState {
        &self.replay.initial
    }

    pub fn replay(&self) -> &Replay {
        &self.replay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(steps: usize) -> PlaybackController {
        let steps: Vec<StepRecord> = (0..steps).map(|i| StepRecord::swap(i, i + 1, 0.0)).collect();
        let mut final_cube = CubeState::identity();
        for step in &steps {
            final_cube.swap(step.index1, step.index2);
        }
        let replay = Replay::new(CubeState::identity(), steps, final_cube);
        PlaybackController::new("steepest_ascent", 0, replay, 1000.0, 1.0).unwrap()
    }

    #[test]
    fn frames_include_the_initial_state() {
        assert_eq!(controller(3).frame_count(), 4);
        assert_eq!(controller(0).frame_count(), 1);
        assert_eq!(controller(0).last_index(), 0);
    }

    #[test]
    fn seek_clamps_to_the_last_frame() {
        let mut pb = controller(3);
        pb.seek(99);
        assert_eq!(pb.index(), 3);
        pb.seek(1);
        assert_eq!(pb.index(), 1);
    }

    #[test]
    fn advancing_into_the_last_frame_stops_play() {
        let mut pb = controller(2);
        assert!(pb.play(0.0));
        assert!(pb.is_due(1000.0));
        pb.advance(1000.0);
        assert!(pb.is_playing());
        pb.advance(2000.0);
        assert_eq!(pb.index(), 2);
        assert!(!pb.is_playing());
        // cannot run past the end
        pb.advance(3000.0);
        assert_eq!(pb.index(), 2);
        assert!(!pb.play(3000.0));
    }

    #[test]
    fn speed_scales_the_interval() {
        let mut pb = controller(5);
        pb.set_speed(4.0).unwrap();
        assert_eq!(pb.interval_ms(), 250.0);
        assert!(pb.set_speed(0.0).is_err());
        assert!(pb.set_speed(f64::NAN).is_err());
        assert_eq!(pb.speed(), 4.0);
    }

    #[test]
    fn pause_cancels_the_ticker() {
        let mut pb = controller(5);
        pb.play(0.0);
        pb.pause();
        assert!(!pb.is_playing());
        assert!(!pb.is_due(10_000.0));
    }

    #[test]
    fn result_frame_follows_the_last_step() {
        let mut best = CubeState::identity();
        best.swap(10, 20);
        let replay = Replay::new(CubeState::identity(), vec![StepRecord::swap(0, 1, 1.0)], best.clone());
        let mut pb = PlaybackController::new("simulated_annealing", 0, replay, 1000.0, 1.0).unwrap();
        assert_eq!(pb.frame_count(), 3);

        pb.play(0.0);
        assert!(pb.next_step().is_some());
        pb.advance(1000.0);
        // no step leads into the result frame
        assert!(pb.next_step().is_none());
        assert!(!pb.at_end());
        assert_eq!(pb.seek(pb.index() + 1), best);
        assert!(pb.at_end());
        assert!(!pb.is_playing());
    }
}
