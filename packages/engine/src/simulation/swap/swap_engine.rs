//! Swap engine
//!
//! A swap exchanges two labels in the lattice right away and puts both cells in
//! `Pending` while their glyphs travel. No new swap may touch a pending cell;
//! `advance` settles cells whose transition has finished.

use log::debug;

use super::scene_sink::SceneSink;
use super::transition::{Easing, GlyphTransition};
use crate::core::{EngineError, EngineResult};
use crate::spatial::lattice::{Lattice, WorldPos, CELL_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellPhase {
    Settled,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// Both addresses named the same cell
    Unchanged,
    Started,
}

pub struct SwapEngine {
    transitions: Vec<Option<GlyphTransition>>,
    pending: usize,
    duration_ms: f64,
    easing: Easing,
}

impl SwapEngine {
    pub fn new(duration_ms: f64, easing: Easing) -> Self {
        Self {
            transitions: vec![None; CELL_COUNT],
            pending: 0,
            duration_ms,
            easing,
        }
    }

    #[inline]
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn phase(&self, index: usize) -> CellPhase {
        match self.transitions.get(index) {
            Some(Some(_)) => CellPhase::Pending,
            _ => CellPhase::Settled,
        }
    }

    #[inline]
    pub fn is_pending(&self, index: usize) -> bool {
        self.phase(index) == CellPhase::Pending
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending
    }

    /// Swap with the configured transition length.
    pub fn request(
        &mut self,
        lattice: &mut Lattice,
        a: usize,
        b: usize,
        now_ms: f64,
        sink: &mut impl SceneSink,
    ) -> EngineResult<SwapOutcome> {
        self.request_with_duration(lattice, a, b, now_ms, self.duration_ms, sink)
    }

    pub fn request_with_duration(
        &mut self,
        lattice: &mut Lattice,
        a: usize,
        b: usize,
        now_ms: f64,
        duration_ms: f64,
        sink: &mut impl SceneSink,
    ) -> EngineResult<SwapOutcome> {
        if a == b {
            return Ok(SwapOutcome::Unchanged);
        }
        for index in [a, b] {
            if self.is_pending(index) {
                return Err(EngineError::SwapInProgress {
                    cell: lattice.coord(index),
                });
            }
        }

        lattice.swap_labels(a, b);
        let pos_a = lattice.position_of(lattice.coord(a));
        let pos_b = lattice.position_of(lattice.coord(b));
        self.start(a, pos_b, pos_a, now_ms, duration_ms, lattice, sink);
        self.start(b, pos_a, pos_b, now_ms, duration_ms, lattice, sink);
        debug!(
            "swap {} <-> {} started at {}ms",
            lattice.coord(a),
            lattice.coord(b),
            now_ms
        );
        Ok(SwapOutcome::Started)
    }

    #[allow(clippy::too_many_arguments)]
    fn start(
        &mut self,
        index: usize,
        from: WorldPos,
        to: WorldPos,
        now_ms: f64,
        duration_ms: f64,
        lattice: &Lattice,
        sink: &mut impl SceneSink,
    ) {
        self.transitions[index] = Some(GlyphTransition {
            from,
            to,
            started_ms: now_ms,
            duration_ms,
            easing: self.easing,
        });
        self.pending += 1;
        sink.update_label(index, lattice.label(index));
        sink.animate_label(index, from, to, duration_ms, self.easing);
    }

    /// Settle every transition finished by `now_ms`. Returns how many cells settled.
    pub fn advance(&mut self, now_ms: f64, lattice: &Lattice, sink: &mut impl SceneSink) -> usize {
        if self.pending == 0 {
            return 0;
        }
        let mut settled = 0;
        for (index, slot) in self.transitions.iter_mut().enumerate() {
            if slot.is_some_and(|t| t.is_done(now_ms)) {
                *slot = None;
                sink.update_label(index, lattice.label(index));
                settled += 1;
            }
        }
        self.pending -= settled;
        settled
    }

    /// Finish every running transition immediately.
    pub fn settle_all(&mut self, lattice: &Lattice, sink: &mut impl SceneSink) -> usize {
        self.advance(f64::INFINITY, lattice, sink)
    }

    /// Drop transitions without emitting anything (scene teardown).
    pub fn clear(&mut self) {
        self.transitions.iter_mut().for_each(|slot| *slot = None);
        self.pending = 0;
    }

    /// Eased glyph position of a pending cell.
    pub fn sample(&self, index: usize, now_ms: f64) -> Option<WorldPos> {
        self.transitions
            .get(index)
            .copied()
            .flatten()
            .map(|t| t.position(now_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::CommandBuffer;
    use crate::simulation::SceneCommand;
    use crate::spatial::lattice::DEFAULT_SPACING;

    fn setup() -> (Lattice, SwapEngine, CommandBuffer) {
        (
            Lattice::generate(DEFAULT_SPACING),
            SwapEngine::new(1000.0, Easing::QuadraticInOut),
            CommandBuffer::new(),
        )
    }

    #[test]
    fn swap_exchanges_labels_and_marks_both_pending() {
        let (mut lattice, mut engine, mut sink) = setup();
        let outcome = engine.request(&mut lattice, 0, 124, 0.0, &mut sink).unwrap();
        assert_eq!(outcome, SwapOutcome::Started);
        assert_eq!(lattice.label(0), 125);
        assert_eq!(lattice.label(124), 1);
        assert_eq!(engine.phase(0), CellPhase::Pending);
        assert_eq!(engine.phase(124), CellPhase::Pending);
        assert_eq!(engine.phase(1), CellPhase::Settled);
        assert_eq!(engine.pending_count(), 2);
        assert_eq!(sink.len(), 4);
    }

    #[test]
    fn pending_cells_reject_new_swaps_until_settled() {
        let (mut lattice, mut engine, mut sink) = setup();
        engine.request(&mut lattice, 3, 4, 0.0, &mut sink).unwrap();

        let err = engine.request(&mut lattice, 4, 5, 500.0, &mut sink).unwrap_err();
        assert_eq!(err.kind(), "SwapInProgress");
        assert_eq!(lattice.label(5), 6);

        assert_eq!(engine.advance(999.0, &lattice, &mut sink), 0);
        assert_eq!(engine.advance(1000.0, &lattice, &mut sink), 2);
        assert!(engine.request(&mut lattice, 4, 5, 1000.0, &mut sink).is_ok());
    }

    #[test]
    fn self_swap_is_a_silent_no_op() {
        let (mut lattice, mut engine, mut sink) = setup();
        let outcome = engine.request(&mut lattice, 7, 7, 0.0, &mut sink).unwrap();
        assert_eq!(outcome, SwapOutcome::Unchanged);
        assert_eq!(lattice.label(7), 8);
        assert!(!engine.is_pending(7));
        assert!(sink.is_empty());
    }

    #[test]
    fn glyph_travels_from_partner_slot() {
        let (mut lattice, mut engine, mut sink) = setup();
        engine.request(&mut lattice, 0, 1, 0.0, &mut sink).unwrap();
        let home = lattice.position_of(lattice.coord(0));
        let partner = lattice.position_of(lattice.coord(1));
        assert_eq!(engine.sample(0, 0.0), Some(partner));
        assert_eq!(engine.sample(0, 1000.0), Some(home));
        assert_eq!(engine.sample(2, 0.0), None);

        match &sink.commands()[1] {
            SceneCommand::AnimateLabel { index, from, to, .. } => {
                assert_eq!((*index, *from, *to), (0, partner, home));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn settle_all_finishes_everything() {
        let (mut lattice, mut engine, mut sink) = setup();
        engine.request(&mut lattice, 0, 1, 0.0, &mut sink).unwrap();
        engine.request(&mut lattice, 2, 3, 0.0, &mut sink).unwrap();
        assert_eq!(engine.settle_all(&lattice, &mut sink), 4);
        assert_eq!(engine.pending_count(), 0);
        assert!(lattice.is_bijection());
    }
}
