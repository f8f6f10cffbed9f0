use serde::{Deserialize, Serialize};

use crate::spatial::lattice::WorldPos;

/// Interpolation curve for glyph transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    QuadraticInOut,
    Linear,
}

impl Easing {
    /// Map linear progress `t` in [0, 1] onto the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// One cell's glyph travelling from its partner's slot to its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphTransition {
    pub from: WorldPos,
    pub to: WorldPos,
    pub started_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl GlyphTransition {
    pub fn ends_at(&self) -> f64 {
        self.started_ms + self.duration_ms
    }

    pub fn is_done(&self, now_ms: f64) -> bool {
        now_ms >= self.ends_at()
    }

    /// Linear progress in [0, 1].
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.started_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn position(&self, now_ms: f64) -> WorldPos {
        self.from.lerp(self.to, self.easing.apply(self.progress(now_ms)))
    }
}
