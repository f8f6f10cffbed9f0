use serde::{Deserialize, Serialize};

use super::transition::Easing;
use crate::core::{EngineError, EngineResult};
use crate::spatial::lattice::DEFAULT_SPACING;

/// Scene configuration. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Distance between neighbouring cell centres
    pub spacing: f32,
    /// Glyph transition length for a swap
    pub transition_ms: f64,
    pub easing: Easing,
    /// Playback interval at 1x speed
    pub step_interval_ms: f64,
    pub speed: f64,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            transition_ms: 1000.0,
            easing: Easing::QuadraticInOut,
            step_interval_ms: 1000.0,
            speed: 1.0,
        }
    }
}

impl SceneSettings {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let settings: SceneSettings =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> EngineResult<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(EngineError::InvalidSettings(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )))
            }
        };
        positive("spacing", self.spacing as f64)?;
        positive("step_interval_ms", self.step_interval_ms)?;
        positive("speed", self.speed)?;
        if !(self.transition_ms.is_finite() && self.transition_ms >= 0.0) {
            return Err(EngineError::InvalidSettings(format!(
                "transition_ms must be finite and not negative, got {}",
                self.transition_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        assert_eq!(SceneSettings::from_json("{}").unwrap(), SceneSettings::default());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let s = SceneSettings::from_json(r#"{"spacing": 2.0, "easing": "linear"}"#).unwrap();
        assert_eq!(s.spacing, 2.0);
        assert_eq!(s.easing, Easing::Linear);
        assert_eq!(s.transition_ms, 1000.0);
    }

    #[test]
    fn bad_values_are_rejected() {
        for json in [
            r#"{"spacing": 0}"#,
            r#"{"speed": -1}"#,
            r#"{"transition_ms": -5}"#,
            r#"{"easing": "bounce"}"#,
            "not json",
        ] {
            let err = SceneSettings::from_json(json).unwrap_err();
            assert_eq!(err.kind(), "InvalidSettings", "{}", json);
        }
    }
}
