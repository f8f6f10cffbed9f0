//! Scene sink - the rendering collaborator
//!
//! The engine never touches three.js objects. It describes changes through
//! `SceneSink`; `CommandBuffer` queues them for the view to drain each frame.

use log::warn;
use serde::Serialize;

use super::transition::Easing;
use crate::domain::cube::Label;
use crate::spatial::lattice::{Cell, WorldPos};

pub trait SceneSink {
    fn add_cell(&mut self, cell: &Cell);
    fn update_label(&mut self, index: usize, label: Label);
    fn animate_label(&mut self, index: usize, from: WorldPos, to: WorldPos, duration_ms: f64, easing: Easing);
    /// Remove every cell visual.
    fn clear(&mut self);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SceneCommand {
    AddCell {
        index: usize,
        label: Label,
        position: WorldPos,
    },
    UpdateLabel {
        index: usize,
        label: Label,
    },
    AnimateLabel {
        index: usize,
        from: WorldPos,
        to: WorldPos,
        duration_ms: f64,
        easing: Easing,
    },
    Clear,
}

#[derive(Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<SceneCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[SceneCommand] {
        &self.commands
    }

    pub fn drain(&mut self) -> Vec<SceneCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Drain as a JSON array for the JS side.
    pub fn drain_json(&mut self) -> String {
        let commands = self.drain();
        serde_json::to_string(&commands).unwrap_or_else(|e| {
            warn!("dropping {} scene commands: {}", commands.len(), e);
            "[]".to_string()
        })
    }
}

impl SceneSink for CommandBuffer {
    fn add_cell(&mut self, cell: &Cell) {
        self.commands.push(SceneCommand::AddCell {
            index: cell.index,
            label: cell.label,
            position: cell.position,
        });
    }

    fn update_label(&mut self, index: usize, label: Label) {
        self.commands.push(SceneCommand::UpdateLabel { index, label });
    }

    fn animate_label(&mut self, index: usize, from: WorldPos, to: WorldPos, duration_ms: f64, easing: Easing) {
        self.commands.push(SceneCommand::AnimateLabel {
            index,
            from,
            to,
            duration_ms,
            easing,
        });
    }

    fn clear(&mut self) {
        // earlier commands target visuals that are about to disappear
        self.commands.clear();
        self.commands.push(SceneCommand::Clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_serialize_with_an_op_tag() {
        let mut buffer = CommandBuffer::new();
        buffer.update_label(4, 17);
        buffer.animate_label(
            4,
            WorldPos::new(0.0, 0.0, 0.0),
            WorldPos::new(1.0, 0.0, 0.0),
            1000.0,
            Easing::QuadraticInOut,
        );
        let json = buffer.drain_json();
        assert!(json.starts_with(r#"[{"op":"update_label","index":4,"label":17}"#));
        assert!(json.contains(r#""easing":"quadratic_in_out""#));
        assert!(buffer.is_empty());
    }

    #[test]
    fn clear_discards_queued_commands() {
        let mut buffer = CommandBuffer::new();
        buffer.update_label(1, 2);
        buffer.clear();
        assert_eq!(buffer.commands(), &[SceneCommand::Clear]);
    }
}
