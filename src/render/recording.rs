//! In-memory canvas that records draw calls
//!
//! Used by tests and the native headless run.

use glam::Vec2;

use super::{Canvas, Color};

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { origin: Vec2, size: Vec2, color: Color },
    FillCircle { center: Vec2, radius: f32, color: Color, alpha: f32 },
}

/// Canvas that keeps a log of what was drawn
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    size: Vec2,
    alpha: f32,
    saved: Vec<f32>,
    pub commands: Vec<DrawCommand>,
    /// Drop commands instead of storing them (long headless runs)
    pub discard: bool,
}

impl RecordingCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            alpha: 1.0,
            saved: Vec::new(),
            commands: Vec::new(),
            discard: false,
        }
    }

    /// Canvas that tracks state but stores nothing
    pub fn discarding(width: f32, height: f32) -> Self {
        Self {
            discard: true,
            ..Self::new(width, height)
        }
    }

    /// Number of circles drawn since the last clear
    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .count()
    }

    /// Current save/restore nesting depth
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    fn record(&mut self, command: DrawCommand) {
        if !self.discard {
            self.commands.push(command);
        }
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.record(DrawCommand::FillRect { origin, size, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let alpha = self.alpha;
        self.record(DrawCommand::FillCircle {
            center,
            radius,
            color,
            alpha,
        });
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    fn save(&mut self) {
        self.saved.push(self.alpha);
    }

    fn restore(&mut self) {
        if let Some(alpha) = self.saved.pop() {
            self.alpha = alpha;
        }
    }
}
