//! 2D render surface
//!
//! The simulation draws through the [`Canvas`] trait: one translucent
//! full-surface fill per frame plus one filled circle per entity.

pub mod recording;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use recording::{DrawCommand, RecordingCanvas};
#[cfg(target_arch = "wasm32")]
pub use web::WebCanvas;

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Fill color, rendered as a CSS color string
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Color {
    White,
    /// Hue in degrees, saturation and lightness in percent
    Hsl { hue: f32, saturation: f32, lightness: f32 },
    /// Channels 0-255, alpha 0-1
    Rgba { r: u8, g: u8, b: u8, a: f32 },
}

impl Color {
    /// Enemy palette: random hue at 50% saturation and lightness
    pub fn hue(hue: f32) -> Self {
        Color::Hsl {
            hue,
            saturation: 50.0,
            lightness: 50.0,
        }
    }

    /// Black at the given alpha (frame fade overlay)
    pub fn fade(alpha: f32) -> Self {
        Color::Rgba {
            r: 0,
            g: 0,
            b: 0,
            a: alpha,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Hsl {
                hue,
                saturation,
                lightness,
            } => write!(f, "hsl({hue}, {saturation}%, {lightness}%)"),
            Color::Rgba { r, g, b, a } => write!(f, "rgba({r}, {g}, {b}, {a})"),
        }
    }
}

/// A 2D drawing surface
pub trait Canvas {
    /// Surface size in pixels
    fn size(&self) -> Vec2;

    /// Fill an axis-aligned rectangle
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);

    /// Fill a circle
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Opacity applied to subsequent fills
    fn set_global_alpha(&mut self, alpha: f32);

    /// Push drawing state
    fn save(&mut self);

    /// Pop drawing state
    fn restore(&mut self);
}
