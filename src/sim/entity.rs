//! Entity model
//!
//! Plain positioned circles. Moving entities draw themselves at their
//! current position and then advance by their per-frame velocity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Body;
use super::tween::Tween;
use crate::render::{Canvas, Color};

/// The player's turret, fixed at the viewport center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
}

impl Player {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            radius,
            color: Color::White,
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.fill_circle(self.pos, self.radius, self.color);
    }
}

/// A shot fired from the player toward a click point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            color: Color::White,
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.fill_circle(self.pos, self.radius, self.color);
    }

    pub fn update(&mut self, canvas: &mut dyn Canvas) {
        self.draw(canvas);
        self.pos += self.vel;
    }
}

/// An enemy drifting toward the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// In-flight shrink animation
    #[serde(default)]
    pub shrink: Option<Tween>,
}

impl Enemy {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, color: Color) -> Self {
        Self {
            pos,
            vel,
            radius,
            color,
            shrink: None,
        }
    }

    /// Start animating the radius down to `target`
    ///
    /// Replaces any in-flight shrink; the new one starts from the current
    /// radius. Targets above the current radius are ignored so the radius
    /// never grows.
    pub fn shrink_to(&mut self, target: f32, duration: f32) {
        if target >= self.radius {
            return;
        }
        self.shrink = Some(Tween::new(self.radius, target, duration));
    }

    /// Radius the enemy is heading to (current radius if not shrinking)
    pub fn target_radius(&self) -> f32 {
        self.shrink.map_or(self.radius, |t| t.to)
    }

    fn apply_shrink(&mut self, dt: f32) {
        if let Some(tween) = self.shrink.as_mut() {
            self.radius = tween.advance(dt).min(self.radius);
            if tween.is_finished() {
                self.shrink = None;
            }
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.fill_circle(self.pos, self.radius, self.color);
    }

    /// Apply the shrink tween, draw, then move
    pub fn update(&mut self, canvas: &mut dyn Canvas, dt: f32) {
        self.apply_shrink(dt);
        self.draw(canvas);
        self.pos += self.vel;
    }
}

/// A fading explosion fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// 1 at spawn, decreases every update
    pub alpha: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, color: Color) -> Self {
        Self {
            pos,
            vel,
            radius,
            color,
            alpha: 1.0,
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.save();
        canvas.set_global_alpha(self.alpha);
        canvas.fill_circle(self.pos, self.radius, self.color);
        canvas.restore();
    }

    /// Draw, slow down by `friction`, move, then fade by `fade`
    pub fn update(&mut self, canvas: &mut dyn Canvas, friction: f32, fade: f32) {
        self.draw(canvas);
        self.vel *= friction;
        self.pos += self.vel;
        self.alpha -= fade;
    }

    pub fn is_alive(&self) -> bool {
        self.alpha > 0.0
    }
}

macro_rules! impl_body {
    ($($ty:ty),*) => {
        $(
            impl Body for $ty {
                fn center(&self) -> Vec2 {
                    self.pos
                }

                fn radius(&self) -> f32 {
                    self.radius
                }
            }
        )*
    };
}

impl_body!(Player, Projectile, Enemy, Particle);
