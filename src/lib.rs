//! Radial Shooter - a single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, per-frame step, game state)
//! - `game`: Lifecycle controller driving the sim through platform collaborators
//! - `render`: 2D canvas render surface
//! - `platform`: Browser/headless platform abstraction
//! - `audio`: Procedural sound cues and background music
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod autopilot;
pub mod error;
pub mod game;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use game::Game;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fallback frame delta (first frame, headless runs)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta fed to tweens (tab switches, breakpoints)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 15.0;

    /// Projectile defaults (speed in pixels per frame)
    pub const PROJECTILE_RADIUS: f32 = 5.0;
    pub const PROJECTILE_SPEED: f32 = 5.0;

    /// Enemy defaults
    pub const ENEMY_SPEED: f32 = 1.0;
    pub const ENEMY_SPAWN_INTERVAL_MS: u32 = 1100;
    pub const ENEMY_MIN_RADIUS: f32 = 10.0;
    pub const ENEMY_MAX_RADIUS: f32 = 30.0;
    /// Radius lost per non-fatal hit
    pub const ENEMY_SHRINK: f32 = 10.0;
    /// A hit only shrinks the enemy if the result stays above this
    pub const ENEMY_MIN_VIABLE_RADIUS: f32 = 9.0;
    /// Shrink animation length (seconds)
    pub const SHRINK_DURATION: f32 = 0.5;

    /// Score awards
    pub const HIT_SCORE: u64 = 100;
    pub const DESTROY_SCORE: u64 = 250;

    /// Particle defaults
    pub const PARTICLE_FRICTION: f32 = 0.99;
    pub const PARTICLE_ALPHA_DECAY: f32 = 0.012;
    pub const PARTICLE_MAX_RADIUS: f32 = 3.0;
    pub const PARTICLE_MAX_SPEED: f32 = 6.0;
    /// Particles spawned per unit of enemy radius
    pub const PARTICLES_PER_RADIUS: f32 = 2.0;

    /// Alpha of the per-frame fade overlay
    pub const OVERLAY_ALPHA: f32 = 0.1;
}

/// Velocity of magnitude `speed` pointing from `from` toward `to`
///
/// Coincident points aim along +x, the same as `atan2(0, 0)`.
#[inline]
pub fn velocity_toward(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    let angle = (to.y - from.y).atan2(to.x - from.x);
    Vec2::new(angle.cos(), angle.sin()) * speed
}
