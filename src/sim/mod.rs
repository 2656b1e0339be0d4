//! Simulation module
//!
//! All gameplay logic lives here:
//! - Per-frame movement (no dt scaling; only tweens use wall time)
//! - RNG passed in by the caller
//! - Deferred removal for lists walked by index
//! - Drawing only through the `Canvas` trait, no platform dependencies

pub mod collision;
pub mod entity;
pub mod removal;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod tween;

pub use collision::{Body, collides, is_off_screen};
pub use entity::{Enemy, Particle, Player, Projectile};
pub use removal::RemovalQueue;
pub use spawner::{edge_spawn_position, make_enemy, spawn_enemy};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{PendingRemovals, StepOutcome, explosion, fire, step};
pub use tween::Tween;
