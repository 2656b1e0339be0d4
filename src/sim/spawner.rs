//! Enemy spawning
//!
//! Enemies appear just outside a random viewport edge and head for the
//! player's origin at a constant speed. The periodic timer driving this
//! belongs to the lifecycle controller.

use glam::Vec2;
use rand::Rng;

use super::entity::Enemy;
use super::state::GameState;
use crate::render::Color;
use crate::tuning::Tuning;
use crate::velocity_toward;

/// Pick a spawn point for an enemy of `radius` fully outside `bounds`
///
/// An axis is chosen 50/50; the enemy sits one radius past one of that
/// axis's two edges, uniform along the other dimension.
pub fn edge_spawn_position<R: Rng + ?Sized>(rng: &mut R, bounds: Vec2, radius: f32) -> Vec2 {
    if rng.random_bool(0.5) {
        let x = if rng.random_bool(0.5) {
            -radius
        } else {
            bounds.x + radius
        };
        Vec2::new(x, rng.random::<f32>() * bounds.y)
    } else {
        let y = if rng.random_bool(0.5) {
            -radius
        } else {
            bounds.y + radius
        };
        Vec2::new(rng.random::<f32>() * bounds.x, y)
    }
}

/// Build one enemy aimed at `target`
pub fn make_enemy<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning, bounds: Vec2, target: Vec2) -> Enemy {
    let radius = rng.random_range(tuning.enemy_min_radius..tuning.enemy_max_radius);
    let pos = edge_spawn_position(rng, bounds, radius);
    let color = Color::hue(rng.random::<f32>() * 360.0);
    let vel = velocity_toward(pos, target, tuning.enemy_speed);
    Enemy::new(pos, vel, radius, color)
}

/// Manufacture one enemy and append it to the state
pub fn spawn_enemy<R: Rng + ?Sized>(state: &mut GameState, tuning: &Tuning, rng: &mut R) {
    let enemy = make_enemy(rng, tuning, state.bounds, state.origin());
    log::debug!(
        "Spawned enemy r={:.1} at ({:.0}, {:.0})",
        enemy.radius,
        enemy.pos.x,
        enemy.pos.y
    );
    state.enemies.push(enemy);
}
