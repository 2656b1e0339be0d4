//! Idle/demo mode: the game plays itself
//!
//! Shoots at the enemy closest to the player, leading it by the time a
//! projectile needs to cover the distance. Fires at most once every
//! `cooldown_frames` frames.

use glam::Vec2;

use crate::sim::GameState;
use crate::tuning::Tuning;

/// Default frames between autopilot shots
pub const AUTOPILOT_COOLDOWN_FRAMES: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Autopilot {
    cooldown_frames: u32,
    remaining: u32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(AUTOPILOT_COOLDOWN_FRAMES)
    }
}

impl Autopilot {
    pub fn new(cooldown_frames: u32) -> Self {
        Self {
            cooldown_frames: cooldown_frames.max(1),
            remaining: 0,
        }
    }

    /// Where to shoot right now, ignoring the cooldown
    pub fn aim(state: &GameState, tuning: &Tuning) -> Option<Vec2> {
        let origin = state.origin();

        // Most dangerous enemy: the one closest to the player
        let enemy = state.enemies.iter().min_by(|a, b| {
            a.pos
                .distance_squared(origin)
                .partial_cmp(&b.pos.distance_squared(origin))
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

        let frames = enemy.pos.distance(origin) / tuning.projectile_speed.max(f32::EPSILON);
        Some(enemy.pos + enemy.vel * frames)
    }

    /// Advance one frame; returns a target when it is time to shoot
    pub fn tick(&mut self, state: &GameState, tuning: &Tuning) -> Option<Vec2> {
        if self.remaining > 0 {
            self.remaining -= 1;
            return None;
        }
        let target = Self::aim(state, tuning)?;
        self.remaining = self.cooldown_frames - 1;
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Color;
    use crate::sim::Enemy;

    fn state_with(enemies: &[(Vec2, Vec2)]) -> (GameState, Tuning) {
        let tuning = Tuning::default();
        let mut state = GameState::new(Vec2::new(800.0, 600.0), &tuning);
        state.reset(&tuning);
        for &(pos, vel) in enemies {
            state.enemies.push(Enemy::new(pos, vel, 20.0, Color::hue(0.0)));
        }
        (state, tuning)
    }

    #[test]
    fn test_no_enemies_no_target() {
        let (state, tuning) = state_with(&[]);
        assert_eq!(Autopilot::aim(&state, &tuning), None);
        assert_eq!(Autopilot::default().tick(&state, &tuning), None);
    }

    #[test]
    fn test_targets_closest_enemy_with_lead() {
        let (state, tuning) = state_with(&[
            (Vec2::new(0.0, 300.0), Vec2::new(1.0, 0.0)),
            (Vec2::new(400.0, 100.0), Vec2::new(0.0, 1.0)),
        ]);
        // Second enemy is 200px away: 40 frames at speed 5
        let target = Autopilot::aim(&state, &tuning).unwrap();
        assert!((target - Vec2::new(400.0, 140.0)).length() < 1e-3);
    }

    #[test]
    fn test_cooldown_limits_fire_rate() {
        let (state, tuning) = state_with(&[(Vec2::new(0.0, 0.0), Vec2::ZERO)]);
        let mut pilot = Autopilot::new(3);

        let shots: Vec<bool> = (0..9)
            .map(|_| pilot.tick(&state, &tuning).is_some())
            .collect();
        assert_eq!(
            shots,
            vec![true, false, false, true, false, false, true, false, false]
        );
    }

    #[test]
    fn test_zero_cooldown_fires_every_frame() {
        let (state, tuning) = state_with(&[(Vec2::new(0.0, 0.0), Vec2::ZERO)]);
        let mut pilot = Autopilot::new(0);
        assert!(pilot.tick(&state, &tuning).is_some());
        assert!(pilot.tick(&state, &tuning).is_some());
    }
}
