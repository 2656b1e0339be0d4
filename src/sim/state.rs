//! Game state and core simulation types
//!
//! Everything the frame step and the lifecycle controller share lives in
//! [`GameState`]; nothing is global.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Enemy, Particle, Player, Projectile};
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, nothing running
    Idle,
    /// Frame loop and spawner running, input accepted
    Active,
    /// Player was hit; end screen shown
    GameOver,
}

/// Side effects produced by the simulation, dispatched by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A projectile was fired
    Shot,
    /// An enemy was hit and shrunk
    EnemyHit,
    /// An enemy was hit and removed
    EnemyDestroyed,
    /// Score changed to the contained value
    ScoreChanged(u64),
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase
    pub phase: GamePhase,
    /// Score
    pub score: u64,
    /// Viewport size in pixels
    pub bounds: Vec2,
    /// Player turret
    pub player: Player,
    /// Live projectiles, in firing order
    pub projectiles: Vec<Projectile>,
    /// Live enemies, in spawn order
    pub enemies: Vec<Enemy>,
    /// Visual particles
    pub particles: Vec<Particle>,
    /// Events raised since the last drain
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle state for a viewport of the given size
    pub fn new(bounds: Vec2, tuning: &Tuning) -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            bounds,
            player: Player::new(bounds / 2.0, tuning.player_radius),
            projectiles: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Player origin: projectiles start here and enemies aim here
    pub fn origin(&self) -> Vec2 {
        self.bounds / 2.0
    }

    /// Fresh player, empty lists, zero score, Active
    pub fn reset(&mut self, tuning: &Tuning) {
        self.player = Player::new(self.origin(), tuning.player_radius);
        self.projectiles.clear();
        self.enemies.clear();
        self.particles.clear();
        self.score = 0;
        self.increase_score(0);
        self.phase = GamePhase::Active;
    }

    /// Add to the score and publish the new value
    pub fn increase_score(&mut self, amount: u64) {
        self.score = self.score.saturating_add(amount);
        self.events.push(GameEvent::ScoreChanged(self.score));
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Active
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events raised since the last drain
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Color;

    fn state() -> GameState {
        GameState::new(Vec2::new(800.0, 600.0), &Tuning::default())
    }

    #[test]
    fn test_new_state_is_idle_and_centered() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.player.pos, Vec2::new(400.0, 300.0));
        assert!(state.pending_events().is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = state();
        state.projectiles.push(Projectile::new(Vec2::ZERO, Vec2::X, 5.0));
        state.enemies.push(Enemy::new(Vec2::ZERO, Vec2::X, 20.0, Color::hue(10.0)));
        state.particles.push(Particle::new(Vec2::ZERO, Vec2::X, 1.0, Color::White));
        state.score = 1350;
        state.phase = GamePhase::GameOver;

        state.reset(&Tuning::default());

        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.score, 0);
        assert!(state.projectiles.is_empty());
        assert!(state.enemies.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.drain_events(), vec![GameEvent::ScoreChanged(0)]);
    }

    #[test]
    fn test_increase_score_publishes_running_total() {
        let mut state = state();
        state.increase_score(100);
        state.increase_score(250);
        assert_eq!(state.score, 350);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::ScoreChanged(100), GameEvent::ScoreChanged(350)]
        );
        assert!(state.pending_events().is_empty());
    }
}
