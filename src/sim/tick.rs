//! Per-frame simulation step
//!
//! Core game loop body: fade the last frame, then update and draw particles,
//! projectiles and enemies in that order, resolving hits as enemies move.

use glam::Vec2;
use rand::Rng;

use super::collision::{collides, is_off_screen};
use super::entity::{Enemy, Particle, Projectile};
use super::removal::RemovalQueue;
use super::state::{GameEvent, GameState};
use crate::render::{Canvas, Color};
use crate::settings::Settings;
use crate::tuning::Tuning;
use crate::velocity_toward;

/// What the controller has to do after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Keep the loop running
    Continue,
    /// An enemy reached the player; the game is over
    PlayerHit,
}

/// Removals collected during one pass, applied once it is over
#[derive(Debug, Default)]
pub struct PendingRemovals {
    pub projectiles: RemovalQueue,
    pub enemies: RemovalQueue,
}

impl PendingRemovals {
    pub fn apply(&mut self, state: &mut GameState) {
        self.projectiles.apply(&mut state.projectiles);
        self.enemies.apply(&mut state.enemies);
    }
}

/// Advance the game by one display frame
///
/// `dt` is the frame time in seconds; movement is per frame and only the
/// shrink tweens consume it.
pub fn step<R: Rng + ?Sized>(
    state: &mut GameState,
    tuning: &Tuning,
    settings: &Settings,
    canvas: &mut dyn Canvas,
    rng: &mut R,
    dt: f32,
) -> StepOutcome {
    paint_overlay(canvas, tuning, settings);
    state.player.draw(canvas);

    update_particles(state, tuning, canvas);

    let mut removals = PendingRemovals::default();
    update_projectiles(state, canvas, &mut removals.projectiles);
    let outcome = update_enemies(state, tuning, settings, canvas, rng, dt, &mut removals);

    removals.apply(state);
    outcome
}

/// Cover the previous frame; translucent unless trails are off
fn paint_overlay(canvas: &mut dyn Canvas, tuning: &Tuning, settings: &Settings) {
    let alpha = if settings.trails {
        tuning.overlay_alpha
    } else {
        1.0
    };
    let size = canvas.size();
    canvas.fill_rect(Vec2::ZERO, size, Color::fade(alpha));
}

/// Update live particles, dropping faded ones in place
pub fn update_particles(state: &mut GameState, tuning: &Tuning, canvas: &mut dyn Canvas) {
    state.particles.retain_mut(|particle| {
        if particle.is_alive() {
            particle.update(canvas, tuning.particle_friction, tuning.particle_alpha_decay);
            true
        } else {
            false
        }
    });
}

/// Move projectiles and mark the ones that left the viewport
pub fn update_projectiles(state: &mut GameState, canvas: &mut dyn Canvas, removals: &mut RemovalQueue) {
    let bounds = state.bounds;
    for (index, projectile) in state.projectiles.iter_mut().enumerate() {
        projectile.update(canvas);
        if is_off_screen(&*projectile, bounds) {
            removals.mark(index);
        }
    }
}

/// Move enemies, then test each against the player and every projectile
///
/// Hit projectiles and destroyed enemies stay in their lists until the pass
/// is over, so a projectile overlapping two enemies hits both. Once the
/// player is hit, the remaining enemies are still moved and drawn but no
/// more hits are resolved.
#[allow(clippy::too_many_arguments)]
fn update_enemies<R: Rng + ?Sized>(
    state: &mut GameState,
    tuning: &Tuning,
    settings: &Settings,
    canvas: &mut dyn Canvas,
    rng: &mut R,
    dt: f32,
    removals: &mut PendingRemovals,
) -> StepOutcome {
    let mut outcome = StepOutcome::Continue;

    for enemy_idx in 0..state.enemies.len() {
        state.enemies[enemy_idx].update(canvas, dt);

        if outcome == StepOutcome::PlayerHit {
            continue;
        }
        if collides(&state.player, &state.enemies[enemy_idx]) {
            log::info!("Player hit at score {}", state.score);
            outcome = StepOutcome::PlayerHit;
            continue;
        }

        for proj_idx in 0..state.projectiles.len() {
            if !collides(&state.projectiles[proj_idx], &state.enemies[enemy_idx]) {
                continue;
            }

            let hit_pos = state.projectiles[proj_idx].pos;
            let burst = explosion(rng, tuning, hit_pos, &state.enemies[enemy_idx]);
            add_particles(&mut state.particles, burst, settings.max_particles());

            removals.projectiles.mark(proj_idx);

            let enemy = &mut state.enemies[enemy_idx];
            if enemy.radius - tuning.enemy_shrink > tuning.enemy_min_viable_radius {
                let target = enemy.radius - tuning.enemy_shrink;
                enemy.shrink_to(target, tuning.shrink_duration);
                log::debug!("Enemy hit, shrinking to {:.1}", target);

                state.push_event(GameEvent::EnemyHit);
                state.increase_score(tuning.hit_score);
            } else {
                removals.enemies.mark(enemy_idx);
                log::debug!("Enemy destroyed");

                state.push_event(GameEvent::EnemyDestroyed);
                state.increase_score(tuning.destroy_score);
            }
        }
    }

    outcome
}

/// Particles for a hit on `enemy` at `at`
///
/// Count scales with the enemy's current radius; each fragment takes the
/// enemy's color and a small random velocity per axis.
pub fn explosion<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning, at: Vec2, enemy: &Enemy) -> Vec<Particle> {
    let count = (enemy.radius * tuning.particles_per_radius).ceil().max(0.0) as usize;

    (0..count)
        .map(|_| {
            let radius = rng.random::<f32>() * tuning.particle_max_radius;
            let vel = Vec2::new(
                spread(rng, tuning.particle_max_speed),
                spread(rng, tuning.particle_max_speed),
            );
            Particle::new(at, vel, radius, enemy.color)
        })
        .collect()
}

/// Small signed speed, biased toward zero
fn spread<R: Rng + ?Sized>(rng: &mut R, max_speed: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * (rng.random::<f32>() * max_speed)
}

/// Append particles, dropping the oldest beyond `cap`
pub fn add_particles(particles: &mut Vec<Particle>, burst: Vec<Particle>, cap: usize) {
    if cap == 0 {
        return;
    }
    particles.extend(burst);
    if particles.len() > cap {
        let excess = particles.len() - cap;
        particles.drain(..excess);
    }
}

/// Fire a projectile from the player toward `target`
///
/// Returns false (and does nothing) unless the game is active.
pub fn fire(state: &mut GameState, tuning: &Tuning, target: Vec2) -> bool {
    if !state.is_active() {
        return false;
    }
    let origin = state.origin();
    let vel = velocity_toward(origin, target, tuning.projectile_speed);
    state
        .projectiles
        .push(Projectile::new(origin, vel, tuning.projectile_radius));
    state.push_event(GameEvent::Shot);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::render::{DrawCommand, RecordingCanvas};
    use crate::sim::state::GamePhase;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    fn active_state(tuning: &Tuning) -> GameState {
        let mut state = GameState::new(BOUNDS, tuning);
        state.reset(tuning);
        state.drain_events();
        state
    }

    fn sitting_projectile(at: Vec2) -> Projectile {
        Projectile::new(at, Vec2::ZERO, PROJECTILE_RADIUS)
    }

    /// Step until every shrink tween has settled
    fn settle(state: &mut GameState, tuning: &Tuning, rng: &mut Pcg32) {
        let mut canvas = RecordingCanvas::discarding(BOUNDS.x, BOUNDS.y);
        for _ in 0..40 {
            let outcome = step(state, tuning, &Settings::default(), &mut canvas, rng, FRAME_DT);
            assert_eq!(outcome, StepOutcome::Continue);
        }
    }

    #[test]
    fn test_frame_starts_with_overlay_then_player() {
        let tuning = Tuning::default();
        let mut state = active_state(&tuning);
        let mut canvas = RecordingCanvas::new(BOUNDS.x, BOUNDS.y);
        let mut rng = Pcg32::seed_from_u64(1);

        step(&mut state, &tuning, &Settings::default(), &mut canvas, &mut rng, FRAME_DT);

        assert_eq!(
            canvas.commands[0],
            DrawCommand::FillRect {
                origin: Vec2::ZERO,
                size: BOUNDS,
                color: Color::fade(OVERLAY_ALPHA),
            }
        );
        assert!(matches!(
            canvas.commands[1],
            DrawCommand::FillCircle { center, radius, .. } if center == state.origin() && radius == PLAYER_RADIUS
        ));
    }

    #[test]
    fn test_trails_off_paints_opaque_overlay() {
        let tuning = Tuning::default();
        let settings = Settings {
            trails: false,
            ..Settings::default()
        };
        let mut state = active_state(&tuning);
        let mut canvas = RecordingCanvas::new(BOUNDS.x, BOUNDS.y);
        let mut rng = Pcg32::seed_from_u64(1);

        step(&mut state, &tuning, &settings, &mut canvas, &mut rng, FRAME_DT);
        assert!(matches!(
            canvas.commands[0],
            DrawCommand::FillRect { color, .. } if color == Color::fade(1.0)
        ));
    }

    #[test]
    fn test_particle_removed_once_alpha_runs_out() {
        let tuning = Tuning::default();
        let mut state = active_state(&tuning);
        let mut canvas = RecordingCanvas::new(BOUNDS.x, BOUNDS.y);
        let mut rng = Pcg32::seed_from_u64(1);

        let mut fading = Particle::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 2.0, Color::White);
        fading.alpha = 0.01;
        let mut spent = Particle::new(Vec2::new(200.0, 100.0), Vec2::ZERO, 2.0, Color::White);
        spent.alpha = 0.0;
        state.particles = vec![fading, spent];

        step(&mut state, &tuning, &Settings::default(), &mut canvas, &mut rng, FRAME_DT);
        // The live one was drawn and faded below zero; the dead one was dropped undrawn
        assert_eq!(state.particles.len(), 1);
        assert!(state.particles[0].alpha <= 0.0);
        assert_eq!(canvas.circle_count(), 2); // player + fading particle

        step(&mut state, &tuning, &Settings::default(), &mut canvas, &mut rng, FRAME_DT);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_off_screen_projectile_is_marked_not_removed() {
        let tuning = Tuning::default();
        let mut state = active_state(&tuning);
        let mut canvas = RecordingCanvas::new(BOUNDS.x, BOUNDS.y);

        fire(&mut state, &tuning, Vec2::new(0.0, 300.0));
        state.projectiles.push(Projectile::new(Vec2::new(2.0, 300.0), Vec2::new(-5.0, 0.0), PROJECTILE_RADIUS));
        fire(&mut state, &tuning, Vec2::new(800.0, 300.0));

        let mut removals = RemovalQueue::new();
        update_projectiles(&mut state, &mut canvas, &mut removals);

        // (2, 300) moved to (-3, 300): still overlapping the edge
        assert!(removals.is_empty());

        update_projectiles(&mut state, &mut canvas, &mut removals);
        // (-8, 300) with radius 5 is fully past the left edge
        assert!(removals.contains(1));
        assert_eq!(removals.len(), 1);
        assert_eq!(state.projectiles.len(), 3);

        removals.apply(&mut state.projectiles);
        assert_eq!(state.projectiles.len(), 2);
        assert!(state.projectiles.iter().all(|p| p.pos.x > 300.0));
    }

    #[test]
    fn test_step_drops_off_screen_projectiles_after_pass() {
        let tuning = Tuning::default();
        let mut state = active_state(&tuning);
        let mut canvas = RecordingCanvas::new(BOUNDS.x, BOUNDS.y);
        let mut rng = Pcg32::seed_from_u64(3);

        state
            .projectiles
            .push(Projectile::new(Vec2::new(-4.0, 300.0), Vec2::new(-5.0, 0.0), PROJECTILE_RADIUS));
        step(&mut state, &tuning, &Settings::default(), &mut canvas, &mut rng, FRAME_DT);
        assert!(state.projectiles.is_empty());
        // It was still drawn on its last frame
        assert_eq!(canvas.circle_count(), 2);
    }

    #[test]
    fn test_fire_aims_from_origin() {
        let tuning = Tuning::default();
        let mut state = active_state(&tuning);
        assert!(fire(&mut state, &tuning, Vec2::new(400.0, 0.0)));

        let p = &state.projectiles[0];
        assert_eq!(p.pos, state.origin());
        assert!(p.vel.x.abs() < 1e-4);
        assert!((p.vel.y - -PROJECTILE_SPEED).abs() < 1e-4);
        assert_eq!(state.drain_events(), vec![GameEvent::Shot]);
    }

    #[test]
    fn test_fire_ignored_unless_active() {
        let tuning = Tuning::default();
        let mut state = GameState::new(BOUNDS, &tuning);
        assert!(!fire(&mut state, &tuning, Vec2::ZERO));

        state.reset(&tuning);
        state.phase = GamePhase::GameOver;
        assert!(!fire(&mut state, &tuning, Vec2::ZERO));
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_three_hits_shrink_then_destroy() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = active_state(&tuning);
        let mut canvas = RecordingCanvas::discarding(BOUNDS.x, BOUNDS.y);
        let mut rng = Pcg32::seed_from_u64(42);

        let spawn = Vec2::new(-30.0, 300.0);
        let vel = velocity_toward(spawn, state.origin(), ENEMY_SPEED);
        state.enemies.push(Enemy::new(spawn, vel, 30.0, Color::hue(200.0)));

        // First hit: 30 - 10 = 20 > 9, shrink and award 100
        state.projectiles.push(sitting_projectile(state.enemies[0].pos));
        step(&mut state, &tuning, &settings, &mut canvas, &mut rng, FRAME_DT);
        assert_eq!(state.score, 100);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].target_radius(), 20.0);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.particles.len(), 60);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::EnemyHit, GameEvent::ScoreChanged(100)]
        );

        settle(&mut state, &tuning, &mut rng);
        assert_eq!(state.enemies[0].radius, 20.0);

        // Second hit: 20 - 10 = 10 > 9
        state.projectiles.push(sitting_projectile(state.enemies[0].pos));
        step(&mut state, &tuning, &settings, &mut canvas, &mut rng, FRAME_DT);
        assert_eq!(state.score, 200);
        assert_eq!(state.enemies[0].target_radius(), 10.0);

        settle(&mut state, &tuning, &mut rng);
        assert_eq!(state.enemies[0].radius, 10.0);
        state.drain_events();

        // Third hit: 10 - 10 = 0 is not > 9, destroy and award 250
        state.projectiles.push(sitting_projectile(state.enemies[0].pos));
        step(&mut state, &tuning, &settings, &mut canvas, &mut rng, FRAME_DT);
        assert_eq!(state.score, 450);
        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::EnemyDestroyed, GameEvent::ScoreChanged(450)]
        );
    }

    #[test]
    fn test_every_overlapping_projectile_hits_a_destroyed_enemy() {
        let tuning = Tuning::default();
        let mut state = active_state(&tuning);
        let mut canvas = RecordingCanvas::discarding(BOUNDS.x, BOUNDS.y);
        let mut rng = Pcg32::seed_from_u64(5);

        let at = Vec2::new(100.0, 100.0);
        state.enemies.push(Enemy::new(at, Vec2::ZERO, 15.0, Color::hue(0.0)));
        state.projectiles.push(sitting_projectile(at));
        state.projectiles.push(sitting_projectile(at));
        // Out of reach, survives the pass
        state.projectiles.push(sitting_projectile(Vec2::new(500.0, 500.0)));

        step(&mut state, &tuning, &Settings::default(), &mut canvas, &mut rng, FRAME_DT);

        // The enemy stays in the list until the pass ends, so both shots land
        assert_eq!(state.score, 2 * DESTROY_SCORE);
        assert!(state.enemies.is_empty());
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].pos, Vec2::new(500.0, 500.0));
    }

    #[test]
    fn test_one_projectile_hits_every_enemy_it_overlaps() {
        let tuning = Tuning::default();
        let mut state = active_state(&tuning);
        let mut canvas = RecordingCanvas::discarding(BOUNDS.x, BOUNDS.y);
        let mut rng = Pcg32::seed_from_u64(5);

        let at = Vec2::new(100.0, 100.0);
        state.enemies.push(Enemy::new(at, Vec2::ZERO, 25.0, Color::hue(0.0)));
        state.enemies.push(Enemy::new(at, Vec2::ZERO, 25.0, Color::hue(90.0)));
        state.projectiles.push(sitting_projectile(at));

        step(&mut state, &tuning, &Settings::default(), &mut canvas, &mut rng, FRAME_DT);

        assert_eq!(state.score, 2 * HIT_SCORE);
        assert_eq!(state.enemies[0].target_radius(), 15.0);
        assert_eq!(state.enemies[1].target_radius(), 15.0);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_enemy_reaching_player_ends_pass() {
        let tuning = Tuning::default();
        let mut state = active_state(&tuning);
        let mut canvas = RecordingCanvas::discarding(BOUNDS.x, BOUNDS.y);
        let mut rng = Pcg32::seed_from_u64(9);

        let origin = state.origin();
        state.enemies.push(Enemy::new(origin + Vec2::new(30.0, 0.0), Vec2::new(-1.0, 0.0), 20.0, Color::hue(0.0)));
        // Would be hit by this projectile if the pass went on
        state.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 20.0, Color::hue(0.0)));
        state.projectiles.push(sitting_projectile(Vec2::new(100.0, 100.0)));

        let outcome = step(&mut state, &tuning, &Settings::default(), &mut canvas, &mut rng, FRAME_DT);
        assert_eq!(outcome, StepOutcome::PlayerHit);
        assert_eq!(state.score, 0);
        assert_eq!(state.enemies.len(), 2);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_enemies_after_player_hit_still_drawn() {
        let tuning = Tuning::default();
        let mut state = active_state(&tuning);
        let mut canvas = RecordingCanvas::new(BOUNDS.x, BOUNDS.y);
        let mut rng = Pcg32::seed_from_u64(9);

        let origin = state.origin();
        state.enemies.push(Enemy::new(origin + Vec2::new(30.0, 0.0), Vec2::new(-1.0, 0.0), 20.0, Color::hue(0.0)));
        let trailing = Vec2::new(100.0, 100.0);
        state.enemies.push(Enemy::new(trailing, Vec2::new(1.0, 0.0), 20.0, Color::hue(0.0)));

        let outcome = step(&mut state, &tuning, &Settings::default(), &mut canvas, &mut rng, FRAME_DT);

        assert_eq!(outcome, StepOutcome::PlayerHit);
        // Player plus both enemies are on the final frame
        assert_eq!(canvas.circle_count(), 3);
        assert!(canvas.commands.iter().any(|c| matches!(
            c,
            DrawCommand::FillCircle { center, .. } if *center == trailing
        )));
        assert_eq!(state.enemies[1].pos, trailing + Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_explosion_size_tracks_current_radius() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let enemy = Enemy::new(Vec2::ZERO, Vec2::ZERO, 12.5, Color::hue(33.0));

        let burst = explosion(&mut rng, &tuning, Vec2::new(5.0, 5.0), &enemy);
        assert_eq!(burst.len(), 25);
        for p in &burst {
            assert_eq!(p.pos, Vec2::new(5.0, 5.0));
            assert_eq!(p.color, enemy.color);
            assert_eq!(p.alpha, 1.0);
            assert!(p.radius >= 0.0 && p.radius < PARTICLE_MAX_RADIUS);
            assert!(p.vel.x.abs() <= PARTICLE_MAX_SPEED / 2.0);
            assert!(p.vel.y.abs() <= PARTICLE_MAX_SPEED / 2.0);
        }
    }

    #[test]
    fn test_particle_cap_drops_oldest() {
        let mut particles = vec![Particle::new(Vec2::ZERO, Vec2::ZERO, 1.0, Color::White); 3];
        let burst = vec![Particle::new(Vec2::ONE, Vec2::ZERO, 1.0, Color::White); 3];
        add_particles(&mut particles, burst, 4);
        assert_eq!(particles.len(), 4);
        assert_eq!(particles[0].pos, Vec2::ZERO);
        assert!(particles[1..].iter().all(|p| p.pos == Vec2::ONE));

        add_particles(&mut particles, vec![Particle::new(Vec2::ONE, Vec2::ZERO, 1.0, Color::White)], 0);
        assert_eq!(particles.len(), 4);
    }

    proptest! {
        #[test]
        fn prop_enemy_radius_never_grows(
            seed in any::<u64>(),
            radius in 10.0f32..30.0,
            hit_frames in proptest::collection::vec(0usize..40, 1..6),
        ) {
            let tuning = Tuning::default();
            let settings = Settings::default();
            let mut state = active_state(&tuning);
            let mut canvas = RecordingCanvas::discarding(BOUNDS.x, BOUNDS.y);
            let mut rng = Pcg32::seed_from_u64(seed);

            let at = Vec2::new(100.0, 100.0);
            state.enemies.push(Enemy::new(at, Vec2::ZERO, radius, Color::hue(0.0)));

            let mut last_radius = radius;
            let mut last_score = 0;
            for gap in hit_frames {
                if state.enemies.is_empty() {
                    break;
                }
                state.projectiles.push(sitting_projectile(at));
                for _ in 0..=gap {
                    step(&mut state, &tuning, &settings, &mut canvas, &mut rng, FRAME_DT);
                    if let Some(enemy) = state.enemies.first() {
                        prop_assert!(enemy.radius <= last_radius);
                        last_radius = enemy.radius;
                    }
                    let gained = state.score - last_score;
                    prop_assert!(gained == 0 || gained == HIT_SCORE || gained == DESTROY_SCORE);
                    last_score = state.score;
                }
            }
        }

        #[test]
        fn prop_particle_alpha_strictly_decreases(seed in any::<u64>(), frames in 1usize..120) {
            let tuning = Tuning::default();
            let mut state = active_state(&tuning);
            let mut canvas = RecordingCanvas::discarding(BOUNDS.x, BOUNDS.y);
            let mut rng = Pcg32::seed_from_u64(seed);

            let enemy = Enemy::new(Vec2::new(400.0, 100.0), Vec2::ZERO, 20.0, Color::hue(0.0));
            state.particles = explosion(&mut rng, &tuning, enemy.pos, &enemy);

            let mut last: Vec<f32> = state.particles.iter().map(|p| p.alpha).collect();
            for _ in 0..frames {
                update_particles(&mut state, &tuning, &mut canvas);
                // All share a birth frame, so survivors line up with the front of `last`
                for (p, before) in state.particles.iter().zip(&last) {
                    prop_assert!(p.alpha < *before);
                }
                prop_assert!(state.particles.iter().all(|p| p.alpha > -tuning.particle_alpha_decay));
                last = state.particles.iter().map(|p| p.alpha).collect();
            }
        }
    }
}
