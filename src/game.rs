//! Lifecycle controller
//!
//! Owns the game state and drives it through a [`Platform`]: starts and
//! resets games, runs one simulation step per display frame, spawns enemies
//! on the periodic timer and turns simulation events into sounds and score
//! updates.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::SoundEffect;
use crate::autopilot::Autopilot;
use crate::consts::{FRAME_DT, MAX_FRAME_DT};
use crate::platform::{FrameHandle, Platform, TimerHandle};
use crate::render::Canvas;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, StepOutcome, fire, spawn_enemy, step};
use crate::tuning::Tuning;

pub struct Game<P: Platform> {
    state: GameState,
    tuning: Tuning,
    settings: Settings,
    rng: Pcg32,
    platform: P,
    /// Next scheduled frame, if any
    frame: Option<FrameHandle>,
    /// Running spawn timer, if any
    spawn_timer: Option<TimerHandle>,
    music_started: bool,
    last_frame_ms: Option<f64>,
    autopilot: Option<Autopilot>,
}

impl<P: Platform> Game<P> {
    /// Create an idle game for a viewport of size `bounds`
    pub fn new(bounds: Vec2, tuning: Tuning, settings: Settings, seed: u64, platform: P) -> Self {
        Self {
            state: GameState::new(bounds, &tuning),
            tuning,
            settings,
            rng: Pcg32::seed_from_u64(seed),
            platform,
            frame: None,
            spawn_timer: None,
            music_started: false,
            last_frame_ms: None,
            autopilot: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    /// Whether a frame callback is outstanding
    pub fn frame_pending(&self) -> bool {
        self.frame.is_some()
    }

    pub fn spawn_timer(&self) -> Option<TimerHandle> {
        self.spawn_timer
    }

    pub fn autopilot_enabled(&self) -> bool {
        self.autopilot.is_some()
    }

    pub fn set_autopilot(&mut self, autopilot: Option<Autopilot>) {
        self.autopilot = autopilot;
    }

    /// Flip idle mode; returns the new setting
    pub fn toggle_autopilot(&mut self) -> bool {
        self.autopilot = match self.autopilot {
            Some(_) => None,
            None => Some(Autopilot::default()),
        };
        log::info!("Autopilot {}", if self.autopilot.is_some() { "on" } else { "off" });
        self.autopilot.is_some()
    }

    /// Start button: fresh game with one frame chain and one spawn timer
    pub fn start(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.platform.cancel_frame(handle);
        }

        self.reset_game();

        self.frame = self.platform.request_frame();
        if self.frame.is_none() {
            log::warn!("Frame request refused; game will not animate");
        }
        self.spawn_timer = self
            .platform
            .start_interval(self.tuning.enemy_spawn_interval_ms);
        if self.spawn_timer.is_none() {
            log::warn!("Spawn timer refused; no enemies will appear");
        }

        self.platform.play(SoundEffect::GameStart);
        self.platform.hide_game_over();
        log::info!("Game started");
    }

    /// Fresh player, empty lists, zero score, Active
    pub fn reset_game(&mut self) {
        if let Some(handle) = self.spawn_timer.take() {
            self.platform.cancel_interval(handle);
        }

        self.state.reset(&self.tuning);
        self.last_frame_ms = None;

        if !self.music_started {
            self.platform.start_music();
            self.music_started = true;
        }

        self.dispatch_events();
    }

    /// Stop the frame loop and show the end screen
    pub fn gameover(&mut self) {
        if !self.state.is_active() {
            return;
        }
        self.state.phase = GamePhase::GameOver;

        if let Some(handle) = self.frame.take() {
            self.platform.cancel_frame(handle);
        }

        self.platform.play(SoundEffect::GameEnd);
        self.platform.show_game_over(self.state.score);
        log::info!("Game over - final score {}", self.state.score);
    }

    /// Display-refresh callback
    pub fn on_frame(&mut self, canvas: &mut dyn Canvas, now_ms: f64) {
        // A frame scheduled before gameover may still arrive
        if !self.state.is_active() {
            return;
        }
        self.frame = None;

        let dt = frame_dt(self.last_frame_ms, now_ms);
        self.last_frame_ms = Some(now_ms);

        if let Some(pilot) = &mut self.autopilot {
            if let Some(target) = pilot.tick(&self.state, &self.tuning) {
                fire(&mut self.state, &self.tuning, target);
            }
        }

        let outcome = step(
            &mut self.state,
            &self.tuning,
            &self.settings,
            canvas,
            &mut self.rng,
            dt,
        );
        self.dispatch_events();

        match outcome {
            StepOutcome::PlayerHit => self.gameover(),
            StepOutcome::Continue => self.frame = self.platform.request_frame(),
        }
    }

    /// Spawn timer callback
    pub fn on_spawn_timer(&mut self) {
        if !self.state.is_active() {
            return;
        }
        spawn_enemy(&mut self.state, &self.tuning, &mut self.rng);
    }

    /// Click at `point` in canvas coordinates
    pub fn on_click(&mut self, point: Vec2) {
        if fire(&mut self.state, &self.tuning, point) {
            self.dispatch_events();
        }
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Shot => self.platform.play(SoundEffect::Shoot),
                GameEvent::EnemyHit => self.platform.play(SoundEffect::EnemyHit),
                GameEvent::EnemyDestroyed => self.platform.play(SoundEffect::EnemyDestroyed),
                GameEvent::ScoreChanged(score) => self.platform.show_score(score),
            }
        }
    }
}

/// Seconds since the previous frame, clamped for tweens
///
/// The first frame of a game has no predecessor and uses a nominal 60 Hz.
fn frame_dt(last_frame_ms: Option<f64>, now_ms: f64) -> f32 {
    match last_frame_ms {
        Some(prev) => (((now_ms - prev) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
        None => FRAME_DT,
    }
}
