//! Data-driven game balance
//!
//! Every gameplay constant lives here so a page can override them with a
//! JSON blob without a rebuild. Defaults come from [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player_radius: f32,

    pub projectile_radius: f32,
    /// Pixels per frame
    pub projectile_speed: f32,

    /// Pixels per frame
    pub enemy_speed: f32,
    pub enemy_spawn_interval_ms: u32,
    /// Spawn radius range, `[min, max)`
    pub enemy_min_radius: f32,
    pub enemy_max_radius: f32,
    pub enemy_shrink: f32,
    pub enemy_min_viable_radius: f32,
    /// Seconds
    pub shrink_duration: f32,

    pub hit_score: u64,
    pub destroy_score: u64,

    pub particle_friction: f32,
    pub particle_alpha_decay: f32,
    pub particle_max_radius: f32,
    pub particle_max_speed: f32,
    pub particles_per_radius: f32,

    pub overlay_alpha: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_radius: PLAYER_RADIUS,

            projectile_radius: PROJECTILE_RADIUS,
            projectile_speed: PROJECTILE_SPEED,

            enemy_speed: ENEMY_SPEED,
            enemy_spawn_interval_ms: ENEMY_SPAWN_INTERVAL_MS,
            enemy_min_radius: ENEMY_MIN_RADIUS,
            enemy_max_radius: ENEMY_MAX_RADIUS,
            enemy_shrink: ENEMY_SHRINK,
            enemy_min_viable_radius: ENEMY_MIN_VIABLE_RADIUS,
            shrink_duration: SHRINK_DURATION,

            hit_score: HIT_SCORE,
            destroy_score: DESTROY_SCORE,

            particle_friction: PARTICLE_FRICTION,
            particle_alpha_decay: PARTICLE_ALPHA_DECAY,
            particle_max_radius: PARTICLE_MAX_RADIUS,
            particle_max_speed: PARTICLE_MAX_SPEED,
            particles_per_radius: PARTICLES_PER_RADIUS,

            overlay_alpha: OVERLAY_ALPHA,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("player_radius", self.player_radius),
            ("projectile_radius", self.projectile_radius),
            ("projectile_speed", self.projectile_speed),
            ("enemy_speed", self.enemy_speed),
            ("enemy_min_radius", self.enemy_min_radius),
            ("enemy_shrink", self.enemy_shrink),
            ("particle_alpha_decay", self.particle_alpha_decay),
        ];
        for (field, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::invalid(field, format!("must be positive, got {value}")));
            }
        }

        if self.enemy_spawn_interval_ms == 0 {
            return Err(ConfigError::invalid("enemy_spawn_interval_ms", "must be non-zero"));
        }
        if self.enemy_max_radius <= self.enemy_min_radius {
            return Err(ConfigError::invalid(
                "enemy_max_radius",
                format!(
                    "must exceed enemy_min_radius ({} <= {})",
                    self.enemy_max_radius, self.enemy_min_radius
                ),
            ));
        }
        if self.enemy_min_viable_radius < 0.0 {
            return Err(ConfigError::invalid("enemy_min_viable_radius", "must not be negative"));
        }
        if self.shrink_duration < 0.0 {
            return Err(ConfigError::invalid("shrink_duration", "must not be negative"));
        }
        if !(self.particle_friction > 0.0 && self.particle_friction <= 1.0) {
            return Err(ConfigError::invalid("particle_friction", "must be in (0, 1]"));
        }
        if self.particle_max_radius < 0.0 || self.particle_max_speed < 0.0 {
            return Err(ConfigError::invalid("particle_max_radius", "particle limits must not be negative"));
        }
        if self.particles_per_radius < 0.0 {
            return Err(ConfigError::invalid("particles_per_radius", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.overlay_alpha) {
            return Err(ConfigError::invalid("overlay_alpha", "must be in [0, 1]"));
        }
        Ok(())
    }

    /// Load tuning overrides from the page (WASM only)
    ///
    /// Reads `<script type="application/json" id="tuning">`; anything missing
    /// or invalid falls back to defaults.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("tuning"))
            .and_then(|el| el.text_content());

        match json.as_deref().map(Self::from_json) {
            Some(Ok(tuning)) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Some(Err(e)) => {
                log::warn!("Ignoring tuning overrides: {e}");
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Native builds always use defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
