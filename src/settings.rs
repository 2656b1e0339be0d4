//! Game settings and preferences
//!
//! Read once at startup; never written back.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 200,
            QualityPreset::Medium => 800,
            QualityPreset::High => 4000,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Fade the previous frame instead of clearing it
    pub trails: bool,
    /// Explosion particles
    pub particles: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute everything
    pub muted: bool,
    /// Background track location; no track is played when unset
    pub music_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,

            trails: true,
            particles: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            music_url: None,
        }
    }
}

impl Settings {
    /// Apply a quality preset (Low also drops the fade trail)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        if preset == QualityPreset::Low {
            self.trails = false;
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Parse settings from JSON, clamping volumes into range
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        for (field, volume) in [
            ("master_volume", &mut settings.master_volume),
            ("sfx_volume", &mut settings.sfx_volume),
            ("music_volume", &mut settings.music_volume),
        ] {
            if !volume.is_finite() {
                return Err(ConfigError::invalid(field, "must be a finite number"));
            }
            *volume = volume.clamp(0.0, 1.0);
        }
        Ok(settings)
    }

    /// Load settings from the page (WASM only)
    ///
    /// Reads `<script type="application/json" id="settings">` if present.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("settings"))
            .and_then(|el| el.text_content());

        match json.as_deref().map(Self::from_json) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings from page");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Ignoring page settings: {e}");
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
