//! Audio: sound cues, volume mixing and the Web Audio backend
//!
//! Cues are procedurally generated with oscillators - no files needed.
//! Only the optional background track is streamed from a URL.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Projectile fired
    Shoot,
    /// Enemy hit and shrunk
    EnemyHit,
    /// Enemy destroyed
    EnemyDestroyed,
    /// Game started
    GameStart,
    /// Game over
    GameEnd,
}

/// Volume levels derived from settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mixer {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for Mixer {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl Mixer {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Effective cue volume
    pub fn sfx(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective background track volume
    pub fn music(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

    use super::{Mixer, SoundEffect};

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        mixer: Mixer,
        music_url: Option<String>,
        music: Option<HtmlAudioElement>,
    }

    impl AudioManager {
        pub fn new(mixer: Mixer, music_url: Option<String>) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                mixer,
                music_url,
                music: None,
            }
        }

        /// Mute/unmute all audio, including the background track
        pub fn set_muted(&mut self, muted: bool) {
            self.mixer.set_muted(muted);
            if let Some(music) = &self.music {
                music.set_volume(self.mixer.music() as f64);
            }
        }

        pub fn is_muted(&self) -> bool {
            self.mixer.is_muted()
        }

        /// Start the looping background track (no-op once started or when
        /// no track is configured)
        pub fn start_music(&mut self) {
            if self.music.is_some() {
                return;
            }
            let Some(url) = self.music_url.as_deref() else {
                log::info!("No background track configured");
                return;
            };
            let Ok(music) = HtmlAudioElement::new_with_src(url) else {
                log::warn!("Failed to create background audio element");
                return;
            };
            music.set_loop(true);
            music.set_volume(self.mixer.music() as f64);
            if music.play().is_err() {
                log::warn!("Background music refused to play");
            }
            self.music = Some(music);
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.mixer.sfx();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Shoot => self.play_shoot(ctx, vol),
                SoundEffect::EnemyHit => self.play_enemy_hit(ctx, vol),
                SoundEffect::EnemyDestroyed => self.play_enemy_destroyed(ctx, vol),
                SoundEffect::GameStart => self.play_game_start(ctx, vol),
                SoundEffect::GameEnd => self.play_game_end(ctx, vol),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Shoot - short rising zap
        fn play_shoot(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.frequency().set_value_at_time(900.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(300.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Enemy hit - soft thump
        fn play_enemy_hit(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(120.0, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.12).ok();
        }

        /// Enemy destroyed - boom with a crack on top
        fn play_enemy_destroyed(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.4, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                    .ok();
                osc.frequency().set_value_at_time(100.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(30.0, t + 0.35)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.4).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 1500.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.15, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }

        /// Game start - rising arpeggio
        fn play_game_start(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
                let delay = i as f64 * 0.08;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.25).ok();
                }
            }
        }

        /// Game end - sad descending tones
        fn play_game_end(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
                let delay = i as f64 * 0.2;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.4).ok();
                }
            }
        }
    }
}
