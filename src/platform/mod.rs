//! Platform abstraction layer
//!
//! The lifecycle controller talks to the outside world only through these
//! traits:
//! - Sound cues and background music
//! - Score readout and end-of-game modal
//! - Frame and interval scheduling
//!
//! `web` drives a browser page; `headless` is a manual clock used by tests
//! and the native build.

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::HeadlessPlatform;
#[cfg(target_arch = "wasm32")]
pub use web::WebPlatform;

use crate::audio::SoundEffect;

/// Handle of a pending display frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Handle of a running periodic timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub i32);

/// Fire-and-forget audio
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
    /// Start the looping background track; repeated calls are harmless
    fn start_music(&mut self);
}

/// Score readout and end-of-game modal
pub trait ScoreDisplay {
    fn show_score(&mut self, score: u64);
    fn show_game_over(&mut self, final_score: u64);
    fn hide_game_over(&mut self);
}

/// Display-refresh and periodic callbacks
///
/// The platform decides what gets called back; the controller only keeps
/// the handles so it can cancel them.
pub trait Scheduler {
    /// Ask for one frame callback; `None` if the platform refused
    fn request_frame(&mut self) -> Option<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
    /// Start the enemy spawn timer
    fn start_interval(&mut self, period_ms: u32) -> Option<TimerHandle>;
    fn cancel_interval(&mut self, handle: TimerHandle);
}

/// Everything the controller needs from its host
pub trait Platform: AudioSink + ScoreDisplay + Scheduler {}

impl<T: AudioSink + ScoreDisplay + Scheduler> Platform for T {}
