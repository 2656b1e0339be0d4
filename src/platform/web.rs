//! Browser platform: DOM score readout, Web Audio cues, rAF and setInterval
//!
//! The frame and spawn callbacks are JS closures created by the entry point
//! once the game is shared; until they are installed, scheduling requests
//! are refused.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Window};

use super::{AudioSink, FrameHandle, ScoreDisplay, Scheduler, TimerHandle};
use crate::audio::{AudioManager, SoundEffect};

pub struct WebPlatform {
    window: Window,
    audio: AudioManager,
    score_el: Option<Element>,
    modal_el: Option<Element>,
    modal_score_el: Option<Element>,
    on_frame: Option<Closure<dyn FnMut(f64)>>,
    on_spawn: Option<Closure<dyn FnMut()>>,
}

impl WebPlatform {
    /// Look up `#scoreEl`, `#modalEl` and `#modalScoreEl`; missing ones are skipped
    pub fn new(window: Window, audio: AudioManager) -> Self {
        let lookup = |id: &str| {
            let el = window.document().and_then(|d| d.get_element_by_id(id));
            if el.is_none() {
                log::warn!("Element #{id} not found");
            }
            el
        };
        let score_el = lookup("scoreEl");
        let modal_el = lookup("modalEl");
        let modal_score_el = lookup("modalScoreEl");

        Self {
            window,
            audio,
            score_el,
            modal_el,
            modal_score_el,
            on_frame: None,
            on_spawn: None,
        }
    }

    /// Hand over the JS callbacks for frames and spawn ticks
    pub fn install_callbacks(
        &mut self,
        on_frame: Closure<dyn FnMut(f64)>,
        on_spawn: Closure<dyn FnMut()>,
    ) {
        self.on_frame = Some(on_frame);
        self.on_spawn = Some(on_spawn);
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }
}

impl AudioSink for WebPlatform {
    fn play(&mut self, effect: SoundEffect) {
        self.audio.play(effect);
    }

    fn start_music(&mut self) {
        self.audio.start_music();
    }
}

impl ScoreDisplay for WebPlatform {
    fn show_score(&mut self, score: u64) {
        if let Some(el) = &self.score_el {
            el.set_text_content(Some(&score.to_string()));
        }
    }

    fn show_game_over(&mut self, final_score: u64) {
        if let Some(el) = &self.modal_score_el {
            el.set_text_content(Some(&final_score.to_string()));
        }
        if let Some(el) = &self.modal_el {
            let _ = el.set_attribute("class", "");
        }
    }

    fn hide_game_over(&mut self) {
        if let Some(el) = &self.modal_el {
            let _ = el.set_attribute("class", "hidden");
        }
    }
}

impl Scheduler for WebPlatform {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let callback = self.on_frame.as_ref()?;
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => Some(FrameHandle(id)),
            Err(err) => {
                log::warn!("requestAnimationFrame failed: {err:?}");
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(err) = self.window.cancel_animation_frame(handle.0) {
            log::warn!("cancelAnimationFrame failed: {err:?}");
        }
    }

    fn start_interval(&mut self, period_ms: u32) -> Option<TimerHandle> {
        let callback = self.on_spawn.as_ref()?;
        let timeout = i32::try_from(period_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                timeout,
            ) {
            Ok(id) => Some(TimerHandle(id)),
            Err(err) => {
                log::warn!("setInterval failed: {err:?}");
                None
            }
        }
    }

    fn cancel_interval(&mut self, handle: TimerHandle) {
        self.window.clear_interval_with_handle(handle.0);
    }
}
