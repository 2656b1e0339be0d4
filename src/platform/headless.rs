//! In-process platform with a manual clock
//!
//! Records everything the controller asks of it. [`run_for`] advances the
//! clock and dispatches frame and timer callbacks in time order, the way a
//! browser event loop would.

use crate::audio::SoundEffect;
use crate::game::Game;
use crate::render::Canvas;

use super::{AudioSink, FrameHandle, ScoreDisplay, Scheduler, TimerHandle};

/// Nominal display refresh period (ms)
pub const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone, Copy)]
struct Interval {
    handle: TimerHandle,
    period_ms: f64,
    next_due: f64,
}

/// A callback that came due
#[derive(Debug, Clone, Copy, PartialEq)]
enum Due {
    Frame(f64),
    Interval(f64),
}

#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    now_ms: f64,
    next_handle: i32,
    frames: Vec<(FrameHandle, f64)>,
    intervals: Vec<Interval>,
    /// Every cue played, oldest first
    pub cues: Vec<SoundEffect>,
    pub music_starts: u32,
    /// Last value shown on the score readout
    pub score: Option<u64>,
    /// Last value shown on the end screen
    pub game_over_score: Option<u64>,
    pub modal_visible: bool,
    pub frames_cancelled: u32,
    pub intervals_cancelled: u32,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock value (ms)
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Frame callbacks requested and not yet run or cancelled
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Periodic timers still running
    pub fn active_intervals(&self) -> usize {
        self.intervals.len()
    }

    fn allocate(&mut self) -> i32 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Pop the earliest callback due no later than `until`, moving the clock
    ///
    /// Timers win ties with frames.
    fn pop_due(&mut self, until: f64) -> Option<Due> {
        let frame = self
            .frames
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.1.total_cmp(&b.1))
            .map(|(i, &(_, at))| (i, at));
        let interval = self
            .intervals
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.next_due.total_cmp(&b.next_due))
            .map(|(i, t)| (i, t.next_due));

        let due = match (frame, interval) {
            (Some((fi, fat)), Some((_, iat))) if fat < iat => Some((Due::Frame(fat), fi)),
            (_, Some((ii, iat))) => Some((Due::Interval(iat), ii)),
            (Some((fi, fat)), None) => Some((Due::Frame(fat), fi)),
            (None, None) => None,
        };

        let (due, index) = due?;
        match due {
            Due::Frame(at) if at <= until => {
                self.frames.remove(index);
                self.now_ms = at;
            }
            Due::Interval(at) if at <= until => {
                let interval = &mut self.intervals[index];
                interval.next_due += interval.period_ms;
                self.now_ms = at;
            }
            _ => return None,
        }
        Some(due)
    }
}

impl AudioSink for HeadlessPlatform {
    fn play(&mut self, effect: SoundEffect) {
        self.cues.push(effect);
    }

    fn start_music(&mut self) {
        self.music_starts += 1;
    }
}

impl ScoreDisplay for HeadlessPlatform {
    fn show_score(&mut self, score: u64) {
        self.score = Some(score);
    }

    fn show_game_over(&mut self, final_score: u64) {
        self.game_over_score = Some(final_score);
        self.modal_visible = true;
    }

    fn hide_game_over(&mut self) {
        self.modal_visible = false;
    }
}

impl Scheduler for HeadlessPlatform {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let handle = FrameHandle(self.allocate());
        self.frames.push((handle, self.now_ms + FRAME_MS));
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.frames.len();
        self.frames.retain(|(h, _)| *h != handle);
        if self.frames.len() < before {
            self.frames_cancelled += 1;
        }
    }

    fn start_interval(&mut self, period_ms: u32) -> Option<TimerHandle> {
        if period_ms == 0 {
            log::warn!("Refusing zero-period timer");
            return None;
        }
        let handle = TimerHandle(self.allocate());
        let period_ms = f64::from(period_ms);
        self.intervals.push(Interval {
            handle,
            period_ms,
            next_due: self.now_ms + period_ms,
        });
        Some(handle)
    }

    fn cancel_interval(&mut self, handle: TimerHandle) {
        let before = self.intervals.len();
        self.intervals.retain(|t| t.handle != handle);
        if self.intervals.len() < before {
            self.intervals_cancelled += 1;
        }
    }
}

/// Callbacks dispatched by one [`run_for`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: usize,
    pub intervals: usize,
}

/// Advance the clock by `duration_ms`, running every callback that comes due
pub fn run_for(
    game: &mut Game<HeadlessPlatform>,
    canvas: &mut dyn Canvas,
    duration_ms: f64,
) -> RunSummary {
    let until = game.platform().now_ms + duration_ms;
    let mut summary = RunSummary::default();

    while let Some(due) = game.platform_mut().pop_due(until) {
        match due {
            Due::Frame(at) => {
                game.on_frame(canvas, at);
                summary.frames += 1;
            }
            Due::Interval(_) => {
                game.on_spawn_timer();
                summary.intervals += 1;
            }
        }
    }

    game.platform_mut().now_ms = until;
    summary
}
