//! Frame clock

use std::time::Instant;

/// Longest wall-clock frame the clock will report; a stalled host must not fast-forward a show
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Tracks show time and hands out per-frame deltas.
///
/// Interactive hosts call [`FrameClock::tick`] once per animation frame and
/// read `delta_time`. Headless runs call [`FrameClock::advance`] with a
/// fixed step instead, so results do not depend on wall-clock jitter.
pub struct FrameClock {
    /// Total elapsed show time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Frames observed so far
    pub frame_count: u64,
    last_instant: Instant,
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            frame_count: 0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance from the wall clock. Call once per rendered frame.
    /// Gaps longer than [`MAX_FRAME_TIME`] are clamped.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            self.frame_count += 1;
            return;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed.min(MAX_FRAME_TIME));
    }

    /// Advance by an explicit delta (headless stepping and tests).
    /// The step is taken as given; negative or non-finite deltas count as 0.
    pub fn advance(&mut self, dt: f64) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.first_tick = false;
        self.delta_time = dt;
        self.total_time += dt;
        self.frame_count += 1;
    }
}
