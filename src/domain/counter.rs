//! Eased count-up display.
//!
//! `value = floor(start + ease_out_cubic(progress) * (target - start))`
//! with `progress = clamp(elapsed / duration, 0, 1)`. Once progress reaches
//! 1 the value is exactly the target and stays there until the next
//! `retarget`. With `animate` off the value snaps.

use super::Millis;

/// Default interpolation length.
pub const DEFAULT_DURATION_MS: Millis = 2000;

#[inline]
pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

#[derive(Clone, Debug)]
pub struct CounterAnimator {
    start: i64,
    target: i64,
    started_at: Millis,
    duration_ms: Millis,
    animate: bool,
}

impl CounterAnimator {
    /// Starts displaying 0.
    pub fn new(duration_ms: Millis, animate: bool) -> Self {
        CounterAnimator { start: 0, target: 0, started_at: 0, duration_ms, animate }
    }

    /// Restart from whatever is displayed at `now` toward `target`.
    pub fn retarget(&mut self, target: i64, now: Millis) {
        self.start = self.value_at(now);
        self.target = target;
        self.started_at = now;
    }

    /// Turning animation off snaps the display to the current target.
    pub fn set_animate(&mut self, animate: bool) {
        self.animate = animate;
    }

    pub fn progress_at(&self, now: Millis) -> f64 {
        if !self.animate || self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at) as f64;
        (elapsed / self.duration_ms as f64).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, now: Millis) -> i64 {
        let p = self.progress_at(now);
        if p >= 1.0 {
            return self.target;
        }
        let delta = (self.target - self.start) as f64;
        (self.start as f64 + ease_out_cubic(p) * delta).floor() as i64
    }

    /// No more frames needed.
    pub fn is_settled(&self, now: Millis) -> bool {
        self.progress_at(now) >= 1.0
    }
}
