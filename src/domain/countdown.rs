//! The "With Simbian" countdown: three alert counters decaying to zero.
//!
//! Decay per tick:
//!   `rate = max(1, floor(base * min(1, (step + 1) / STEP_COUNT)))`
//! with base 3 (ignored), 2 (wrongly), 1.5 (threats). Each counter is
//! floor-clamped at 0 and latches `reached_zero` the first time it gets
//! there. The latch only ever goes false → true while a session lasts.
//!
//! Decay is a pure function of `(counts, step)`, so ticks from independent
//! timers commute in their final state.

use super::story::STEP_COUNT;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Counter {
    Ignored,
    Wrongly,
    Threats,
}

impl Counter {
    pub const ALL: [Counter; 3] = [Counter::Ignored, Counter::Wrongly, Counter::Threats];

    pub fn label(self) -> &'static str {
        match self {
            Counter::Ignored => "Ignored Alerts",
            Counter::Wrongly => "Wrongly Closed",
            Counter::Threats => "Active Threats",
        }
    }

    pub fn baseline(self) -> u32 {
        match self {
            Counter::Ignored => 75,
            Counter::Wrongly => 42,
            Counter::Threats => 18,
        }
    }

    fn base_rate(self) -> f64 {
        match self {
            Counter::Ignored => 3.0,
            Counter::Wrongly => 2.0,
            Counter::Threats => 1.5,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Scale applied to the base rates: grows with step progress, capped at 1.
pub fn progress_factor(step: i8) -> f64 {
    ((step as f64 + 1.0) / STEP_COUNT as f64).clamp(0.0, 1.0)
}

/// Amount removed from `counter` on one tick at `step`. Never below 1.
pub fn decay_rate(counter: Counter, step: i8) -> u32 {
    (counter.base_rate() * progress_factor(step)).floor().max(1.0) as u32
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AlertCounters {
    counts: [u32; 3],
    reached_zero: [bool; 3],
}

impl AlertCounters {
    pub fn baseline() -> Self {
        AlertCounters {
            counts: Counter::ALL.map(Counter::baseline),
            reached_zero: [false; 3],
        }
    }

    pub fn get(&self, c: Counter) -> u32 {
        self.counts[c.index()]
    }

    pub fn reached_zero(&self, c: Counter) -> bool {
        self.reached_zero[c.index()]
    }

    pub fn all_zero(&self) -> bool {
        self.counts.iter().all(|&n| n == 0)
    }

    /// One countdown tick. Returns the counters that hit zero on this tick.
    pub fn decay(&mut self, step: i8) -> Vec<Counter> {
        let mut zeroed = Vec::new();
        for c in Counter::ALL {
            let i = c.index();
            if self.counts[i] == 0 {
                continue;
            }
            self.counts[i] = self.counts[i].saturating_sub(decay_rate(c, step));
            if self.counts[i] == 0 && !self.reached_zero[i] {
                self.reached_zero[i] = true;
                zeroed.push(c);
            }
        }
        zeroed
    }
}
