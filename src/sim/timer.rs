//! Virtual-time timer queue.
//!
//! Every timed behavior in the showcase (auto-advance, step ticks, card ticks,
//! delayed counter bumps, shake and glow pulses) is a `Cue` scheduled here. Components
//! never hold callbacks; they hold a `TimerSlot` and react when the
//! `Showcase` dispatches the cue back to them.
//!
//! ## Ordering
//!
//! Cues pop in `(due, id)` order. Ids are handed out in arming order, so
//! two timers due at the same millisecond fire in the order they were armed,
//! including repeating timers on later periods. Repeating timers re-arm at
//! `due + period` (not `now + period`), which makes catch-up after a long
//! `advance_to` exact.
//!
//! ## Cancellation
//!
//! `cancel` removes the live entry; the stale heap key is skipped lazily on
//! pop. A cancelled cue never fires.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::domain::card::CardKind;
use crate::domain::icon::TokenId;
pub use crate::domain::Millis;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a fired timer means. Routed by `Showcase::dispatch`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cue {
    /// Switcher: leave "Without" after the idle delay.
    AutoAdvance,
    /// Switcher: transition finished, accept requests again.
    ReleaseLock,
    /// Without scene: next problem statement.
    RotateProblem,
    /// Without scene: deferred +1 for a received notification.
    BumpThreats(TokenId),
    /// With scene: next step.
    AdvanceStep,
    /// With scene: counter decay tick.
    Countdown,
    /// Alert card periodic tick.
    CardTick(CardKind),
    /// Alert card glow ends.
    PulseEnd(CardKind),
    /// Alert card shake ends.
    ShakeEnd(CardKind),
}

#[derive(Clone, Copy, Debug)]
enum Repeat {
    Once,
    Every(Millis),
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    due: Millis,
    repeat: Repeat,
    cue: Cue,
}

/// A cue popped from the queue, with the virtual time it was due at.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Fired {
    pub at: Millis,
    pub cue: Cue,
}

pub struct Scheduler {
    now: Millis,
    next_id: u64,
    live: HashMap<TimerId, Entry>,
    queue: BinaryHeap<Reverse<(Millis, TimerId)>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler {
            now: 0,
            next_id: 0,
            live: HashMap::new(),
            queue: BinaryHeap::new(),
        }
    }

    #[inline]
    pub fn now(&self) -> Millis {
        self.now
    }

    /// One-shot timer firing `delay` ms from now.
    pub fn after(&mut self, delay: Millis, cue: Cue) -> TimerId {
        self.insert(self.now + delay, Repeat::Once, cue)
    }

    /// Repeating timer, first firing one `period` from now.
    /// A zero period is clamped to 1 ms so the queue always makes progress.
    pub fn every(&mut self, period: Millis, cue: Cue) -> TimerId {
        let period = period.max(1);
        self.insert(self.now + period, Repeat::Every(period), cue)
    }

    /// Release a timer. Returns false if it had already fired (one-shot)
    /// or been cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id).is_some()
    }

    /// When a live timer fires next.
    pub fn due(&self, id: TimerId) -> Option<Millis> {
        self.live.get(&id).map(|e| e.due)
    }

    pub fn pending(&self) -> usize {
        self.live.len()
    }

    /// Pop the earliest cue due at or before `until`, moving the clock to its
    /// due time. Returns None (and leaves the clock alone) when nothing is due.
    pub fn pop_due(&mut self, until: Millis) -> Option<Fired> {
        loop {
            let Reverse((due, id)) = *self.queue.peek()?;
            if due > until {
                return None;
            }
            self.queue.pop();

            // Stale key: the timer was cancelled.
            let entry = match self.live.get(&id) {
                Some(e) if e.due == due => *e,
                _ => continue,
            };

            self.now = self.now.max(due);
            match entry.repeat {
                Repeat::Once => {
                    self.live.remove(&id);
                }
                Repeat::Every(period) => {
                    let next = Entry { due: due + period, ..entry };
                    self.queue.push(Reverse((next.due, id)));
                    self.live.insert(id, next);
                }
            }
            return Some(Fired { at: due, cue: entry.cue });
        }
    }

    /// Move the clock forward once every due cue up to `t` has been popped.
    pub fn settle(&mut self, t: Millis) {
        self.now = self.now.max(t);
    }

    // ── Internal ──

    fn insert(&mut self, due: Millis, repeat: Repeat, cue: Cue) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, Entry { due, repeat, cue });
        self.queue.push(Reverse((due, id)));
        id
    }
}

// ══════════════════════════════════════════════════════════════
// TimerSlot: the owned handle a component stores
// ══════════════════════════════════════════════════════════════

/// Holds at most one armed timer. Arming replaces (and releases) whatever
/// was armed before; `disarm` must run on every deactivation path.
#[derive(Debug, Default)]
pub struct TimerSlot {
    id: Option<TimerId>,
}

impl TimerSlot {
    pub const fn empty() -> Self {
        TimerSlot { id: None }
    }

    pub fn arm_once(&mut self, sched: &mut Scheduler, delay: Millis, cue: Cue) {
        self.disarm(sched);
        self.id = Some(sched.after(delay, cue));
    }

    pub fn arm_every(&mut self, sched: &mut Scheduler, period: Millis, cue: Cue) {
        self.disarm(sched);
        self.id = Some(sched.every(period, cue));
    }

    pub fn disarm(&mut self, sched: &mut Scheduler) {
        if let Some(id) = self.id.take() {
            sched.cancel(id);
        }
    }

    /// Next firing time while the timer is still queued.
    pub fn due(&self, sched: &Scheduler) -> Option<Millis> {
        self.id.and_then(|id| sched.due(id))
    }

    #[cfg(test)]
    pub fn is_armed(&self, sched: &Scheduler) -> bool {
        self.due(sched).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler, until: Millis) -> Vec<(Millis, Cue)> {
        let mut out = vec![];
        while let Some(f) = s.pop_due(until) {
            out.push((f.at, f.cue));
        }
        s.settle(until);
        out
    }

    #[test]
    fn one_shot_fires_once_at_due_time() {
        let mut s = Scheduler::new();
        s.after(100, Cue::AutoAdvance);
        assert!(drain(&mut s, 99).is_empty());
        assert_eq!(drain(&mut s, 100), vec![(100, Cue::AutoAdvance)]);
        assert!(drain(&mut s, 10_000).is_empty());
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn repeating_timer_catches_up_exactly() {
        let mut s = Scheduler::new();
        s.every(150, Cue::Countdown);
        let fired = drain(&mut s, 1000);
        let times: Vec<Millis> = fired.iter().map(|(t, _)| *t).collect();
        assert_eq!(times, vec![150, 300, 450, 600, 750, 900]);
        assert_eq!(s.now(), 1000);
    }

    #[test]
    fn ties_fire_in_arming_order() {
        let mut s = Scheduler::new();
        s.every(4000, Cue::CardTick(CardKind::IgnoredAlerts));
        s.every(5000, Cue::CardTick(CardKind::WronglyClosed));
        let fired = drain(&mut s, 20_000);
        let last_two: Vec<Cue> = fired.iter().rev().take(2).rev().map(|(_, c)| *c).collect();
        assert_eq!(
            last_two,
            vec![
                Cue::CardTick(CardKind::IgnoredAlerts),
                Cue::CardTick(CardKind::WronglyClosed),
            ]
        );
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut s = Scheduler::new();
        let a = s.after(10, Cue::ReleaseLock);
        let b = s.every(5, Cue::Countdown);
        assert!(s.cancel(a));
        assert!(!s.cancel(a));
        assert_eq!(drain(&mut s, 5).len(), 1);
        s.cancel(b);
        assert!(drain(&mut s, 1000).is_empty());
    }

    #[test]
    fn zero_period_is_clamped() {
        let mut s = Scheduler::new();
        s.every(0, Cue::Countdown);
        assert_eq!(drain(&mut s, 3).len(), 3);
    }

    #[test]
    fn slot_rearm_releases_previous_timer() {
        let mut s = Scheduler::new();
        let mut slot = TimerSlot::empty();
        slot.arm_once(&mut s, 100, Cue::AutoAdvance);
        slot.arm_once(&mut s, 300, Cue::AutoAdvance);
        assert_eq!(s.pending(), 1);
        assert_eq!(slot.due(&s), Some(300));
        assert_eq!(drain(&mut s, 1000), vec![(300, Cue::AutoAdvance)]);
        assert!(!slot.is_armed(&s));
    }

    #[test]
    fn slot_disarm_is_idempotent() {
        let mut s = Scheduler::new();
        let mut slot = TimerSlot::empty();
        slot.arm_every(&mut s, 10, Cue::RotateProblem);
        assert!(slot.is_armed(&s));
        slot.disarm(&mut s);
        slot.disarm(&mut s);
        assert!(!slot.is_armed(&s));
        assert!(drain(&mut s, 100).is_empty());
    }
}
