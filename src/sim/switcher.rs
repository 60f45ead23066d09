//! Top-level scene switcher.
//!
//! ## States
//!
//!   (WITHOUT, unlocked) ──request/auto──► (WITH, locked) ──1000 ms──► (WITH, unlocked)
//!   (WITH, unlocked)    ──request──────► (WITHOUT, locked) ──1000 ms──► (WITHOUT, unlocked)
//!
//! Requests made while locked are dropped. The auto-advance timer is
//! re-evaluated on every scene or lock change: it runs only in
//! (WITHOUT, unlocked) and restarts from zero each time that state is entered.

use crate::config::ShowcaseConfig;
use crate::domain::story::{WITHOUT_HEADLINE, WITH_HEADLINE};
use crate::domain::Millis;

use super::timer::{Cue, Scheduler, TimerSlot};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Scene {
    Without,
    With,
}

impl Scene {
    pub fn other(self) -> Scene {
        match self {
            Scene::Without => Scene::With,
            Scene::With => Scene::Without,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Scene::Without => WITHOUT_HEADLINE,
            Scene::With => WITH_HEADLINE,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SwitchCause {
    Auto,
    Manual,
}

/// A request that was accepted. `from == to` when the current scene was
/// requested again: the lock still engages.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Transition {
    pub from: Scene,
    pub to: Scene,
    pub cause: SwitchCause,
}

impl Transition {
    pub fn changes_scene(&self) -> bool {
        self.from != self.to
    }
}

pub struct Switcher {
    scene: Scene,
    locked: bool,
    auto_enabled: bool,
    auto_advance_ms: Millis,
    lock_ms: Millis,
    auto: TimerSlot,
    lock: TimerSlot,
}

impl Switcher {
    pub fn new(cfg: &ShowcaseConfig) -> Self {
        Switcher {
            scene: Scene::Without,
            locked: false,
            auto_enabled: cfg.display.auto_advance,
            auto_advance_ms: cfg.timing.auto_advance_ms,
            lock_ms: cfg.timing.transition_lock_ms,
            auto: TimerSlot::empty(),
            lock: TimerSlot::empty(),
        }
    }

    /// Arm the initial auto-advance.
    pub fn start(&mut self, sched: &mut Scheduler) {
        self.rearm_auto(sched);
    }

    pub fn request(&mut self, target: Scene, cause: SwitchCause, sched: &mut Scheduler) -> Option<Transition> {
        if self.locked {
            tracing::debug!(target = target.label(), "switch request ignored while locked");
            return None;
        }
        let from = self.scene;
        self.locked = true;
        self.scene = target;
        self.lock.arm_once(sched, self.lock_ms, Cue::ReleaseLock);
        self.rearm_auto(sched);
        Some(Transition { from, to: target, cause })
    }

    pub fn toggle(&mut self, sched: &mut Scheduler) -> Option<Transition> {
        self.request(self.scene.other(), SwitchCause::Manual, sched)
    }

    pub fn on_auto_advance(&mut self, sched: &mut Scheduler) -> Option<Transition> {
        if self.scene != Scene::Without || self.locked {
            return None;
        }
        self.request(Scene::With, SwitchCause::Auto, sched)
    }

    pub fn on_release(&mut self, sched: &mut Scheduler) {
        self.locked = false;
        self.rearm_auto(sched);
    }

    fn rearm_auto(&mut self, sched: &mut Scheduler) {
        if self.auto_enabled && self.scene == Scene::Without && !self.locked {
            self.auto.arm_once(sched, self.auto_advance_ms, Cue::AutoAdvance);
        } else {
            self.auto.disarm(sched);
        }
    }

    // ── Queries ──

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// When the idle auto-advance will fire, if it is running.
    pub fn auto_due(&self, sched: &Scheduler) -> Option<Millis> {
        self.auto.due(sched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs the switcher alone; returns accepted transitions with their time.
    fn run(sw: &mut Switcher, sched: &mut Scheduler, until: Millis) -> Vec<(Millis, Transition)> {
        let mut out = vec![];
        while let Some(f) = sched.pop_due(until) {
            match f.cue {
                Cue::AutoAdvance => {
                    if let Some(t) = sw.on_auto_advance(sched) {
                        out.push((f.at, t));
                    }
                }
                Cue::ReleaseLock => sw.on_release(sched),
                _ => {}
            }
        }
        sched.settle(until);
        out
    }

    fn started() -> (Switcher, Scheduler) {
        let mut sched = Scheduler::new();
        let mut sw = Switcher::new(&ShowcaseConfig::default());
        sw.start(&mut sched);
        (sw, sched)
    }

    #[test]
    fn loads_on_without_with_auto_advance_armed() {
        let (sw, sched) = started();
        assert_eq!(sw.scene(), Scene::Without);
        assert!(!sw.is_locked());
        assert_eq!(sw.auto_due(&sched), Some(15_000));
    }

    #[test]
    fn auto_advance_at_15s_then_locked_for_one_second() {
        let (mut sw, mut sched) = started();
        assert!(run(&mut sw, &mut sched, 14_999).is_empty());
        let fired = run(&mut sw, &mut sched, 15_000);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].0, 15_000);
        assert_eq!(fired[0].1.to, Scene::With);
        assert_eq!(fired[0].1.cause, SwitchCause::Auto);
        assert_eq!(sw.scene(), Scene::With);

        run(&mut sw, &mut sched, 15_999);
        assert!(sw.is_locked());
        run(&mut sw, &mut sched, 16_000);
        assert!(!sw.is_locked());
        assert_eq!(sw.auto_due(&sched), None, "no auto-advance out of WITH");
    }

    #[test]
    fn requests_while_locked_are_dropped() {
        let (mut sw, mut sched) = started();
        assert!(sw.request(Scene::With, SwitchCause::Manual, &mut sched).is_some());
        assert!(sw.toggle(&mut sched).is_none());
        assert!(sw.request(Scene::Without, SwitchCause::Manual, &mut sched).is_none());
        assert_eq!(sw.scene(), Scene::With);
    }

    #[test]
    fn requesting_current_scene_still_locks() {
        let (mut sw, mut sched) = started();
        let t = sw.request(Scene::Without, SwitchCause::Manual, &mut sched);
        assert_eq!(t.map(|t| t.changes_scene()), Some(false));
        assert!(sw.is_locked());
        assert_eq!(sw.auto_due(&sched), None);
    }

    #[test]
    fn returning_to_without_restarts_idle_delay_after_unlock() {
        let (mut sw, mut sched) = started();
        run(&mut sw, &mut sched, 2000);
        sw.request(Scene::With, SwitchCause::Manual, &mut sched);
        run(&mut sw, &mut sched, 5000);
        sw.toggle(&mut sched);
        // Unlocks at 6000; idle delay counts from there.
        assert!(run(&mut sw, &mut sched, 20_999).is_empty());
        let fired = run(&mut sw, &mut sched, 21_000);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].0, 21_000);
    }

    #[test]
    fn auto_advance_can_be_disabled() {
        let mut cfg = ShowcaseConfig::default();
        cfg.display.auto_advance = false;
        let mut sched = Scheduler::new();
        let mut sw = Switcher::new(&cfg);
        sw.start(&mut sched);
        assert!(run(&mut sw, &mut sched, 100_000).is_empty());
        assert_eq!(sw.scene(), Scene::Without);
    }
}
