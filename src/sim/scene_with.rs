//! "With Simbian" scene: the five-step walkthrough and the alert countdown.
//!
//! ## Step index
//!
//!   -1      inactive
//!   0..=4   walking through `STEPS`
//!   5       complete, solution summaries shown
//!
//! The step timer adds exactly one per firing and releases itself at 5.
//! The countdown timer decays the three counters every tick and releases
//! itself once all of them are zero.

use crate::config::ShowcaseConfig;
use crate::domain::countdown::{AlertCounters, Counter};
use crate::domain::story::STEP_COUNT;
use crate::domain::Millis;

use super::event::ShowcaseEvent;
use super::runtime::Runtime;
use super::timer::{Cue, TimerSlot};

pub const INACTIVE_STEP: i8 = -1;

pub struct WithScene {
    step_ms: Millis,
    countdown_ms: Millis,
    step: i8,
    counters: AlertCounters,
    step_timer: TimerSlot,
    countdown: TimerSlot,
}

impl WithScene {
    pub fn new(cfg: &ShowcaseConfig) -> Self {
        WithScene {
            step_ms: cfg.timing.step_interval_ms,
            countdown_ms: cfg.timing.countdown_interval_ms,
            step: INACTIVE_STEP,
            counters: AlertCounters::baseline(),
            step_timer: TimerSlot::empty(),
            countdown: TimerSlot::empty(),
        }
    }

    pub fn activate(&mut self, rt: &mut Runtime) {
        self.step = 0;
        self.counters = AlertCounters::baseline();
        self.step_timer.arm_every(&mut rt.sched, self.step_ms, Cue::AdvanceStep);
        self.countdown.arm_every(&mut rt.sched, self.countdown_ms, Cue::Countdown);
        tracing::debug!(at = rt.now(), "with scene active");
    }

    pub fn deactivate(&mut self, rt: &mut Runtime) {
        self.step = INACTIVE_STEP;
        self.step_timer.disarm(&mut rt.sched);
        self.countdown.disarm(&mut rt.sched);
    }

    pub fn on_advance_step(&mut self, rt: &mut Runtime, events: &mut Vec<ShowcaseEvent>) {
        if self.step < 0 || self.step >= STEP_COUNT {
            self.step_timer.disarm(&mut rt.sched);
            return;
        }
        self.step += 1;
        tracing::info!(step = self.step, "step advanced");
        events.push(ShowcaseEvent::StepAdvanced { step: self.step });
        if self.step >= STEP_COUNT {
            self.step_timer.disarm(&mut rt.sched);
        }
    }

    pub fn on_countdown(&mut self, rt: &mut Runtime, events: &mut Vec<ShowcaseEvent>) {
        if self.step < 0 {
            self.countdown.disarm(&mut rt.sched);
            return;
        }
        for counter in self.counters.decay(self.step) {
            tracing::info!(counter = counter.label(), "counter reached zero");
            events.push(ShowcaseEvent::CounterZeroed { counter });
        }
        if self.counters.all_zero() {
            self.countdown.disarm(&mut rt.sched);
            events.push(ShowcaseEvent::CountdownFinished);
        }
    }

    // ── Queries ──

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.step >= 0
    }

    pub fn current_step(&self) -> i8 {
        self.step
    }

    pub fn counters(&self) -> &AlertCounters {
        &self.counters
    }

    pub fn count(&self, counter: Counter) -> u32 {
        self.counters.get(counter)
    }

    pub fn solutions_visible(&self) -> bool {
        self.step >= STEP_COUNT
    }

    /// Progress bar fill: 0 before the first step, `step / 4` while running,
    /// 1 once complete.
    pub fn progress_ratio(&self) -> f64 {
        if self.step <= 0 {
            return 0.0;
        }
        (self.step as f64 / (STEP_COUNT - 1) as f64).min(1.0)
    }

    #[cfg(test)]
    pub fn is_counting(&self, rt: &Runtime) -> bool {
        self.countdown.is_armed(&rt.sched)
    }

    #[cfg(test)]
    pub fn is_stepping(&self, rt: &Runtime) -> bool {
        self.step_timer.is_armed(&rt.sched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pick::Picker;

    fn rig() -> (Runtime, WithScene) {
        let mut rt = Runtime::new(Picker::seeded(1));
        let mut scene = WithScene::new(&ShowcaseConfig::default());
        scene.activate(&mut rt);
        (rt, scene)
    }

    fn run(rt: &mut Runtime, scene: &mut WithScene, until: Millis) -> Vec<(Millis, ShowcaseEvent)> {
        let mut out = vec![];
        while let Some(f) = rt.sched.pop_due(until) {
            let mut ev = vec![];
            match f.cue {
                Cue::AdvanceStep => scene.on_advance_step(rt, &mut ev),
                Cue::Countdown => scene.on_countdown(rt, &mut ev),
                _ => {}
            }
            out.extend(ev.into_iter().map(|e| (f.at, e)));
        }
        rt.sched.settle(until);
        out
    }

    #[test]
    fn new_scene_is_inactive() {
        let scene = WithScene::new(&ShowcaseConfig::default());
        assert_eq!(scene.current_step(), -1);
        assert!(!scene.is_active());
        assert_eq!(scene.progress_ratio(), 0.0);
    }

    #[test]
    fn steps_advance_one_per_second_and_stop_at_five() {
        let (mut rt, mut scene) = rig();
        assert_eq!(scene.current_step(), 0);
        let mut seen = vec![];
        for t in (1000..=8000).step_by(1000) {
            run(&mut rt, &mut scene, t);
            seen.push(scene.current_step());
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 5, 5, 5]);
        assert!(!scene.is_stepping(&rt));
        assert!(scene.solutions_visible());
        assert_eq!(scene.progress_ratio(), 1.0);
    }

    #[test]
    fn progress_ratio_tracks_step() {
        let (mut rt, mut scene) = rig();
        run(&mut rt, &mut scene, 2000);
        assert_eq!(scene.progress_ratio(), 0.5);
        assert!(!scene.solutions_visible());
    }

    #[test]
    fn countdown_drains_all_counters_and_stops() {
        let (mut rt, mut scene) = rig();
        let events = run(&mut rt, &mut scene, 20_000);
        assert!(Counter::ALL.iter().all(|&c| scene.count(c) == 0));
        assert!(Counter::ALL.iter().all(|&c| scene.counters().reached_zero(c)));
        assert!(!scene.is_counting(&rt));
        let zeroed = events
            .iter()
            .filter(|(_, e)| matches!(e, ShowcaseEvent::CounterZeroed { .. }))
            .count();
        assert_eq!(zeroed, 3);
        let finished: Vec<_> = events
            .iter()
            .filter(|(_, e)| *e == ShowcaseEvent::CountdownFinished)
            .collect();
        assert_eq!(finished.len(), 1);
    }

    #[test]
    fn counters_are_clamped_at_zero() {
        let (mut rt, mut scene) = rig();
        run(&mut rt, &mut scene, 60_000);
        assert_eq!(scene.count(Counter::Ignored), 0);
        assert_eq!(rt.sched.pending(), 0);
    }

    #[test]
    fn first_countdown_tick_uses_step_zero_rates() {
        let (mut rt, mut scene) = rig();
        run(&mut rt, &mut scene, 150);
        assert_eq!(scene.count(Counter::Ignored), 74);
        assert_eq!(scene.count(Counter::Wrongly), 41);
        assert_eq!(scene.count(Counter::Threats), 17);
    }

    #[test]
    fn deactivate_resets_step_and_releases_timers() {
        let (mut rt, mut scene) = rig();
        run(&mut rt, &mut scene, 2500);
        scene.deactivate(&mut rt);
        assert_eq!(scene.current_step(), -1);
        assert_eq!(rt.sched.pending(), 0);
        let frozen = *scene.counters();
        assert!(run(&mut rt, &mut scene, 30_000).is_empty());
        assert_eq!(*scene.counters(), frozen);
    }

    #[test]
    fn reactivation_restarts_from_baseline() {
        let (mut rt, mut scene) = rig();
        run(&mut rt, &mut scene, 9000);
        scene.deactivate(&mut rt);
        scene.activate(&mut rt);
        assert_eq!(scene.current_step(), 0);
        assert_eq!(scene.count(Counter::Ignored), 75);
        assert!(!scene.counters().reached_zero(Counter::Threats));
        run(&mut rt, &mut scene, 10_000);
        assert_eq!(scene.current_step(), 1);
    }
}
