//! Showcase: owns both scenes, the switcher and the shared runtime.
//!
//! `advance_to(t)` is the only way time moves. Each fired cue is routed to its
//! owner, then any notifications published while handling it are delivered
//! before the next cue pops.

use crate::config::ShowcaseConfig;
use crate::domain::pick::Picker;
use crate::domain::Millis;

use super::event::{ShowcaseEvent, Stamped};
use super::runtime::Runtime;
use super::scene_with::WithScene;
use super::scene_without::WithoutScene;
use super::switcher::{Scene, SwitchCause, Switcher, Transition};
use super::timer::{Cue, Fired};

pub struct Showcase {
    rt: Runtime,
    switcher: Switcher,
    without: WithoutScene,
    with: WithScene,
    animate: bool,
}

impl Showcase {
    /// Loads on "Without" with the auto-advance armed.
    pub fn new(cfg: &ShowcaseConfig, picker: Picker) -> Self {
        let mut rt = Runtime::new(picker);
        let mut switcher = Switcher::new(cfg);
        let mut without = WithoutScene::new(cfg);
        without.activate(&mut rt);
        switcher.start(&mut rt.sched);
        tracing::info!(scene = switcher.scene().label(), "showcase started");
        Showcase {
            rt,
            switcher,
            without,
            with: WithScene::new(cfg),
            animate: cfg.display.animate,
        }
    }

    /// Run every cue due up to `t` and move the clock there.
    pub fn advance_to(&mut self, t: Millis) -> Vec<Stamped> {
        let mut out = Vec::new();
        while let Some(fired) = self.rt.sched.pop_due(t) {
            let mut events = Vec::new();
            self.dispatch(fired, &mut events);
            if self.rt.bus.has_pending() {
                self.without.deliver(&mut self.rt);
            }
            out.extend(events.into_iter().map(|event| Stamped { at: fired.at, event }));
        }
        self.rt.sched.settle(t);
        out
    }

    /// Manual switch request at the current time.
    pub fn request(&mut self, target: Scene) -> Vec<Stamped> {
        let transition = self.switcher.request(target, SwitchCause::Manual, &mut self.rt.sched);
        self.after_request(target, transition)
    }

    pub fn toggle(&mut self) -> Vec<Stamped> {
        let target = self.switcher.scene().other();
        let transition = self.switcher.toggle(&mut self.rt.sched);
        self.after_request(target, transition)
    }

    pub fn set_animate(&mut self, animate: bool) {
        self.animate = animate;
        self.without.set_animate(animate, &mut self.rt);
    }

    fn after_request(&mut self, target: Scene, transition: Option<Transition>) -> Vec<Stamped> {
        let mut events = Vec::new();
        match transition {
            Some(t) => self.apply(t, &mut events),
            None => events.push(ShowcaseEvent::RequestIgnored { target }),
        }
        let at = self.rt.now();
        events.into_iter().map(|event| Stamped { at, event }).collect()
    }

    fn dispatch(&mut self, fired: Fired, events: &mut Vec<ShowcaseEvent>) {
        match fired.cue {
            Cue::AutoAdvance => {
                if let Some(t) = self.switcher.on_auto_advance(&mut self.rt.sched) {
                    self.apply(t, events);
                }
            }
            Cue::ReleaseLock => {
                self.switcher.on_release(&mut self.rt.sched);
                events.push(ShowcaseEvent::LockReleased);
            }
            Cue::RotateProblem => self.without.on_rotate(events),
            Cue::BumpThreats(id) => self.without.on_bump(id, &mut self.rt, events),
            Cue::CardTick(kind) => self.without.on_card_tick(kind, &mut self.rt, events),
            Cue::PulseEnd(kind) => self.without.on_pulse_end(kind),
            Cue::ShakeEnd(kind) => self.without.on_shake_end(kind),
            Cue::AdvanceStep => self.with.on_advance_step(&mut self.rt, events),
            Cue::Countdown => self.with.on_countdown(&mut self.rt, events),
        }
    }

    /// Tear down the scene being left before bringing up the new one.
    fn apply(&mut self, t: Transition, events: &mut Vec<ShowcaseEvent>) {
        if !t.changes_scene() {
            return;
        }
        match t.from {
            Scene::Without => self.without.deactivate(&mut self.rt),
            Scene::With => self.with.deactivate(&mut self.rt),
        }
        match t.to {
            Scene::Without => self.without.activate(&mut self.rt),
            Scene::With => self.with.activate(&mut self.rt),
        }
        tracing::info!(
            from = t.from.label(),
            to = t.to.label(),
            cause = ?t.cause,
            at = self.rt.now(),
            timers = self.rt.sched.pending(),
            subscribers = self.rt.bus.subscriber_count(),
            "scene changed"
        );
        events.push(ShowcaseEvent::SceneChanged { from: t.from, to: t.to, cause: t.cause });
    }

    // ── Queries ──

    pub fn now(&self) -> Millis {
        self.rt.now()
    }

    pub fn scene(&self) -> Scene {
        self.switcher.scene()
    }

    pub fn is_locked(&self) -> bool {
        self.switcher.is_locked()
    }

    /// Time left before the idle auto-advance leaves "Without".
    pub fn auto_advance_in(&self) -> Option<Millis> {
        self.switcher
            .auto_due(&self.rt.sched)
            .map(|due| due.saturating_sub(self.rt.now()))
    }

    pub fn is_animating(&self) -> bool {
        self.animate
    }

    pub fn without(&self) -> &WithoutScene {
        &self.without
    }

    pub fn with(&self) -> &WithScene {
        &self.with
    }

    #[cfg(test)]
    pub fn pending_timers(&self) -> usize {
        self.rt.sched.pending()
    }

    #[cfg(test)]
    pub fn subscribers(&self) -> usize {
        self.rt.bus.subscriber_count()
    }
}
