//! AlertCard: one card of the "Without Simbian" scene.
//!
//! ## States
//!
//!   IDLE     no tick timer (not mounted, or `animate` off)
//!   TICKING  repeating tick armed at the card's period
//!
//! ## Tick behavior
//!
//!   - "Active Threats": raise an alert from its vocabulary (log keeps the 3
//!     newest, the falling slot keeps 1), shake and glow for one pulse each,
//!     append a random icon.
//!   - other cards: count += 1 and, when propagating, publish a
//!     `Notification` carrying a fresh icon and a unique id.
//!
//! Shake and glow run on separate timers, so a notification extends the
//! glow without extending the shake.
//!
//! "Active Threats" also listens on the bus: each received notification
//! glows the card and appends its icon unless that id is already queued.
//!
//! `unmount` (and `set_animate(false)`) release the tick timer, both pulse
//! timers and the bus subscription.

use std::collections::VecDeque;

use crate::config::ShowcaseConfig;
use crate::domain::card::CardKind;
use crate::domain::counter::CounterAnimator;
use crate::domain::icon::{Glyph, IconQueue, IconToken, Notification, ICON_ROW_CAP};
use crate::domain::Millis;

use super::bus::SubscriberId;
use super::event::ShowcaseEvent;
use super::runtime::Runtime;
use super::timer::{Cue, TimerSlot};

pub const ALERT_LOG_CAP: usize = 3;
pub const FALLING_CAP: usize = 1;

#[derive(Clone, Debug, PartialEq)]
pub struct CardOptions {
    pub animate: bool,
    pub show_alerts: bool,
    pub propagate: bool,
    pub period_ms: Millis,
    pub pulse_ms: Millis,
    pub counter_duration_ms: Millis,
}

impl CardOptions {
    pub fn for_kind(kind: CardKind, cfg: &ShowcaseConfig) -> Self {
        CardOptions {
            animate: cfg.display.animate,
            show_alerts: cfg.display.show_alerts,
            propagate: kind.propagates(),
            period_ms: cfg.cards.period(kind),
            pulse_ms: cfg.timing.pulse_ms,
            counter_duration_ms: cfg.timing.counter_duration_ms,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AlertEntry {
    pub message: &'static str,
    pub at: Millis,
}

pub struct AlertCard {
    kind: CardKind,
    opts: CardOptions,
    count: u32,
    display: CounterAnimator,
    icons: IconQueue,
    alerts: VecDeque<AlertEntry>,
    falling: VecDeque<AlertEntry>,
    shaking: bool,
    glowing: bool,
    tick: TimerSlot,
    pulse: TimerSlot,
    shake: TimerSlot,
    subscription: Option<SubscriberId>,
    mounted: bool,
}

impl AlertCard {
    /// Build an unmounted card. Propagating cards start with a full icon row
    /// cycling through the glyph set; "Active Threats" starts empty.
    pub fn new(kind: CardKind, opts: CardOptions, rt: &mut Runtime) -> Self {
        let mut icons = IconQueue::new();
        if !kind.is_threats() {
            let now = rt.now();
            for i in 0..ICON_ROW_CAP {
                icons.push(IconToken {
                    id: rt.mint_token(),
                    glyph: Glyph::ALL[i % Glyph::ALL.len()],
                    source: kind,
                    at: now,
                });
            }
        }
        let display = CounterAnimator::new(opts.counter_duration_ms, opts.animate);
        AlertCard {
            kind,
            opts,
            count: kind.baseline(),
            display,
            icons,
            alerts: VecDeque::with_capacity(ALERT_LOG_CAP + 1),
            falling: VecDeque::with_capacity(FALLING_CAP + 1),
            shaking: false,
            glowing: false,
            tick: TimerSlot::empty(),
            pulse: TimerSlot::empty(),
            shake: TimerSlot::empty(),
            subscription: None,
            mounted: false,
        }
    }

    // ── Lifecycle ──

    pub fn mount(&mut self, rt: &mut Runtime) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.display.retarget(self.count as i64, rt.now());
        self.acquire(rt);
    }

    pub fn unmount(&mut self, rt: &mut Runtime) {
        self.release(rt);
        self.mounted = false;
    }

    pub fn set_animate(&mut self, animate: bool, rt: &mut Runtime) {
        if self.opts.animate == animate {
            return;
        }
        self.opts.animate = animate;
        self.display.set_animate(animate);
        if !self.mounted {
            return;
        }
        if animate {
            self.acquire(rt);
        } else {
            self.release(rt);
        }
    }

    fn acquire(&mut self, rt: &mut Runtime) {
        if !self.opts.animate {
            return;
        }
        if self.opts.show_alerts {
            self.tick.arm_every(&mut rt.sched, self.opts.period_ms, Cue::CardTick(self.kind));
        }
        if self.kind.is_threats() && self.subscription.is_none() {
            self.subscription = Some(rt.bus.subscribe());
        }
    }

    fn release(&mut self, rt: &mut Runtime) {
        self.tick.disarm(&mut rt.sched);
        self.pulse.disarm(&mut rt.sched);
        self.shake.disarm(&mut rt.sched);
        if let Some(id) = self.subscription.take() {
            rt.bus.unsubscribe(id);
        }
        self.shaking = false;
        self.glowing = false;
    }

    // ── Cue handlers ──

    pub fn on_tick(&mut self, rt: &mut Runtime, events: &mut Vec<ShowcaseEvent>) {
        if !self.mounted {
            return;
        }
        let now = rt.now();

        if self.kind.is_threats() {
            let entry = AlertEntry {
                message: rt.picker.pick(self.kind.vocabulary()),
                at: now,
            };
            self.alerts.push_front(entry);
            self.alerts.truncate(ALERT_LOG_CAP);
            self.falling.push_front(entry);
            self.falling.truncate(FALLING_CAP);

            self.shaking = true;
            self.shake.arm_once(&mut rt.sched, self.opts.pulse_ms, Cue::ShakeEnd(self.kind));
            self.start_pulse(rt);

            let glyph = rt.picker.glyph();
            self.icons.push(IconToken { id: rt.mint_token(), glyph, source: self.kind, at: now });

            tracing::debug!(
                card = self.kind.title(),
                message = entry.message,
                icons = self.icons.len(),
                "alert raised"
            );
            events.push(ShowcaseEvent::AlertRaised { message: entry.message });
            return;
        }

        self.count += 1;
        self.display.retarget(self.count as i64, now);
        events.push(ShowcaseEvent::CardTicked { card: self.kind, count: self.count });

        if self.opts.propagate {
            let note = Notification {
                id: rt.mint_token(),
                icon: rt.picker.glyph(),
                source: self.kind,
                timestamp: now,
            };
            let receivers = rt.bus.publish(note);
            tracing::trace!(id = note.id.0, source = self.kind.title(), receivers, "notification published");
            events.push(ShowcaseEvent::NotificationSent { id: note.id, source: self.kind });
        }
    }

    /// Returns false when the notification was a duplicate (or ignored).
    pub fn on_notification(&mut self, note: Notification, rt: &mut Runtime) -> bool {
        if !self.mounted || !self.kind.is_threats() {
            return false;
        }
        self.start_pulse(rt);
        self.icons.push_unique(note.token())
    }

    pub fn on_pulse_end(&mut self) {
        self.glowing = false;
    }

    pub fn on_shake_end(&mut self) {
        self.shaking = false;
    }

    /// "Active Threats" mirrors the scene's live counter.
    pub fn sync_count(&mut self, count: u32, now: Millis) {
        if self.count != count {
            self.count = count;
            self.display.retarget(count as i64, now);
        }
    }

    fn start_pulse(&mut self, rt: &mut Runtime) {
        self.glowing = true;
        self.pulse.arm_once(&mut rt.sched, self.opts.pulse_ms, Cue::PulseEnd(self.kind));
    }

    // ── Queries ──

    pub fn kind(&self) -> CardKind {
        self.kind
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Count as the eased display shows it at `now`.
    pub fn displayed(&self, now: Millis) -> i64 {
        self.display.value_at(now)
    }

    /// The eased count has caught up with the real one.
    pub fn is_settled(&self, now: Millis) -> bool {
        self.display.is_settled(now)
    }

    pub fn icons(&self) -> &IconQueue {
        &self.icons
    }

    /// Newest first.
    pub fn alerts(&self) -> impl Iterator<Item = &AlertEntry> {
        self.alerts.iter()
    }

    pub fn falling(&self) -> Option<&AlertEntry> {
        self.falling.front()
    }

    pub fn is_shaking(&self) -> bool {
        self.shaking
    }

    pub fn is_glowing(&self) -> bool {
        self.glowing
    }

    #[cfg(test)]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn subscription(&self) -> Option<SubscriberId> {
        self.subscription
    }

    #[cfg(test)]
    pub fn is_ticking(&self, rt: &Runtime) -> bool {
        self.tick.is_armed(&rt.sched)
    }
}
