//! "Without Simbian" scene: three alert cards, a rotating problem statement
//! and the live Active Threats counter.
//!
//! Every notification published by a card is heard here and, 1800 ms later,
//! turns into `+1` on the threats counter. An id whose bump is still pending
//! is not scheduled twice. Bumps in flight when the scene deactivates are
//! cancelled, and a bump that fires re-checks that the scene is still active.

use std::collections::HashMap;

use crate::config::ShowcaseConfig;
use crate::domain::card::CardKind;
use crate::domain::icon::{Notification, TokenId};
use crate::domain::story::PROBLEMS;

use super::alert_card::{AlertCard, CardOptions};
use super::bus::SubscriberId;
use super::event::ShowcaseEvent;
use super::runtime::Runtime;
use super::timer::{Cue, TimerSlot};

/// Threats count shown when the scene comes up.
pub const THREATS_BASELINE: u32 = 5;

pub struct WithoutScene {
    cfg: ShowcaseConfig,
    active: bool,
    problem_index: usize,
    threats: u32,
    cards: Vec<AlertCard>,
    rotation: TimerSlot,
    subscription: Option<SubscriberId>,
    in_flight: HashMap<TokenId, TimerSlot>,
}

impl WithoutScene {
    pub fn new(cfg: &ShowcaseConfig) -> Self {
        WithoutScene {
            cfg: cfg.clone(),
            active: false,
            problem_index: 0,
            threats: THREATS_BASELINE,
            cards: Vec::new(),
            rotation: TimerSlot::empty(),
            subscription: None,
            in_flight: HashMap::new(),
        }
    }

    // ── Lifecycle ──

    /// Bring the scene up from scratch: fresh cards, problem 0, threats 5.
    pub fn activate(&mut self, rt: &mut Runtime) {
        if self.active {
            return;
        }
        self.active = true;
        self.problem_index = 0;
        self.threats = THREATS_BASELINE;

        self.cards = CardKind::ALL
            .iter()
            .map(|&kind| AlertCard::new(kind, CardOptions::for_kind(kind, &self.cfg), rt))
            .collect();
        for card in &mut self.cards {
            card.mount(rt);
        }
        let now = rt.now();
        if let Some(card) = self.card_mut(CardKind::ActiveThreats) {
            card.sync_count(THREATS_BASELINE, now);
        }

        self.subscription = Some(rt.bus.subscribe());
        self.rotation
            .arm_every(&mut rt.sched, self.cfg.timing.problem_interval_ms, Cue::RotateProblem);
        tracing::debug!(at = now, "without scene active");
    }

    pub fn deactivate(&mut self, rt: &mut Runtime) {
        if !self.active {
            return;
        }
        self.active = false;
        self.rotation.disarm(&mut rt.sched);
        for (_, mut slot) in self.in_flight.drain() {
            slot.disarm(&mut rt.sched);
        }
        if let Some(id) = self.subscription.take() {
            rt.bus.unsubscribe(id);
        }
        for card in &mut self.cards {
            card.unmount(rt);
        }
        tracing::debug!(at = rt.now(), "without scene torn down");
    }

    pub fn set_animate(&mut self, animate: bool, rt: &mut Runtime) {
        self.cfg.display.animate = animate;
        for card in &mut self.cards {
            card.set_animate(animate, rt);
        }
    }

    // ── Cue handlers ──

    pub fn on_rotate(&mut self, events: &mut Vec<ShowcaseEvent>) {
        if !self.active {
            return;
        }
        self.problem_index = (self.problem_index + 1) % PROBLEMS.len();
        events.push(ShowcaseEvent::ProblemRotated { index: self.problem_index });
    }

    pub fn on_card_tick(&mut self, kind: CardKind, rt: &mut Runtime, events: &mut Vec<ShowcaseEvent>) {
        if let Some(card) = self.card_mut(kind) {
            card.on_tick(rt, events);
        }
    }

    pub fn on_pulse_end(&mut self, kind: CardKind) {
        if let Some(card) = self.card_mut(kind) {
            card.on_pulse_end();
        }
    }

    pub fn on_shake_end(&mut self, kind: CardKind) {
        if let Some(card) = self.card_mut(kind) {
            card.on_shake_end();
        }
    }

    /// Hand out everything the bus queued for this scene and its cards.
    pub fn deliver(&mut self, rt: &mut Runtime) {
        if let Some(sub) = self.subscription {
            for note in rt.bus.drain(sub) {
                self.on_notification(note, rt);
            }
        }
        if let Some(card) = self.card_mut(CardKind::ActiveThreats) {
            if let Some(sub) = card.subscription() {
                for note in rt.bus.drain(sub) {
                    card.on_notification(note, rt);
                }
            }
        }
    }

    /// Schedule the delayed bump. Returns false for an id whose bump is
    /// already pending.
    pub fn on_notification(&mut self, note: Notification, rt: &mut Runtime) -> bool {
        if !self.active || self.in_flight.contains_key(&note.id) {
            return false;
        }
        let mut slot = TimerSlot::empty();
        slot.arm_once(&mut rt.sched, self.cfg.timing.threat_bump_delay_ms, Cue::BumpThreats(note.id));
        self.in_flight.insert(note.id, slot);
        tracing::trace!(id = note.id.0, source = note.source.title(), "threat bump scheduled");
        true
    }

    pub fn on_bump(&mut self, id: TokenId, rt: &mut Runtime, events: &mut Vec<ShowcaseEvent>) {
        if self.in_flight.remove(&id).is_none() || !self.active {
            return;
        }
        self.threats += 1;
        let (threats, now) = (self.threats, rt.now());
        if let Some(card) = self.card_mut(CardKind::ActiveThreats) {
            card.sync_count(threats, now);
        }
        events.push(ShowcaseEvent::ThreatsBumped { count: threats });
    }

    // ── Queries ──

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn problem_index(&self) -> usize {
        self.problem_index
    }

    pub fn threats(&self) -> u32 {
        self.threats
    }

    #[cfg(test)]
    pub fn bumps_in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn cards(&self) -> &[AlertCard] {
        &self.cards
    }

    #[cfg(test)]
    pub fn card(&self, kind: CardKind) -> Option<&AlertCard> {
        self.cards.iter().find(|c| c.kind() == kind)
    }

    fn card_mut(&mut self, kind: CardKind) -> Option<&mut AlertCard> {
        self.cards.iter_mut().find(|c| c.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::icon::Glyph;
    use crate::domain::pick::Picker;
    use crate::domain::Millis;

    struct Rig {
        rt: Runtime,
        scene: WithoutScene,
        events: Vec<(Millis, ShowcaseEvent)>,
    }

    impl Rig {
        fn new() -> Self {
            let mut rt = Runtime::new(Picker::seeded(11));
            let mut scene = WithoutScene::new(&ShowcaseConfig::default());
            scene.activate(&mut rt);
            Rig { rt, scene, events: vec![] }
        }

        fn run(&mut self, until: Millis) {
            while let Some(f) = self.rt.sched.pop_due(until) {
                let mut ev = vec![];
                match f.cue {
                    Cue::RotateProblem => self.scene.on_rotate(&mut ev),
                    Cue::CardTick(k) => self.scene.on_card_tick(k, &mut self.rt, &mut ev),
                    Cue::PulseEnd(k) => self.scene.on_pulse_end(k),
                    Cue::ShakeEnd(k) => self.scene.on_shake_end(k),
                    Cue::BumpThreats(id) => self.scene.on_bump(id, &mut self.rt, &mut ev),
                    _ => {}
                }
                self.scene.deliver(&mut self.rt);
                self.events.extend(ev.into_iter().map(|e| (f.at, e)));
            }
            self.rt.sched.settle(until);
        }

        fn bumps(&self) -> Vec<Millis> {
            self.events
                .iter()
                .filter(|(_, e)| matches!(e, ShowcaseEvent::ThreatsBumped { .. }))
                .map(|(t, _)| *t)
                .collect()
        }
    }

    fn note(id: u64) -> Notification {
        Notification {
            id: TokenId(id),
            icon: Glyph::File,
            source: CardKind::WronglyClosed,
            timestamp: 0,
        }
    }

    #[test]
    fn activation_starts_from_scratch() {
        let rig = Rig::new();
        assert!(rig.scene.is_active());
        assert_eq!(rig.scene.problem_index(), 0);
        assert_eq!(rig.scene.threats(), 5);
        assert_eq!(rig.scene.cards().len(), 3);
        assert!(rig.scene.cards().iter().all(|c| c.is_mounted()));
    }

    #[test]
    fn problem_rotation_cycles_back_to_zero() {
        let mut rig = Rig::new();
        let mut seen = vec![];
        for t in [4000, 8000, 12_000] {
            rig.run(t);
            seen.push(rig.scene.problem_index());
        }
        assert_eq!(seen, vec![1, 2, 0]);
    }

    #[test]
    fn notification_bumps_once_after_delay() {
        let mut rig = Rig::new();
        rig.run(4000);
        assert_eq!(rig.scene.bumps_in_flight(), 1);
        rig.run(5799);
        assert_eq!(rig.scene.threats(), 5);
        rig.run(5800);
        assert_eq!(rig.scene.threats(), 6);
        assert_eq!(rig.scene.card(CardKind::ActiveThreats).map(|c| c.count()), Some(6));
        assert_eq!(rig.bumps(), vec![5800]);
    }

    #[test]
    fn bumps_follow_both_propagating_cards() {
        let mut rig = Rig::new();
        rig.run(14_000);
        // Ignored at 4 s, 8 s, 12 s; Wrongly at 5 s, 10 s.
        assert_eq!(rig.bumps(), vec![5800, 6800, 9800, 11_800, 13_800]);
        assert_eq!(rig.scene.threats(), 10);
    }

    #[test]
    fn threats_card_glows_on_notification() {
        let mut rig = Rig::new();
        rig.run(4000);
        let card = rig.scene.card(CardKind::ActiveThreats);
        assert_eq!(card.map(|c| c.is_glowing()), Some(true));
        assert_eq!(card.map(|c| c.icons().len()), Some(1));
        rig.run(4500);
        assert_eq!(rig.scene.card(CardKind::ActiveThreats).map(|c| c.is_glowing()), Some(false));
    }

    #[test]
    fn repeated_identifier_counts_once() {
        let mut rig = Rig::new();
        assert!(rig.scene.on_notification(note(900), &mut rig.rt));
        assert!(!rig.scene.on_notification(note(900), &mut rig.rt));
        rig.run(3000);
        assert_eq!(rig.scene.threats(), 6);
    }

    #[test]
    fn bookkeeping_is_released_once_bumps_land() {
        let mut rig = Rig::new();
        rig.run(60_000);
        assert!(rig.bumps().len() > 20);
        // Only bumps still pending at 60 s remain tracked.
        assert!(rig.scene.bumps_in_flight() <= 2);
    }

    #[test]
    fn deactivation_cancels_in_flight_bumps() {
        let mut rig = Rig::new();
        rig.run(4000);
        assert_eq!(rig.scene.bumps_in_flight(), 1);
        rig.scene.deactivate(&mut rig.rt);
        assert_eq!(rig.scene.bumps_in_flight(), 0);
        assert_eq!(rig.rt.sched.pending(), 0);
        assert_eq!(rig.rt.bus.subscriber_count(), 0);
        rig.run(60_000);
        assert_eq!(rig.scene.threats(), 5);
        assert!(rig.bumps().is_empty());
    }

    #[test]
    fn stale_bump_is_ignored_when_inactive() {
        let mut rig = Rig::new();
        let mut ev = vec![];
        rig.scene.on_notification(note(5), &mut rig.rt);
        rig.scene.deactivate(&mut rig.rt);
        rig.scene.on_bump(TokenId(5), &mut rig.rt, &mut ev);
        assert!(ev.is_empty());
        assert_eq!(rig.scene.threats(), 5);
    }

    #[test]
    fn reactivation_resets_state() {
        let mut rig = Rig::new();
        rig.run(9000);
        assert_ne!(rig.scene.threats(), 5);
        rig.scene.deactivate(&mut rig.rt);
        rig.scene.activate(&mut rig.rt);
        assert_eq!(rig.scene.threats(), 5);
        assert_eq!(rig.scene.problem_index(), 0);
        let ignored = rig.scene.card(CardKind::IgnoredAlerts).map(|c| c.count());
        assert_eq!(ignored, Some(200));
    }
}
