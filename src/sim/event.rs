//! Events emitted while the showcase advances.
//! The presentation layer and the headless transcript consume these.

use std::fmt;

use crate::domain::card::CardKind;
use crate::domain::countdown::Counter;
use crate::domain::icon::TokenId;
use crate::domain::Millis;

use super::switcher::{Scene, SwitchCause};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShowcaseEvent {
    SceneChanged { from: Scene, to: Scene, cause: SwitchCause },
    RequestIgnored { target: Scene },
    LockReleased,
    ProblemRotated { index: usize },
    CardTicked { card: CardKind, count: u32 },
    NotificationSent { id: TokenId, source: CardKind },
    ThreatsBumped { count: u32 },
    AlertRaised { message: &'static str },
    StepAdvanced { step: i8 },
    CounterZeroed { counter: Counter },
    CountdownFinished,
}

/// An event stamped with the virtual time it happened at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stamped {
    pub at: Millis,
    pub event: ShowcaseEvent,
}

impl fmt::Display for ShowcaseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShowcaseEvent::SceneChanged { from, to, cause } => {
                write!(f, "scene {} -> {} ({cause:?})", from.label(), to.label())
            }
            ShowcaseEvent::RequestIgnored { target } => {
                write!(f, "request for {} ignored: transition in progress", target.label())
            }
            ShowcaseEvent::LockReleased => write!(f, "transition lock released"),
            ShowcaseEvent::ProblemRotated { index } => write!(f, "problem statement {index}"),
            ShowcaseEvent::CardTicked { card, count } => write!(f, "{} = {count}", card.title()),
            ShowcaseEvent::NotificationSent { id, source } => {
                write!(f, "notification #{} from {}", id.0, source.title())
            }
            ShowcaseEvent::ThreatsBumped { count } => write!(f, "active threats = {count}"),
            ShowcaseEvent::AlertRaised { message } => write!(f, "alert: {message}"),
            ShowcaseEvent::StepAdvanced { step } => write!(f, "step {step}"),
            ShowcaseEvent::CounterZeroed { counter } => write!(f, "{} reached zero", counter.label()),
            ShowcaseEvent::CountdownFinished => write!(f, "countdown finished"),
        }
    }
}

impl fmt::Display for Stamped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>3}.{:03}s] {}", self.at / 1000, self.at % 1000, self.event)
    }
}
