//! Shared services every scene component needs: the timer queue, the
//! notification bus and the random picker. Owned by `Showcase`, lent out by
//! `&mut` to whichever component is handling a cue.

use crate::domain::icon::{Notification, TokenId};
use crate::domain::pick::Picker;
use crate::domain::Millis;

use super::bus::EventBus;
use super::timer::Scheduler;

pub struct Runtime {
    pub sched: Scheduler,
    pub bus: EventBus<Notification>,
    pub picker: Picker,
}

impl Runtime {
    pub fn new(picker: Picker) -> Self {
        Runtime {
            sched: Scheduler::new(),
            bus: EventBus::new(),
            picker,
        }
    }

    #[inline]
    pub fn now(&self) -> Millis {
        self.sched.now()
    }

    pub fn mint_token(&mut self) -> TokenId {
        TokenId(self.bus.mint_id())
    }
}
