//! Publish/subscribe channel shared between sibling components.
//!
//! Replaces a process-wide broadcast: the bus is owned by the `Showcase`
//! and passed to whoever publishes or listens. Each subscriber gets its own
//! mailbox; `publish` clones the event into every mailbox and the owner
//! drains them after each dispatched cue.
//!
//! Unsubscribing drops the mailbox, so a torn-down listener can never
//! receive a late event.

use std::collections::VecDeque;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SubscriberId(u64);

pub struct EventBus<E> {
    next_subscriber: u64,
    next_event_id: u64,
    mailboxes: Vec<(SubscriberId, VecDeque<E>)>,
}

impl<E: Clone> EventBus<E> {
    pub fn new() -> Self {
        EventBus {
            next_subscriber: 0,
            next_event_id: 1,
            mailboxes: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        self.mailboxes.push((id, VecDeque::new()));
        id
    }

    /// Remove a subscriber and discard anything still queued for it.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.mailboxes.retain(|(sid, _)| *sid != id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.mailboxes.len()
    }

    /// Deliver to every current subscriber. Returns how many received it.
    pub fn publish(&mut self, event: E) -> usize {
        for (_, mailbox) in &mut self.mailboxes {
            mailbox.push_back(event.clone());
        }
        self.mailboxes.len()
    }

    /// Take everything queued for `id`, oldest first.
    pub fn drain(&mut self, id: SubscriberId) -> Vec<E> {
        self.mailboxes
            .iter_mut()
            .find(|(sid, _)| *sid == id)
            .map(|(_, mailbox)| mailbox.drain(..).collect())
            .unwrap_or_default()
    }

    /// Anything queued for anyone.
    pub fn has_pending(&self) -> bool {
        self.mailboxes.iter().any(|(_, m)| !m.is_empty())
    }

    /// Process-unique identifier for events and the tokens they carry.
    pub fn mint_id(&mut self) -> u64 {
        let id = self.next_event_id;
        self.next_event_id += 1;
        id
    }
}
