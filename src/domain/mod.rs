//! Pure scene logic: no timers, no terminal, no I/O.

pub mod card;
pub mod countdown;
pub mod counter;
pub mod icon;
pub mod pick;
pub mod story;

/// Milliseconds of virtual time since the showcase started.
pub type Millis = u64;
