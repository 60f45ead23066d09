//! Input state tracker.
//!
//! The showcase only has one-shot actions (switch scene, toggle animation,
//! quit), so every key is edge-triggered: a key counts once per Press.
//! Repeat and Release events are ignored, which keeps a held Tab from
//! hammering the switcher.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct InputState {
    /// Keys pressed during the most recent `drain_events` call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for modifier checks.
    raw_events: Vec<KeyEvent>,

    /// Terminal was resized since the last drain.
    pub resized: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            resized: false,
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame, before advancing the showcase.
    pub fn drain_events(&mut self) -> std::io::Result<()> {
        self.fresh_presses.clear();
        self.raw_events.clear();
        self.resized = false;

        while poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => self.record(key),
                Event::Resize(..) => self.resized = true,
                _ => {}
            }
        }
        Ok(())
    }

    /// Was any of these keys pressed this frame?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.fresh_presses.contains(c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    // ── Internal ──

    fn record(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.raw_events.push(key);
        if !key.modifiers.contains(KeyModifiers::CONTROL) && !self.fresh_presses.contains(&key.code) {
            self.fresh_presses.push(key.code);
        }
    }
}
