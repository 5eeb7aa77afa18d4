//! Held-key tracking for the real-time games.
//!
//! Terminals report key presses, and only some of them report releases. When
//! the keyboard enhancement protocol is active a key stays held until its
//! release event. Otherwise a key counts as held for `hold` after its last
//! press or auto-repeat.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub struct HeldKeys {
    hold: Duration,
    release_events: bool,
    last_seen: HashMap<KeyCode, Instant>,
}

/// Case-folds letters so Shift does not split a key in two
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

impl HeldKeys {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            release_events: false,
            last_seen: HashMap::new(),
        }
    }

    /// Switch to release-driven tracking once the terminal reports releases
    pub fn set_release_events(&mut self, enabled: bool) {
        self.release_events = enabled;
    }

    pub fn handle(&mut self, key: &KeyEvent, now: Instant) {
        let code = normalize(key.code);
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.last_seen.insert(code, now);
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&code);
            }
        }
    }

    pub fn is_held(&self, code: KeyCode, now: Instant) -> bool {
        match self.last_seen.get(&normalize(code)) {
            Some(_) if self.release_events => true,
            Some(&at) => now.saturating_duration_since(at) < self.hold,
            None => false,
        }
    }

    pub fn any_held(&self, codes: &[KeyCode], now: Instant) -> bool {
        codes.iter().any(|&code| self.is_held(code, now))
    }

    /// -1, 0 or 1 from a pair of opposing key sets
    pub fn axis(&self, negative: &[KeyCode], positive: &[KeyCode], now: Instant) -> i8 {
        match (self.any_held(negative, now), self.any_held(positive, now)) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }

    pub fn clear(&mut self) {
        self.last_seen.clear();
    }
}
