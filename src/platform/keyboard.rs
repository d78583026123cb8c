//! Held-key tracking from terminal key events
//!
//! Terminals with keyboard enhancement report `Release` events and keys are
//! dropped as soon as they come up. Classic terminals only report presses
//! (key repeat shows up as repeated presses), so a key counts as held while
//! it was last seen recently. Movement keys use the short `HOLD_WINDOW`.
//! Momentary keys stay held across the OS auto-repeat delay, so one sustained
//! press never reads as two.

use std::collections::HashMap;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::input::{Key, KeyboardSource};

/// Frames a movement or shoot key stays held after its last press or repeat
const HOLD_WINDOW: u64 = 4;

/// Longest expected gap between a press and the first auto-repeat
const REPEAT_DELAY: Duration = Duration::from_millis(650);

/// Game key bound to a terminal key code
pub fn bind(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'a' => Key::MoveLeft,
            'd' => Key::MoveRight,
            'w' => Key::MoveUp,
            's' => Key::MoveDown,
            'f' => Key::Shoot,
            'e' => Key::Pause,
            '=' | '+' => Key::VolumeUp,
            '-' => Key::VolumeDown,
            ' ' => Key::Confirm,
            'n' => Key::Advance,
            _ => return None,
        },
        KeyCode::Up => Key::BrightnessUp,
        KeyCode::Down => Key::BrightnessDown,
        KeyCode::Esc => Key::Exit,
        _ => return None,
    };
    Some(key)
}

/// Keyboard state sampled from the terminal event queue
#[derive(Debug)]
pub struct TerminalKeyboard {
    /// Frame each held key was last seen
    key_frame: HashMap<Key, u64>,
    frame: u64,
    close_requested: bool,
    /// Keys are held until their `Release` event
    release_events: bool,
    /// Frames a momentary key stays held without events
    momentary_window: u64,
}

impl TerminalKeyboard {
    /// `release_events` comes from the renderer's keyboard enhancement;
    /// `target_fps` converts the auto-repeat delay into frames.
    pub fn new(release_events: bool, target_fps: u32) -> Self {
        let delay_ms = REPEAT_DELAY.as_millis() as u64;
        let frames = (delay_ms * u64::from(target_fps.max(1))).div_ceil(1000);
        Self {
            key_frame: HashMap::new(),
            frame: 0,
            close_requested: false,
            release_events,
            momentary_window: frames.max(HOLD_WINDOW),
        }
    }

    /// Start a new frame and drain all pending terminal events
    pub fn poll(&mut self) -> io::Result<()> {
        self.begin_frame();
        while event::poll(Duration::ZERO)? {
            let event = event::read()?;
            self.handle_event(&event);
        }
        Ok(())
    }

    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    pub fn handle_event(&mut self, event: &Event) {
        let Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        }) = event
        else {
            return;
        };

        if *code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.close_requested = true;
            return;
        }
        let Some(key) = bind(*code) else {
            return;
        };
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.key_frame.insert(key, self.frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&key);
            }
        }
    }

    /// Ctrl+C was pressed; the window-close equivalent
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }
}

impl KeyboardSource for TerminalKeyboard {
    fn is_held(&self, key: Key) -> bool {
        let Some(&last) = self.key_frame.get(&key) else {
            return false;
        };
        if self.release_events {
            return true;
        }
        let window = if key.is_momentary() {
            self.momentary_window
        } else {
            HOLD_WINDOW
        };
        self.frame.saturating_sub(last) <= window
    }
}
