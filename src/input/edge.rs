//! Per-key press edge detection

use std::collections::HashMap;

use super::Key;

/// Where a key is in its press cycle, advanced once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EdgeState {
    #[default]
    Idle,
    /// Went down this frame
    Pressed,
    Held,
    /// Came up this frame
    Released,
}

impl EdgeState {
    /// Next state given whether the key is held this frame
    pub fn next(self, held: bool) -> Self {
        match (self, held) {
            (EdgeState::Idle | EdgeState::Released, true) => EdgeState::Pressed,
            (EdgeState::Pressed | EdgeState::Held, true) => EdgeState::Held,
            (EdgeState::Pressed | EdgeState::Held, false) => EdgeState::Released,
            (EdgeState::Idle | EdgeState::Released, false) => EdgeState::Idle,
        }
    }

    /// True only on the frame the key went down
    pub fn fired(self) -> bool {
        self == EdgeState::Pressed
    }

    pub fn is_down(self) -> bool {
        matches!(self, EdgeState::Pressed | EdgeState::Held)
    }
}

/// Edge state for a set of keys
#[derive(Debug, Clone, Default)]
pub struct EdgeTriggers {
    states: HashMap<Key, EdgeState>,
}

impl EdgeTriggers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this frame's sample for `key`; returns true on a press edge
    pub fn update(&mut self, key: Key, held: bool) -> bool {
        let state = self.states.entry(key).or_default();
        *state = state.next(held);
        state.fired()
    }

    pub fn state(&self, key: Key) -> EdgeState {
        self.states.get(&key).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_per_press() {
        let mut triggers = EdgeTriggers::new();
        let samples = [true, true, true, false, true];
        let fired: Vec<bool> = samples
            .iter()
            .map(|&held| triggers.update(Key::Pause, held))
            .collect();
        assert_eq!(fired, vec![true, false, false, false, true]);
        assert_eq!(fired.iter().filter(|f| **f).count(), 2);
    }

    #[test]
    fn test_state_cycle() {
        let mut state = EdgeState::default();
        let mut seen = Vec::new();
        for held in [true, true, false, false] {
            state = state.next(held);
            seen.push(state);
        }
        assert_eq!(
            seen,
            vec![
                EdgeState::Pressed,
                EdgeState::Held,
                EdgeState::Released,
                EdgeState::Idle
            ]
        );
    }

    #[test]
    fn test_release_then_press_fires() {
        let state = EdgeState::Released.next(true);
        assert!(state.fired());
        assert!(state.is_down());
        assert!(!EdgeState::Released.is_down());
    }

    #[test]
    fn test_keys_are_independent() {
        let mut triggers = EdgeTriggers::new();
        assert!(triggers.update(Key::Confirm, true));
        assert!(triggers.update(Key::Exit, true));
        assert!(!triggers.update(Key::Confirm, true));
        assert_eq!(triggers.state(Key::Confirm), EdgeState::Held);
        assert_eq!(triggers.state(Key::VolumeUp), EdgeState::Idle);
    }
}
