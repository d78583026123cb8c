//! Merges keyboard and gesture samples into one `TickInput` per frame

use super::edge::EdgeTriggers;
use super::gesture::{Direction, GestureClassifier};
use super::{Key, KeyboardSource};
use crate::sim::TickInput;

/// Per-frame input fusion.
///
/// Movement is `key held || gesture present`. Momentary actions go through
/// edge triggers that are advanced every frame, whatever the game phase, so
/// a key held across a phase change does not fire again.
#[derive(Debug, Default)]
pub struct InputFusion {
    edges: EdgeTriggers,
    /// Whether the last gesture poll failed, to log transitions only
    gestures_failing: bool,
}

impl InputFusion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample both sources for this frame.
    ///
    /// Gestures are only polled when `poll_gestures` is set; each poll may
    /// block on a camera capture.
    pub fn sample(
        &mut self,
        keyboard: &dyn KeyboardSource,
        gestures: &mut dyn GestureClassifier,
        poll_gestures: bool,
    ) -> TickInput {
        let mut gesture = [false; 4];
        if poll_gestures {
            for (slot, direction) in gesture.iter_mut().zip(Direction::ALL) {
                *slot = self.detect(gestures, direction);
            }
        }
        let [g_left, g_right, g_up, g_down] = gesture;

        let mut edge = |key: Key| self.edges.update(key, keyboard.is_held(key));
        let pause_toggle = edge(Key::Pause);
        let volume_up = edge(Key::VolumeUp);
        let volume_down = edge(Key::VolumeDown);
        let brightness_up = edge(Key::BrightnessUp);
        let brightness_down = edge(Key::BrightnessDown);
        let confirm = edge(Key::Confirm);
        let exit = edge(Key::Exit);
        let advance = edge(Key::Advance);

        TickInput {
            left: keyboard.is_held(Key::MoveLeft) || g_left,
            right: keyboard.is_held(Key::MoveRight) || g_right,
            up: keyboard.is_held(Key::MoveUp) || g_up,
            down: keyboard.is_held(Key::MoveDown) || g_down,
            shoot: keyboard.is_held(Key::Shoot),
            pause_toggle,
            volume_up,
            volume_down,
            brightness_up,
            brightness_down,
            confirm,
            exit,
            advance,
        }
    }

    fn detect(&mut self, gestures: &mut dyn GestureClassifier, direction: Direction) -> bool {
        match gestures.detect(direction) {
            Ok(present) => {
                if self.gestures_failing {
                    log::info!("Gesture input recovered");
                    self.gestures_failing = false;
                }
                present
            }
            Err(e) => {
                if self.gestures_failing {
                    log::debug!("Gesture {} unavailable: {}", direction.as_str(), e);
                } else {
                    log::warn!("Gesture input unavailable, keyboard only: {}", e);
                    self.gestures_failing = true;
                }
                false
            }
        }
    }
}
