//! Keyboard and gesture input
//!
//! Raw sources only answer "is this held right now?". `InputFusion` turns
//! those samples into one `TickInput` per frame, with edge detection for
//! momentary actions.

pub mod edge;
pub mod fusion;
pub mod gesture;

pub use edge::{EdgeState, EdgeTriggers};
pub use fusion::InputFusion;
pub use gesture::{Direction, FeedClassifier, GestureClassifier, NoGestures};

/// Logical game keys. Physical bindings belong to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Shoot,
    /// Pause while playing, resume while paused
    Pause,
    VolumeUp,
    VolumeDown,
    BrightnessUp,
    BrightnessDown,
    Confirm,
    Exit,
    /// Debug level skip
    Advance,
}

impl Key {
    /// True for keys that act once per press rather than every held frame
    pub fn is_momentary(self) -> bool {
        !matches!(
            self,
            Key::MoveLeft | Key::MoveRight | Key::MoveUp | Key::MoveDown | Key::Shoot
        )
    }
}

/// A keyboard that can be sampled for held keys
pub trait KeyboardSource {
    fn is_held(&self, key: Key) -> bool;
}
