//! Directional gesture classification
//!
//! A classifier answers one direction at a time and captures fresh input on
//! every call. Failures are returned, never panicked; fusion treats them as
//! "gesture absent".

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::GestureError;

/// A directional hand gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// Parse a classifier label (case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        Direction::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(label))
    }
}

/// Reports whether a directional gesture is currently present
pub trait GestureClassifier {
    fn detect(&mut self, direction: Direction) -> Result<bool, GestureError>;
}

/// Keyboard-only play
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGestures;

impl GestureClassifier for NoGestures {
    fn detect(&mut self, _direction: Direction) -> Result<bool, GestureError> {
        Ok(false)
    }
}

/// Reads the labels an external camera classifier writes to a file.
///
/// The file holds whitespace-separated labels for the current camera frame,
/// e.g. `left up`, or `none`. It is re-read on every `detect` call.
#[derive(Debug, Clone)]
pub struct FeedClassifier {
    path: PathBuf,
}

impl FeedClassifier {
    /// Open a feed, failing if it cannot be read right now
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        fs::read_to_string(&path)?;
        log::info!("Gesture feed: {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GestureClassifier for FeedClassifier {
    fn detect(&mut self, direction: Direction) -> Result<bool, GestureError> {
        let frame = fs::read_to_string(&self.path)?;
        Ok(parse_labels(&frame)?.contains(&direction))
    }
}

/// Parse one feed frame into the directions it reports
pub fn parse_labels(frame: &str) -> Result<Vec<Direction>, GestureError> {
    frame
        .split_whitespace()
        .filter(|label| !label.eq_ignore_ascii_case("none"))
        .map(|label| {
            Direction::from_label(label).ok_or_else(|| GestureError::Classify(label.to_string()))
        })
        .collect()
}
