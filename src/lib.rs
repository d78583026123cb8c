//! Tank Maze - a level-based maze combat game
//!
//! Core modules:
//! - `sim`: Game state machine, actors, spawning and collision resolution
//! - `input`: Keyboard/gesture fusion with edge-triggered actions
//! - `render`: Draw-list construction (pure consumers of game state)
//! - `platform`: Terminal front end (keyboard source + renderer backend)
//! - `audio`: Background music behind a swappable backend
//! - `settings`: Launch configuration and live session parameters

pub mod audio;
pub mod error;
pub mod game_loop;
pub mod input;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, GameError, GestureError, InitError, RenderError, SpawnError};
pub use game_loop::{GameLoop, LoopControl};
pub use settings::{SessionParameters, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Highest level; clearing it wins the game
    pub const MAX_LEVEL: u32 = 5;
    /// Enemies on level N (single-archetype levels) = BASE_ENEMY_COUNT + N
    pub const BASE_ENEMY_COUNT: usize = 2;
    /// Fixed roster size on the mixed level
    pub const MIXED_LEVEL_ENEMIES: usize = 12;
    /// Per-archetype cap on the mixed level
    pub const MIXED_LEVEL_CAP: usize = 3;

    /// Minimum enemy spawn distance from the player start, in maze cells
    pub const SPAWN_MARGIN_CELLS: f32 = 6.0;
    /// Position samples allowed per enemy before spawning gives up
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

    /// Seconds between player shots while the shoot key is held
    pub const SHOOT_COOLDOWN: f64 = 0.5;

    /// Volume/brightness change per key press
    pub const SESSION_STEP: f32 = 0.1;

    /// Screen-space extent used by menus and overlays
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Player tuning (fractions of a cell, speeds in game units per second)
    pub const PLAYER_SIZE_CELLS: f32 = 0.3;
    pub const PLAYER_SPEED: f32 = 0.5;

    /// Bullet tuning
    pub const PLAYER_BULLET_SPEED: f32 = 1.5;
    pub const BULLET_TTL: f32 = 1.2;
    pub const BULLET_RADIUS: f32 = 0.012;

    /// Largest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Axis-aligned proximity test used for every bullet/actor collision.
///
/// Both axes must be strictly closer than `size`; this is a box test, not a
/// Euclidean one.
#[inline]
pub fn within_box(a: Vec2, b: Vec2, size: f32) -> bool {
    (a.x - b.x).abs() < size && (a.y - b.y).abs() < size
}

/// Unit vector from `from` toward `to`, or zero when they coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}
