//! Colors

use super::Rgba;
use crate::sim::EnemyKind;

/// Per-level background tones; levels past the table reuse the last one
const BACKGROUNDS: [Rgba; 5] = [
    [0.1, 0.1, 0.1, 1.0],
    [0.05, 0.1, 0.2, 1.0],
    [0.1, 0.05, 0.15, 1.0],
    [0.1, 0.05, 0.02, 1.0],
    [0.02, 0.1, 0.05, 1.0],
];

pub const WALL: Rgba = [0.45, 0.45, 0.5, 1.0];
pub const GOAL: Rgba = [0.2, 0.85, 0.3, 1.0];
pub const PLAYER: Rgba = [0.3, 0.6, 1.0, 1.0];
pub const PLAYER_BULLET: Rgba = [1.0, 1.0, 0.4, 1.0];
pub const ENEMY_BULLET: Rgba = [1.0, 0.35, 0.2, 1.0];
pub const TEXT: Rgba = [1.0, 1.0, 1.0, 1.0];
pub const TEXT_DIM: Rgba = [0.8, 0.8, 1.0, 1.0];

// Pause screen
pub const PAUSE_BACKGROUND: Rgba = [0.05, 0.05, 0.1, 1.0];
pub const BAR_TRACK: Rgba = [0.2, 0.2, 0.3, 1.0];
pub const VOLUME_BAR: Rgba = [0.2, 0.6, 1.0, 1.0];
pub const BRIGHTNESS_BAR: Rgba = [1.0, 0.8, 0.2, 1.0];
pub const DIVIDER: Rgba = [0.3, 0.3, 0.5, 1.0];

/// Background clear color for a level (1-based)
pub fn background(level: u32) -> Rgba {
    let index = (level.max(1) as usize - 1).min(BACKGROUNDS.len() - 1);
    BACKGROUNDS[index]
}

pub fn enemy_color(kind: EnemyKind) -> Rgba {
    match kind {
        EnemyKind::Normal => [0.9, 0.25, 0.25, 1.0],
        EnemyKind::Tank => [0.55, 0.35, 0.15, 1.0],
        EnemyKind::Mini => [1.0, 0.55, 0.1, 1.0],
        EnemyKind::Sniper => [0.75, 0.3, 0.9, 1.0],
    }
}
