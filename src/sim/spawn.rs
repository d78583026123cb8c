//! Level table and enemy roster placement

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::actor::{Enemy, EnemyKind};
use super::maze::{Cell, Maze};
use crate::consts::{
    BASE_ENEMY_COUNT, MAX_LEVEL, MAX_PLACEMENT_ATTEMPTS, MIXED_LEVEL_CAP, MIXED_LEVEL_ENEMIES,
    SPAWN_MARGIN_CELLS,
};
use crate::error::SpawnError;

/// Which archetypes a level uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Roster {
    /// Every enemy is the same archetype
    Single(EnemyKind),
    /// Uniform random archetype, at most `cap` of each
    Mixed { cap: usize },
}

/// Enemy composition of one level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelPlan {
    pub level: u32,
    pub roster: Roster,
    pub count: usize,
}

impl LevelPlan {
    /// Look up the plan for `level` (1..=MAX_LEVEL)
    pub fn for_level(level: u32) -> Result<Self, SpawnError> {
        let roster = match level {
            1 => Roster::Single(EnemyKind::Normal),
            2 => Roster::Single(EnemyKind::Tank),
            3 => Roster::Single(EnemyKind::Mini),
            4 => Roster::Single(EnemyKind::Sniper),
            MAX_LEVEL => Roster::Mixed {
                cap: MIXED_LEVEL_CAP,
            },
            _ => return Err(SpawnError::UnknownLevel(level)),
        };
        let count = match roster {
            Roster::Single(_) => BASE_ENEMY_COUNT + level as usize,
            Roster::Mixed { .. } => MIXED_LEVEL_ENEMIES,
        };
        Ok(Self {
            level,
            roster,
            count,
        })
    }
}

/// Build the enemy roster for `level`.
///
/// Positions are sampled uniformly from interior cells until one is open and
/// at least the spawn margin away from `player_start`. Sampling is bounded;
/// an unsatisfiable maze yields `SpawnError::PlacementExhausted`.
pub fn spawn_enemies(
    level: u32,
    maze: &Maze,
    player_start: Vec2,
    rng: &mut Pcg32,
) -> Result<Vec<Enemy>, SpawnError> {
    let plan = LevelPlan::for_level(level)?;
    let margin = maze.cell_size() * SPAWN_MARGIN_CELLS;
    let mut tally = [0usize; EnemyKind::ALL.len()];
    let mut enemies = Vec::with_capacity(plan.count);

    for placed in 0..plan.count {
        let cell = sample_cell(maze, player_start, margin, rng).ok_or(
            SpawnError::PlacementExhausted {
                level,
                placed,
                required: plan.count,
                attempts: MAX_PLACEMENT_ATTEMPTS,
            },
        )?;

        let kind = match plan.roster {
            Roster::Single(kind) => kind,
            Roster::Mixed { cap } => pick_under_cap(&mut tally, cap, rng)
                .ok_or(SpawnError::QuotaExhausted { level })?,
        };
        enemies.push(Enemy::new(kind, cell, maze));
    }

    log::info!(
        "Level {}: spawned {} enemies ({:?})",
        level,
        enemies.len(),
        plan.roster
    );
    Ok(enemies)
}

fn sample_cell(maze: &Maze, player_start: Vec2, margin: f32, rng: &mut Pcg32) -> Option<Cell> {
    if maze.rows() < 3 || maze.cols() < 3 {
        return None;
    }
    (0..MAX_PLACEMENT_ATTEMPTS).find_map(|_| {
        let cell = Cell::new(
            rng.random_range(1..maze.rows() - 1),
            rng.random_range(1..maze.cols() - 1),
        );
        let far_enough = maze.cell_center(cell).distance(player_start) >= margin;
        (far_enough && !maze.is_blocked(cell)).then_some(cell)
    })
}

/// Draw archetypes uniformly, redrawing (not re-placing) while the draw is
/// at its cap. Returns None only when every archetype is capped.
fn pick_under_cap(tally: &mut [usize; 4], cap: usize, rng: &mut Pcg32) -> Option<EnemyKind> {
    if tally.iter().all(|&n| n >= cap) {
        return None;
    }
    loop {
        let index = rng.random_range(0..EnemyKind::ALL.len());
        if tally[index] < cap {
            tally[index] += 1;
            return Some(EnemyKind::ALL[index]);
        }
    }
}
