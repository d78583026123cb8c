//! Player and enemy actors
//!
//! Enemy archetypes are a tagged enum; every per-archetype difference is a
//! parameter looked up by `EnemyKind`, and `Enemy::update` is the single
//! behaviour entry point.

use glam::Vec2;

use super::bullet::Bullet;
use super::maze::{Cell, Maze};
use crate::consts::{PLAYER_BULLET_SPEED, PLAYER_SIZE_CELLS, PLAYER_SPEED};
use crate::direction_to;

/// The player-controlled tank
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    /// Half-extent used for wall and bullet tests
    pub size: f32,
    /// Unit vector of the last movement (shots go this way)
    pub facing: Vec2,
}

impl Player {
    /// Place the player on the maze's start cell
    pub fn spawn(maze: &Maze) -> Self {
        Self {
            pos: maze.cell_center(maze.start()),
            size: maze.cell_size() * PLAYER_SIZE_CELLS,
            facing: Vec2::X,
        }
    }

    /// Move along `dir` (not necessarily unit) for `dt` seconds.
    ///
    /// Axes are resolved separately so the player slides along walls.
    pub fn move_by(&mut self, dir: Vec2, dt: f32, maze: &Maze) {
        let dir = dir.normalize_or_zero();
        if dir == Vec2::ZERO {
            return;
        }
        self.facing = dir;

        let step = dir * PLAYER_SPEED * dt;
        let try_x = self.pos + Vec2::new(step.x, 0.0);
        if self.fits(try_x, maze) {
            self.pos = try_x;
        }
        let try_y = self.pos + Vec2::new(0.0, step.y);
        if self.fits(try_y, maze) {
            self.pos = try_y;
        }
    }

    fn fits(&self, pos: Vec2, maze: &Maze) -> bool {
        let s = self.size;
        [
            Vec2::new(pos.x - s, pos.y - s),
            Vec2::new(pos.x + s, pos.y - s),
            Vec2::new(pos.x - s, pos.y + s),
            Vec2::new(pos.x + s, pos.y + s),
        ]
        .into_iter()
        .all(|corner| maze.is_open_at(corner))
    }

    /// Fire a bullet from the barrel along the facing direction
    pub fn shoot(&self) -> Bullet {
        Bullet::new(
            self.pos + self.facing * self.size,
            self.facing * PLAYER_BULLET_SPEED,
        )
    }

    /// True once the player's centre is inside the goal cell
    pub fn reached_goal(&self, maze: &Maze) -> bool {
        maze.cell_at(self.pos) == Some(maze.goal())
    }
}

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Normal,
    Tank,
    Mini,
    Sniper,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Normal,
        EnemyKind::Tank,
        EnemyKind::Mini,
        EnemyKind::Sniper,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Normal => "Normal",
            EnemyKind::Tank => "Tank",
            EnemyKind::Mini => "Mini",
            EnemyKind::Sniper => "Sniper",
        }
    }

    /// Hits needed to destroy
    pub fn max_hp(&self) -> u8 {
        match self {
            EnemyKind::Normal => 1,
            EnemyKind::Tank => 3,
            EnemyKind::Mini => 1,
            EnemyKind::Sniper => 2,
        }
    }

    /// Half-extent as a fraction of a cell
    pub fn size_cells(&self) -> f32 {
        match self {
            EnemyKind::Normal => 0.3,
            EnemyKind::Tank => 0.4,
            EnemyKind::Mini => 0.2,
            EnemyKind::Sniper => 0.3,
        }
    }

    /// Game units per second (0 = stationary)
    pub fn speed(&self) -> f32 {
        match self {
            EnemyKind::Normal => 0.2,
            EnemyKind::Tank => 0.1,
            EnemyKind::Mini => 0.35,
            EnemyKind::Sniper => 0.0,
        }
    }

    /// Seconds between shots
    pub fn fire_interval(&self) -> f32 {
        match self {
            EnemyKind::Normal => 2.0,
            EnemyKind::Tank => 2.5,
            EnemyKind::Mini => 3.0,
            EnemyKind::Sniper => 3.0,
        }
    }

    pub fn bullet_speed(&self) -> f32 {
        match self {
            EnemyKind::Normal => 0.6,
            EnemyKind::Tank => 0.5,
            EnemyKind::Mini => 0.7,
            EnemyKind::Sniper => 1.2,
        }
    }

    pub fn bullet_ttl(&self) -> f32 {
        match self {
            EnemyKind::Mini => 1.0,
            EnemyKind::Sniper => 2.5,
            _ => 1.5,
        }
    }

    /// Firing range in cells
    pub fn range_cells(&self) -> f32 {
        match self {
            EnemyKind::Normal | EnemyKind::Tank => 8.0,
            EnemyKind::Mini => 6.0,
            EnemyKind::Sniper => f32::INFINITY,
        }
    }

    /// Chasers steer toward the player at junctions; others patrol
    pub fn chases(&self) -> bool {
        matches!(self, EnemyKind::Tank | EnemyKind::Mini)
    }
}

/// Grid step (row delta, col delta)
type Step = (isize, isize);

const UP: Step = (-1, 0);
const RIGHT: Step = (0, 1);
const DOWN: Step = (1, 0);
const LEFT: Step = (0, -1);

/// An enemy tank
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: f32,
    pub hp: u8,
    /// Cell centre currently being walked toward
    target: Cell,
    heading: Step,
    fire_timer: f32,
}

impl Enemy {
    /// Create an enemy centred on `cell`
    pub fn new(kind: EnemyKind, cell: Cell, maze: &Maze) -> Self {
        Self {
            kind,
            pos: maze.cell_center(cell),
            size: maze.cell_size() * kind.size_cells(),
            hp: kind.max_hp(),
            target: cell,
            heading: RIGHT,
            fire_timer: kind.fire_interval(),
        }
    }

    /// Advance movement and firing; new shots are appended to `out`.
    ///
    /// Never removes itself: destruction is decided by the collision pass.
    pub fn update(&mut self, dt: f32, player: &Player, maze: &Maze, out: &mut Vec<Bullet>) {
        self.advance(dt, player.pos, maze);

        self.fire_timer -= dt;
        if self.fire_timer <= 0.0 {
            self.fire_timer = self.kind.fire_interval();
            let range = self.kind.range_cells() * maze.cell_size();
            if self.pos.distance(player.pos) <= range {
                let dir = direction_to(self.pos, player.pos);
                if dir != Vec2::ZERO {
                    out.push(Bullet::with_ttl(
                        self.pos + dir * self.size,
                        dir * self.kind.bullet_speed(),
                        self.kind.bullet_ttl(),
                    ));
                }
            }
        }
    }

    /// Take one hit; returns true when destroyed
    pub fn hit(&mut self) -> bool {
        self.hp = self.hp.saturating_sub(1);
        self.hp == 0
    }

    fn advance(&mut self, dt: f32, player_pos: Vec2, maze: &Maze) {
        let speed = self.kind.speed();
        if speed <= 0.0 {
            return;
        }

        let mut budget = speed * dt;
        // A frame can cross at most a few cell centres
        for _ in 0..4 {
            let target_pos = maze.cell_center(self.target);
            let to = target_pos - self.pos;
            let dist = to.length();
            if dist > budget {
                self.pos += to / dist * budget;
                return;
            }
            self.pos = target_pos;
            budget -= dist;

            let next = self.next_cell(maze, player_pos);
            if next == self.target {
                return;
            }
            self.target = next;
        }
    }

    /// Pick the next cell at a cell centre. Reversing is only allowed at
    /// dead ends.
    fn next_cell(&mut self, maze: &Maze, player_pos: Vec2) -> Cell {
        let here = self.target;
        let reverse = (-self.heading.0, -self.heading.1);
        let open: Vec<(Step, Cell)> = [UP, RIGHT, DOWN, LEFT]
            .into_iter()
            .filter_map(|step| neighbour(here, step).map(|cell| (step, cell)))
            .filter(|(_, cell)| !maze.is_blocked(*cell))
            .collect();

        let forward: Vec<(Step, Cell)> = open
            .iter()
            .copied()
            .filter(|(step, _)| *step != reverse)
            .collect();
        let choices = if forward.is_empty() { open } else { forward };

        let picked = if self.kind.chases() {
            choices.into_iter().min_by(|(_, a), (_, b)| {
                let da = maze.cell_center(*a).distance_squared(player_pos);
                let db = maze.cell_center(*b).distance_squared(player_pos);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
        } else {
            // Patrol: straight on if possible, else the first turn clockwise
            let straight = choices.iter().copied().find(|(step, _)| *step == self.heading);
            straight.or_else(|| {
                let turns = [turn_right(self.heading), turn_left(self.heading)];
                turns
                    .into_iter()
                    .find_map(|turn| choices.iter().copied().find(|(step, _)| *step == turn))
                    .or_else(|| choices.first().copied())
            })
        };

        match picked {
            Some((step, cell)) => {
                self.heading = step;
                cell
            }
            None => here,
        }
    }
}

fn neighbour(cell: Cell, (dr, dc): Step) -> Option<Cell> {
    let row = cell.row.checked_add_signed(dr)?;
    let col = cell.col.checked_add_signed(dc)?;
    Some(Cell::new(row, col))
}

fn turn_right((dr, dc): Step) -> Step {
    (dc, -dr)
}

fn turn_left((dr, dc): Step) -> Step {
    (-dc, dr)
}
