//! Maze grid and the provider that generates one per level
//!
//! The grid is immutable once built. Game space spans [-1, 1] on both axes
//! with row 0 at the top; each cell is `2 / rows` wide.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

/// A grid cell address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Immutable passable/blocked grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    rows: usize,
    cols: usize,
    /// Row-major, `true` = blocked
    blocked: Vec<bool>,
}

impl Maze {
    /// Build from `grid[r][c]` with 0 = passable and 1 = blocked.
    ///
    /// Ragged input is padded with blocked cells to the widest row.
    pub fn from_grid(grid: &[Vec<u8>]) -> Self {
        let rows = grid.len();
        let cols = grid.iter().map(Vec::len).max().unwrap_or(0);
        let mut blocked = vec![true; rows * cols];
        for (r, row) in grid.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                blocked[r * cols + c] = v != 0;
            }
        }
        Self { rows, cols, blocked }
    }

    /// An arena with a blocked border and an open interior
    pub fn open(rows: usize, cols: usize) -> Self {
        let blocked = (0..rows * cols)
            .map(|i| {
                let (r, c) = (i / cols, i % cols);
                r == 0 || c == 0 || r + 1 == rows || c + 1 == cols
            })
            .collect();
        Self { rows, cols, blocked }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Side of one square cell in game units
    pub fn cell_size(&self) -> f32 {
        2.0 / self.rows.max(1) as f32
    }

    /// Out-of-bounds cells count as blocked
    pub fn is_blocked(&self, cell: Cell) -> bool {
        if cell.row >= self.rows || cell.col >= self.cols {
            return true;
        }
        self.blocked[cell.row * self.cols + cell.col]
    }

    /// True if the game-space point lies in a passable cell
    pub fn is_open_at(&self, pos: Vec2) -> bool {
        self.cell_at(pos).is_some_and(|cell| !self.is_blocked(cell))
    }

    /// Centre of a cell in game space
    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        let size = self.cell_size();
        Vec2::new(
            -1.0 + (cell.col as f32 + 0.5) * size,
            1.0 - (cell.row as f32 + 0.5) * size,
        )
    }

    /// Cell containing a game-space point, if inside the grid
    pub fn cell_at(&self, pos: Vec2) -> Option<Cell> {
        let size = self.cell_size();
        let col = ((pos.x + 1.0) / size).floor();
        let row = ((1.0 - pos.y) / size).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let cell = Cell::new(row as usize, col as usize);
        (cell.row < self.rows && cell.col < self.cols).then_some(cell)
    }

    /// Where the player starts
    pub fn start(&self) -> Cell {
        Cell::new(1, 1)
    }

    /// Where the player must reach to finish a level
    pub fn goal(&self) -> Cell {
        Cell::new(self.rows.saturating_sub(2), self.cols.saturating_sub(2))
    }

    /// Number of passable cells
    pub fn open_cells(&self) -> usize {
        self.blocked.iter().filter(|b| !**b).count()
    }

    /// Iterate all cells row by row with their blocked flag
    pub fn cells(&self) -> impl Iterator<Item = (Cell, bool)> + '_ {
        self.blocked
            .iter()
            .enumerate()
            .map(|(i, &b)| (Cell::new(i / self.cols, i % self.cols), b))
    }
}

/// Produces a fresh maze for each level start
pub trait MazeProvider {
    fn generate(&mut self, rows: usize, cols: usize, rng: &mut Pcg32) -> Maze;
}

/// Hands out the same hand-built maze every level
#[derive(Debug, Clone)]
pub struct FixedMaze(pub Maze);

impl MazeProvider for FixedMaze {
    fn generate(&mut self, _rows: usize, _cols: usize, _rng: &mut Pcg32) -> Maze {
        self.0.clone()
    }
}

/// Depth-first backtracker over odd-sized grids (a perfect maze: every open
/// cell reachable, so the goal is always reachable from the start)
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktrackerMaze;

impl MazeProvider for BacktrackerMaze {
    fn generate(&mut self, rows: usize, cols: usize, rng: &mut Pcg32) -> Maze {
        let mut grid = vec![vec![1u8; cols]; rows];
        if rows < 3 || cols < 3 {
            return Maze::from_grid(&grid);
        }

        let mut stack = vec![(1usize, 1usize)];
        grid[1][1] = 0;

        while let Some(&(r, c)) = stack.last() {
            // Unvisited neighbours two cells away
            let mut options = [(0usize, 0usize); 4];
            let mut count = 0;
            for (dr, dc) in [(-2isize, 0isize), (2, 0), (0, -2), (0, 2)] {
                let nr = r as isize + dr;
                let nc = c as isize + dc;
                if nr <= 0 || nc <= 0 || nr >= rows as isize - 1 || nc >= cols as isize - 1 {
                    continue;
                }
                let (nr, nc) = (nr as usize, nc as usize);
                if grid[nr][nc] == 1 {
                    options[count] = (nr, nc);
                    count += 1;
                }
            }

            if count == 0 {
                stack.pop();
                continue;
            }

            let (nr, nc) = options[rng.random_range(0..count)];
            grid[(r + nr) / 2][(c + nc) / 2] = 0;
            grid[nr][nc] = 0;
            stack.push((nr, nc));
        }

        Maze::from_grid(&grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    fn reachable(maze: &Maze, from: Cell, to: Cell) -> bool {
        let mut seen = vec![false; maze.rows() * maze.cols()];
        let mut queue = VecDeque::from([from]);
        seen[from.row * maze.cols() + from.col] = true;
        while let Some(cell) = queue.pop_front() {
            if cell == to {
                return true;
            }
            let neighbours = [
                (cell.row.wrapping_sub(1), cell.col),
                (cell.row + 1, cell.col),
                (cell.row, cell.col.wrapping_sub(1)),
                (cell.row, cell.col + 1),
            ];
            for (r, c) in neighbours {
                let next = Cell::new(r, c);
                if !maze.is_blocked(next) && !seen[r * maze.cols() + c] {
                    seen[r * maze.cols() + c] = true;
                    queue.push_back(next);
                }
            }
        }
        false
    }

    #[test]
    fn test_backtracker_connects_start_and_goal() {
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let maze = BacktrackerMaze.generate(21, 21, &mut rng);
            assert!(!maze.is_blocked(maze.start()));
            assert!(!maze.is_blocked(maze.goal()));
            assert!(reachable(&maze, maze.start(), maze.goal()), "seed {seed}");
        }
    }

    #[test]
    fn test_backtracker_keeps_border_closed() {
        let mut rng = Pcg32::seed_from_u64(3);
        let maze = BacktrackerMaze.generate(11, 11, &mut rng);
        for i in 0..11 {
            assert!(maze.is_blocked(Cell::new(0, i)));
            assert!(maze.is_blocked(Cell::new(10, i)));
            assert!(maze.is_blocked(Cell::new(i, 0)));
            assert!(maze.is_blocked(Cell::new(i, 10)));
        }
    }

    #[test]
    fn test_cell_center_round_trips() {
        let maze = Maze::open(21, 21);
        let cell = Cell::new(4, 17);
        let center = maze.cell_center(cell);
        assert_eq!(maze.cell_at(center), Some(cell));
        // Top-left interior cell sits just inside the corner
        let corner = maze.cell_center(Cell::new(0, 0));
        assert!((corner.x - (-1.0 + maze.cell_size() / 2.0)).abs() < 1e-6);
        assert!((corner.y - (1.0 - maze.cell_size() / 2.0)).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_bounds_is_blocked() {
        let maze = Maze::open(7, 7);
        assert!(maze.is_blocked(Cell::new(7, 3)));
        assert_eq!(maze.cell_at(Vec2::new(1.5, 0.0)), None);
        assert!(!maze.is_open_at(Vec2::new(-1.2, 0.0)));
    }

    #[test]
    fn test_from_grid() {
        let maze = Maze::from_grid(&[vec![1, 1, 1], vec![1, 0, 1], vec![1, 1, 1]]);
        assert_eq!(maze.open_cells(), 1);
        assert!(!maze.is_blocked(Cell::new(1, 1)));
        assert_eq!(maze.start(), maze.goal());
    }
}
