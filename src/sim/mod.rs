//! Game simulation
//!
//! Everything that mutates gameplay lives here. Renderers and the front end
//! only read `GameState`; the loop feeds it one `TickInput` per frame.
//! Randomness comes from the state's seeded RNG only.

pub mod actor;
pub mod bullet;
pub mod collision;
pub mod maze;
pub mod spawn;
pub mod state;
pub mod tick;

pub use actor::{Enemy, EnemyKind, Player};
pub use bullet::Bullet;
pub use collision::{EnemyFire, PlayerFire, resolve_enemy_bullets, resolve_player_bullets};
pub use maze::{BacktrackerMaze, Cell, FixedMaze, Maze, MazeProvider};
pub use spawn::{LevelPlan, Roster, spawn_enemies};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
