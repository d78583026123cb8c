//! Game state and phase machine types
//!
//! `GameState` owns everything a level needs. It is only replaced
//! piecewise by `start_new_game`, the single entry point into a fresh level.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::actor::{Enemy, EnemyKind, Player};
use super::bullet::Bullet;
use super::maze::{BacktrackerMaze, Maze, MazeProvider};
use super::spawn::spawn_enemies;
use crate::consts::{MAX_LEVEL, SHOOT_COOLDOWN};
use crate::error::SpawnError;

/// Current phase of the game; exactly one is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// Title screen
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused; volume and brightness can be adjusted
    Paused,
    /// Final level cleared
    Win,
    /// Player was shot
    Lose,
    /// A non-final level cleared
    LevelComplete,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "Menu",
            GamePhase::Playing => "Playing",
            GamePhase::Paused => "Paused",
            GamePhase::Win => "Win",
            GamePhase::Lose => "Lose",
            GamePhase::LevelComplete => "LevelComplete",
        }
    }
}

/// Things that happened during a tick, drained by the loop each frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    LevelStarted(u32),
    PlayerShot,
    EnemyDestroyed(EnemyKind),
    VolumeChanged(f32),
    BrightnessChanged(f32),
    /// The player asked to leave; the loop should shut down
    ExitRequested,
}

/// Complete game state
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    maze_provider: Box<dyn MazeProvider>,
    maze_rows: usize,
    /// Current phase
    pub phase: GamePhase,
    /// Current level (1..=MAX_LEVEL)
    pub level: u32,
    /// This level's maze, shared read-only with actors and renderers
    pub maze: Maze,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Player bullets
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    /// Simulated seconds of play since the level started
    pub clock: f64,
    /// Clock reading of the last player shot
    last_shot: Option<f64>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a game on the menu, with a backtracker maze for level 1 ready
    pub fn new(seed: u64, maze_rows: usize) -> Self {
        Self::with_provider(seed, maze_rows, Box::new(BacktrackerMaze))
    }

    /// Create a game using a custom maze provider
    pub fn with_provider(seed: u64, maze_rows: usize, mut provider: Box<dyn MazeProvider>) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let maze = provider.generate(maze_rows, maze_rows, &mut rng);
        let player = Player::spawn(&maze);
        Self {
            seed,
            rng,
            maze_provider: provider,
            maze_rows,
            phase: GamePhase::Menu,
            level: 1,
            maze,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            clock: 0.0,
            last_shot: None,
            events: Vec::new(),
        }
    }

    /// Start `level` from scratch: new maze, player, roster; bullets and the
    /// shot cooldown reset. Enters `Playing`.
    pub fn start_new_game(&mut self, level: u32) -> Result<(), SpawnError> {
        self.maze = self
            .maze_provider
            .generate(self.maze_rows, self.maze_rows, &mut self.rng);
        self.player = Player::spawn(&self.maze);
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.clock = 0.0;
        self.last_shot = None;
        self.enemies = spawn_enemies(level, &self.maze, self.player.pos, &mut self.rng)?;
        self.level = level;

        log::info!("Starting level {} ({} enemies)", level, self.enemies.len());
        self.events.push(GameEvent::LevelStarted(level));
        self.set_phase(GamePhase::Playing);
        Ok(())
    }

    /// Switch phase, recording the change
    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {} -> {}", from.as_str(), to.as_str());
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Leave `Playing` after a cleared (or skipped) level
    pub fn finish_level(&mut self) {
        if self.is_final_level() {
            self.set_phase(GamePhase::Win);
        } else {
            self.set_phase(GamePhase::LevelComplete);
        }
    }

    pub fn is_final_level(&self) -> bool {
        self.level >= MAX_LEVEL
    }

    /// Every enemy destroyed and the goal reached
    pub fn level_cleared(&self) -> bool {
        self.enemies.is_empty() && self.player.reached_goal(&self.maze)
    }

    /// Fire if the cooldown has elapsed on the game clock
    pub fn try_shoot(&mut self) -> bool {
        let ready = self
            .last_shot
            .is_none_or(|last| self.clock - last >= SHOOT_COOLDOWN);
        if ready {
            self.bullets.push(self.player.shoot());
            self.last_shot = Some(self.clock);
            self.events.push(GameEvent::PlayerShot);
        }
        ready
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take this frame's events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Enemies left per archetype, for the HUD
    pub fn remaining(&self, kind: EnemyKind) -> usize {
        self.enemies.iter().filter(|e| e.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::maze::FixedMaze;

    fn open_state() -> GameState {
        GameState::with_provider(7, 21, Box::new(FixedMaze(Maze::open(21, 21))))
    }

    #[test]
    fn test_new_state_waits_on_menu() {
        let state = GameState::new(42, 21);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.level, 1);
        assert!(state.enemies.is_empty());
        assert_eq!(state.maze.rows(), 21);
    }

    #[test]
    fn test_start_new_game_resets_level() {
        let mut state = open_state();
        state.start_new_game(1).unwrap();
        state.bullets.push(state.player.shoot());
        state.enemy_bullets.push(state.player.shoot());
        state.clock = 12.0;

        state.start_new_game(3).unwrap();
        assert_eq!(state.level, 3);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.bullets.is_empty());
        assert!(state.enemy_bullets.is_empty());
        assert_eq!(state.clock, 0.0);
        assert_eq!(state.enemies.len(), 5);
        assert_eq!(state.remaining(EnemyKind::Mini), 5);
        // Cooldown reset: can fire immediately
        assert!(state.try_shoot());
    }

    #[test]
    fn test_start_new_game_events() {
        let mut state = open_state();
        state.start_new_game(2).unwrap();
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::LevelStarted(2),
                GameEvent::PhaseChanged {
                    from: GamePhase::Menu,
                    to: GamePhase::Playing
                },
            ]
        );
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_start_new_game_replaces_maze() {
        let mut state = GameState::new(5, 21);
        state.start_new_game(1).unwrap();
        let first = state.maze.clone();
        state.start_new_game(1).unwrap();
        assert_ne!(first, state.maze);
    }

    #[test]
    fn test_shoot_cooldown() {
        let mut state = open_state();
        state.start_new_game(1).unwrap();
        assert!(state.try_shoot());
        state.clock = 0.25;
        assert!(!state.try_shoot());
        state.clock = 0.5;
        assert!(state.try_shoot());
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn test_finish_level() {
        let mut state = open_state();
        state.start_new_game(4).unwrap();
        state.finish_level();
        assert_eq!(state.phase, GamePhase::LevelComplete);

        state.start_new_game(5).unwrap();
        state.finish_level();
        assert_eq!(state.phase, GamePhase::Win);
    }

    #[test]
    fn test_level_cleared_needs_goal_and_no_enemies() {
        let mut state = open_state();
        state.start_new_game(1).unwrap();
        assert!(!state.level_cleared());
        state.enemies.clear();
        assert!(!state.level_cleared());
        state.player.pos = state.maze.cell_center(state.maze.goal());
        assert!(state.level_cleared());
    }
}
