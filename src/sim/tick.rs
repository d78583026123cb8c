//! Per-frame state machine step
//!
//! `tick` dispatches on the current phase; each handler only ever runs for
//! its own phase.

use glam::Vec2;

use super::collision::{EnemyFire, resolve_enemy_bullets, resolve_player_bullets};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::MAX_LEVEL;
use crate::error::SpawnError;
use crate::settings::SessionParameters;

/// Fused input for a single frame
///
/// Movement and `shoot` are level-triggered (held). Everything else is an
/// edge that is true for exactly one frame per press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    // === Movement ===
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,

    /// Held; rate-limited by the shot cooldown
    pub shoot: bool,

    // === Edges ===
    /// Pause while playing, resume while paused
    pub pause_toggle: bool,
    pub volume_up: bool,
    pub volume_down: bool,
    pub brightness_up: bool,
    pub brightness_down: bool,
    pub confirm: bool,
    pub exit: bool,
    /// Debug: finish the current level immediately
    pub advance: bool,
}

impl TickInput {
    /// Movement intent in game space (+y is up)
    pub fn movement(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.down, self.up))
    }
}

/// Advance the game by one frame
pub fn tick(
    state: &mut GameState,
    session: &mut SessionParameters,
    input: &TickInput,
    dt: f32,
) -> Result<(), SpawnError> {
    match state.phase {
        GamePhase::Playing => play_frame(state, input, dt),
        GamePhase::Paused => {
            handle_pause(state, session, input);
            Ok(())
        }
        GamePhase::Menu => handle_menu(state, input),
        GamePhase::Win => handle_win(state, input),
        GamePhase::Lose => handle_lose(state, input),
        GamePhase::LevelComplete => handle_level_complete(state, input),
    }
}

fn play_frame(state: &mut GameState, input: &TickInput, dt: f32) -> Result<(), SpawnError> {
    if !handle_game(state, input, dt) {
        return Ok(());
    }

    let mut shots = Vec::new();
    for enemy in &mut state.enemies {
        enemy.update(dt, &state.player, &state.maze, &mut shots);
    }
    state.enemy_bullets.append(&mut shots);

    if resolve_enemy_bullets(&mut state.enemy_bullets, &state.player, dt) == EnemyFire::PlayerHit {
        state.set_phase(GamePhase::Lose);
    }

    let fire = resolve_player_bullets(&mut state.bullets, &mut state.enemies, dt);
    for kind in fire.destroyed {
        log::debug!("{} destroyed, {} left", kind.as_str(), state.enemies.len());
        state.push_event(GameEvent::EnemyDestroyed(kind));
    }

    state.clock += f64::from(dt);
    Ok(())
}

/// Pause edge, movement, level completion and shooting. Returns false once
/// the phase has left `Playing`.
fn handle_game(state: &mut GameState, input: &TickInput, dt: f32) -> bool {
    if input.pause_toggle {
        state.set_phase(GamePhase::Paused);
        return false;
    }

    state.player.move_by(input.movement(), dt, &state.maze);

    if state.level_cleared() || input.advance {
        state.finish_level();
        return false;
    }

    if input.shoot {
        state.try_shoot();
    }
    true
}

fn handle_pause(state: &mut GameState, session: &mut SessionParameters, input: &TickInput) {
    if input.pause_toggle {
        state.set_phase(GamePhase::Playing);
        return;
    }

    let volume_steps = input.volume_up as i32 - input.volume_down as i32;
    if volume_steps != 0 {
        let volume = session.step_volume(volume_steps);
        state.push_event(GameEvent::VolumeChanged(volume));
    }
    let brightness_steps = input.brightness_up as i32 - input.brightness_down as i32;
    if brightness_steps != 0 {
        let brightness = session.step_brightness(brightness_steps);
        state.push_event(GameEvent::BrightnessChanged(brightness));
    }

    if input.exit {
        state.push_event(GameEvent::ExitRequested);
    }
}

fn handle_menu(state: &mut GameState, input: &TickInput) -> Result<(), SpawnError> {
    if input.confirm {
        state.start_new_game(1)?;
    } else if input.exit {
        state.push_event(GameEvent::ExitRequested);
    }
    Ok(())
}

fn handle_win(state: &mut GameState, input: &TickInput) -> Result<(), SpawnError> {
    if input.confirm {
        if state.is_final_level() {
            state.set_phase(GamePhase::Menu);
        } else {
            state.start_new_game(state.level + 1)?;
        }
    } else if input.exit {
        state.push_event(GameEvent::ExitRequested);
    }
    Ok(())
}

fn handle_lose(state: &mut GameState, input: &TickInput) -> Result<(), SpawnError> {
    if input.confirm {
        state.start_new_game(1)?;
    } else if input.exit {
        state.push_event(GameEvent::ExitRequested);
    }
    Ok(())
}

fn handle_level_complete(state: &mut GameState, input: &TickInput) -> Result<(), SpawnError> {
    if input.confirm {
        state.start_new_game((state.level + 1).min(MAX_LEVEL))?;
    } else if input.exit {
        state.push_event(GameEvent::ExitRequested);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bullet::Bullet;
    use crate::sim::maze::{FixedMaze, Maze};

    fn playing(level: u32) -> (GameState, SessionParameters) {
        let mut state = GameState::with_provider(11, 21, Box::new(FixedMaze(Maze::open(21, 21))));
        state.start_new_game(level).unwrap();
        state.drain_events();
        (state, SessionParameters::new(0.5, 0.5))
    }

    fn press(f: impl FnOnce(&mut TickInput)) -> TickInput {
        let mut input = TickInput::default();
        f(&mut input);
        input
    }

    #[test]
    fn test_movement_axes() {
        let input = press(|i| {
            i.left = true;
            i.up = true;
        });
        assert_eq!(input.movement(), Vec2::new(-1.0, 1.0));
        let both = press(|i| {
            i.left = true;
            i.right = true;
        });
        assert_eq!(both.movement(), Vec2::ZERO);
    }

    #[test]
    fn test_menu_confirm_starts_level_one() {
        let mut state = GameState::with_provider(3, 21, Box::new(FixedMaze(Maze::open(21, 21))));
        let mut session = SessionParameters::default();
        tick(&mut state, &mut session, &TickInput::default(), 0.016).unwrap();
        assert_eq!(state.phase, GamePhase::Menu);

        tick(&mut state, &mut session, &press(|i| i.confirm = true), 0.016).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 1);
        assert_eq!(state.enemies.len(), 3);
    }

    #[test]
    fn test_pause_and_resume() {
        let (mut state, mut session) = playing(1);
        tick(&mut state, &mut session, &press(|i| i.pause_toggle = true), 0.016).unwrap();
        assert_eq!(state.phase, GamePhase::Paused);

        // Time does not pass while paused
        let clock = state.clock;
        let enemies = state.enemies.clone();
        for _ in 0..30 {
            tick(&mut state, &mut session, &TickInput::default(), 0.016).unwrap();
        }
        assert_eq!(state.clock, clock);
        assert_eq!(state.enemies, enemies);

        tick(&mut state, &mut session, &press(|i| i.pause_toggle = true), 0.016).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_pause_frame_skips_simulation() {
        let (mut state, mut session) = playing(1);
        state.enemy_bullets.push(Bullet::new(state.player.pos, Vec2::ZERO));
        tick(&mut state, &mut session, &press(|i| i.pause_toggle = true), 0.016).unwrap();
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.enemy_bullets.len(), 1);
    }

    #[test]
    fn test_enemy_bullet_on_player_loses() {
        let (mut state, mut session) = playing(1);
        let far = Vec2::new(0.6, -0.6);
        state.enemy_bullets = vec![
            Bullet::new(far, Vec2::ZERO),
            Bullet::new(state.player.pos, Vec2::ZERO),
            Bullet::new(far, Vec2::ZERO),
        ];
        tick(&mut state, &mut session, &TickInput::default(), 0.016).unwrap();
        assert_eq!(state.phase, GamePhase::Lose);

        tick(&mut state, &mut session, &press(|i| i.confirm = true), 0.016).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 1);
        assert!(state.enemy_bullets.is_empty());
    }

    #[test]
    fn test_cleared_level_completes() {
        let (mut state, mut session) = playing(2);
        state.enemies.clear();
        state.player.pos = state.maze.cell_center(state.maze.goal());
        tick(&mut state, &mut session, &TickInput::default(), 0.016).unwrap();
        assert_eq!(state.phase, GamePhase::LevelComplete);

        tick(&mut state, &mut session, &press(|i| i.confirm = true), 0.016).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 3);
    }

    #[test]
    fn test_goal_without_clearing_keeps_playing() {
        let (mut state, mut session) = playing(1);
        state.player.pos = state.maze.cell_center(state.maze.goal());
        tick(&mut state, &mut session, &TickInput::default(), 0.016).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_final_level_wins_then_menu() {
        let (mut state, mut session) = playing(MAX_LEVEL);
        state.enemies.clear();
        state.player.pos = state.maze.cell_center(state.maze.goal());
        tick(&mut state, &mut session, &TickInput::default(), 0.016).unwrap();
        assert_eq!(state.phase, GamePhase::Win);

        tick(&mut state, &mut session, &press(|i| i.confirm = true), 0.016).unwrap();
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_debug_advance() {
        let (mut state, mut session) = playing(1);
        tick(&mut state, &mut session, &press(|i| i.advance = true), 0.016).unwrap();
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_held_shoot_respects_cooldown() {
        let (mut state, mut session) = playing(1);
        state.enemies.clear();
        let shoot = press(|i| i.shoot = true);
        // 2 simulated seconds at 60 fps
        for _ in 0..120 {
            tick(&mut state, &mut session, &shoot, 1.0 / 60.0).unwrap();
        }
        let shots = state
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::PlayerShot)
            .count();
        assert_eq!(shots, 4);
    }

    #[test]
    fn test_pause_adjusts_session() {
        let (mut state, mut session) = playing(1);
        state.set_phase(GamePhase::Paused);
        state.drain_events();

        tick(&mut state, &mut session, &press(|i| i.volume_up = true), 0.016).unwrap();
        tick(&mut state, &mut session, &press(|i| i.brightness_down = true), 0.016).unwrap();
        assert!((session.volume() - 0.6).abs() < 1e-6);
        assert!((session.brightness() - 0.4).abs() < 1e-6);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::VolumeChanged(session.volume()),
                GameEvent::BrightnessChanged(session.brightness()),
            ]
        );

        for _ in 0..15 {
            tick(&mut state, &mut session, &press(|i| i.volume_up = true), 0.016).unwrap();
        }
        assert_eq!(session.volume(), 1.0);
    }

    #[test]
    fn test_session_untouched_outside_pause() {
        let (mut state, mut session) = playing(1);
        tick(&mut state, &mut session, &press(|i| i.volume_up = true), 0.001).unwrap();
        assert_eq!(session.volume(), 0.5);
    }

    #[test]
    fn test_exit_requests() {
        let (mut state, mut session) = playing(1);
        state.set_phase(GamePhase::Paused);
        state.drain_events();
        tick(&mut state, &mut session, &press(|i| i.exit = true), 0.016).unwrap();
        assert_eq!(state.drain_events(), vec![GameEvent::ExitRequested]);

        state.set_phase(GamePhase::Menu);
        state.drain_events();
        tick(&mut state, &mut session, &press(|i| i.exit = true), 0.016).unwrap();
        assert_eq!(state.drain_events(), vec![GameEvent::ExitRequested]);
    }

    #[test]
    fn test_enemy_destroyed_event() {
        let (mut state, mut session) = playing(1);
        let target = state.enemies[0].pos;
        let kind = state.enemies[0].kind;
        state.bullets.push(Bullet::new(target, Vec2::ZERO));
        tick(&mut state, &mut session, &TickInput::default(), 0.0).unwrap();
        assert_eq!(state.enemies.len(), 2);
        assert!(state.drain_events().contains(&GameEvent::EnemyDestroyed(kind)));
    }
}
