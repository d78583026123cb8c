//! Per-frame orchestration
//!
//! One `frame` call samples input, steps the state machine, forwards session
//! changes to audio and presents the frame. Everything runs on the caller's
//! thread; closing is a flag checked once per frame.

use crate::audio::AudioManager;
use crate::consts::MAX_FRAME_DT;
use crate::error::GameError;
use crate::input::{GestureClassifier, InputFusion, KeyboardSource};
use crate::render::{Renderer, build_frame};
use crate::settings::{SessionParameters, Settings};
use crate::sim::{GameEvent, GamePhase, GameState, tick};

/// Whether the loop should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Close,
}

/// Owns the game and its collaborators for one session
pub struct GameLoop<R: Renderer> {
    state: GameState,
    session: SessionParameters,
    fusion: InputFusion,
    gestures: Box<dyn GestureClassifier>,
    audio: AudioManager,
    renderer: R,
}

impl<R: Renderer> GameLoop<R> {
    /// Start a session from launch settings. Unless `start_in_menu` is set,
    /// level 1 is already running when this returns.
    pub fn new(
        settings: &Settings,
        gestures: Box<dyn GestureClassifier>,
        audio: AudioManager,
        renderer: R,
    ) -> Result<Self, GameError> {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Game initialized with seed: {}", seed);

        let mut state = GameState::new(seed, settings.maze_rows);
        if !settings.start_in_menu {
            state.start_new_game(1)?;
        }
        Ok(Self::with_state(
            state,
            settings.session(),
            gestures,
            audio,
            renderer,
        ))
    }

    /// Start a session around an existing game state
    pub fn with_state(
        state: GameState,
        session: SessionParameters,
        gestures: Box<dyn GestureClassifier>,
        mut audio: AudioManager,
        renderer: R,
    ) -> Self {
        audio.set_volume(session.volume());
        audio.play();
        Self {
            state,
            session,
            fusion: InputFusion::new(),
            gestures,
            audio,
            renderer,
        }
    }

    /// Run one frame of `dt` seconds (capped at `MAX_FRAME_DT`)
    pub fn frame(
        &mut self,
        keyboard: &dyn KeyboardSource,
        dt: f32,
    ) -> Result<LoopControl, GameError> {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        let poll_gestures = self.state.phase == GamePhase::Playing;
        let input = self
            .fusion
            .sample(keyboard, self.gestures.as_mut(), poll_gestures);

        tick(&mut self.state, &mut self.session, &input, dt)?;

        let mut control = LoopControl::Continue;
        for event in self.state.drain_events() {
            match event {
                GameEvent::VolumeChanged(volume) => self.audio.set_volume(volume),
                GameEvent::BrightnessChanged(brightness) => {
                    log::debug!("Brightness {:.0}%", brightness * 100.0);
                }
                GameEvent::ExitRequested => {
                    log::info!("Exit requested from {}", self.state.phase.as_str());
                    control = LoopControl::Close;
                }
                GameEvent::EnemyDestroyed(kind) => {
                    log::debug!("Destroyed {}", kind.as_str());
                }
                GameEvent::PhaseChanged { .. }
                | GameEvent::LevelStarted(_)
                | GameEvent::PlayerShot => {}
            }
        }
        if control == LoopControl::Close {
            return Ok(control);
        }

        let frame = build_frame(&self.state, &self.session);
        self.renderer.present(&frame)?;
        Ok(LoopControl::Continue)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn session(&self) -> &SessionParameters {
        &self.session
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Stop the music, then hand back the renderer so the caller releases
    /// the display last
    pub fn shutdown(mut self) -> R {
        self.audio.stop();
        log::info!("Session ended on level {}", self.state.level);
        self.renderer
    }
}
