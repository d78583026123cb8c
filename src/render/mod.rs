//! Frame description and renderer contract
//!
//! `build_frame` turns a read-only view of the game into a `DrawList`;
//! backends implement `Renderer` to put that list on screen. Nothing here
//! mutates game state or session parameters.

pub mod screens;
pub mod theme;

use glam::Vec2;

use crate::consts::{BULLET_RADIUS, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::error::RenderError;
use crate::settings::SessionParameters;
use crate::sim::{GamePhase, GameState};

/// Linear RGBA color
pub type Rgba = [f32; 4];

/// Coordinate space for subsequent draw commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// [-1, 1] on both axes, +y up
    GameSpace,
    /// 0..SCREEN_WIDTH x 0..SCREEN_HEIGHT, +y down
    ScreenSpace,
}

impl Projection {
    /// Map a point into the unit viewport (0..1, +y down)
    pub fn to_viewport(self, p: Vec2) -> Vec2 {
        match self {
            Projection::GameSpace => Vec2::new((p.x + 1.0) * 0.5, (1.0 - p.y) * 0.5),
            Projection::ScreenSpace => Vec2::new(p.x / SCREEN_WIDTH, p.y / SCREEN_HEIGHT),
        }
    }

    /// Viewport fraction covered by one unit along each axis
    pub fn unit_scale(self) -> Vec2 {
        match self {
            Projection::GameSpace => Vec2::splat(0.5),
            Projection::ScreenSpace => Vec2::new(1.0 / SCREEN_WIDTH, 1.0 / SCREEN_HEIGHT),
        }
    }
}

/// One drawing instruction
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rgba),
    /// Replace the active projection
    SetProjection(Projection),
    /// Save the active projection and switch to another
    PushProjection(Projection),
    /// Restore the projection saved by the matching push
    PopProjection,
    /// Axis-aligned rectangle by centre and half extents
    FillRect { center: Vec2, half: Vec2, color: Rgba },
    Disc { center: Vec2, radius: f32, color: Rgba },
    /// Text whose top-left corner sits at `pos`; `size` is the line height
    Text {
        pos: Vec2,
        size: f32,
        text: String,
        color: Rgba,
    },
}

/// Ordered draw commands for a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn fill_rect(&mut self, center: Vec2, half: Vec2, color: Rgba) {
        self.push(DrawCommand::FillRect {
            center,
            half,
            color,
        });
    }

    pub fn disc(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.push(DrawCommand::Disc {
            center,
            radius,
            color,
        });
    }

    pub fn text(&mut self, pos: Vec2, size: f32, text: impl Into<String>, color: Rgba) {
        self.push(DrawCommand::Text {
            pos,
            size,
            text: text.into(),
            color,
        });
    }

    /// Replay the projection commands from `start`.
    ///
    /// Returns the projection active after the last command, or None if a
    /// pop has no matching push or a push is left open.
    pub fn final_projection(&self, start: Projection) -> Option<Projection> {
        let mut active = start;
        let mut stack = Vec::new();
        for command in &self.commands {
            match command {
                DrawCommand::SetProjection(p) => active = *p,
                DrawCommand::PushProjection(p) => {
                    stack.push(active);
                    active = *p;
                }
                DrawCommand::PopProjection => active = stack.pop()?,
                _ => {}
            }
        }
        stack.is_empty().then_some(active)
    }
}

/// Draws a finished frame
pub trait Renderer {
    fn present(&mut self, frame: &DrawList) -> Result<(), RenderError>;
}

/// Describe the current frame
pub fn build_frame(state: &GameState, session: &SessionParameters) -> DrawList {
    let mut frame = DrawList::new();
    frame.push(DrawCommand::Clear(theme::background(state.level)));

    match state.phase {
        GamePhase::Playing => {
            frame.push(DrawCommand::SetProjection(Projection::GameSpace));
            draw_level(&mut frame, state);
            draw_hud(&mut frame, state);
            if session.brightness() < 1.0 {
                draw_overlay(&mut frame, session.overlay_alpha());
            }
        }
        phase => {
            frame.push(DrawCommand::SetProjection(Projection::ScreenSpace));
            screens::draw(&mut frame, phase, state.level, session);
        }
    }
    frame
}

fn draw_level(frame: &mut DrawList, state: &GameState) {
    let maze = &state.maze;
    let half_cell = Vec2::splat(maze.cell_size() * 0.5);

    for (cell, blocked) in maze.cells() {
        if blocked {
            frame.fill_rect(maze.cell_center(cell), half_cell, theme::WALL);
        }
    }
    frame.fill_rect(maze.cell_center(maze.goal()), half_cell * 0.7, theme::GOAL);

    let player = &state.player;
    frame.fill_rect(player.pos, Vec2::splat(player.size), theme::PLAYER);
    // Barrel
    frame.disc(
        player.pos + player.facing * player.size,
        player.size * 0.35,
        theme::PLAYER,
    );

    for enemy in &state.enemies {
        frame.fill_rect(enemy.pos, Vec2::splat(enemy.size), theme::enemy_color(enemy.kind));
    }

    for bullet in &state.bullets {
        frame.disc(bullet.pos, BULLET_RADIUS, theme::PLAYER_BULLET);
    }
    for bullet in &state.enemy_bullets {
        frame.disc(bullet.pos, BULLET_RADIUS, theme::ENEMY_BULLET);
    }
}

fn draw_hud(frame: &mut DrawList, state: &GameState) {
    frame.push(DrawCommand::PushProjection(Projection::ScreenSpace));
    frame.text(
        Vec2::new(12.0, 8.0),
        24.0,
        format!("Level {}", state.level),
        theme::TEXT,
    );
    frame.text(
        Vec2::new(12.0, 36.0),
        20.0,
        format!("Enemies: {}", state.enemies.len()),
        theme::TEXT,
    );
    frame.push(DrawCommand::PopProjection);
}

/// Full-screen darkening, drawn in screen space without disturbing the
/// caller's projection
fn draw_overlay(frame: &mut DrawList, alpha: f32) {
    let half = Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT) * 0.5;
    frame.push(DrawCommand::PushProjection(Projection::ScreenSpace));
    frame.fill_rect(half, half, [0.0, 0.0, 0.0, alpha]);
    frame.push(DrawCommand::PopProjection);
}
