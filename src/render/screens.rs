//! Static screens for every phase except gameplay, in screen space

use glam::Vec2;

use super::{DrawCommand, DrawList, Rgba, theme};
use crate::consts::MAX_LEVEL;
use crate::settings::SessionParameters;
use crate::sim::GamePhase;

/// Draw the screen for `phase`; `Playing` draws nothing here
pub fn draw(frame: &mut DrawList, phase: GamePhase, level: u32, session: &SessionParameters) {
    match phase {
        GamePhase::Menu => menu(frame),
        GamePhase::Paused => pause(frame, session),
        GamePhase::Win => win(frame, level),
        GamePhase::Lose => lose(frame),
        GamePhase::LevelComplete => level_complete(frame, level),
        GamePhase::Playing => {}
    }
}

fn menu(frame: &mut DrawList) {
    frame.text(Vec2::new(250.0, 220.0), 48.0, "TANK MAZE", theme::TEXT);
    frame.text(Vec2::new(250.0, 360.0), 28.0, "Press SPACE to Start", theme::TEXT_DIM);
    frame.text(Vec2::new(250.0, 400.0), 24.0, "WASD move, F shoot, E pause", theme::TEXT_DIM);
    frame.text(Vec2::new(250.0, 440.0), 24.0, "Press ESC to Quit", theme::TEXT_DIM);
}

fn pause(frame: &mut DrawList, session: &SessionParameters) {
    frame.push(DrawCommand::Clear(theme::PAUSE_BACKGROUND));

    frame.text(Vec2::new(175.0, 150.0), 40.0, "GAME PAUSED", theme::TEXT);
    frame.fill_rect(Vec2::new(400.0, 195.0), Vec2::new(160.0, 5.0), theme::DIVIDER);

    frame.text(
        Vec2::new(300.0, 230.0),
        32.0,
        format!("Volume: {}%", session.volume_percent()),
        theme::TEXT_DIM,
    );
    frame.text(
        Vec2::new(280.0, 280.0),
        32.0,
        format!("Brightness: {}%", session.brightness_percent()),
        theme::TEXT_DIM,
    );
    frame.text(Vec2::new(250.0, 330.0), 28.0, "Press +/- to Adjust Volume", theme::TEXT_DIM);
    frame.text(
        Vec2::new(220.0, 370.0),
        28.0,
        "Press Up/Down to Adjust Brightness",
        theme::TEXT_DIM,
    );
    frame.text(Vec2::new(270.0, 420.0), 28.0, "Press E to Resume Game", theme::TEXT_DIM);
    frame.text(Vec2::new(240.0, 460.0), 28.0, "Press ESC to Quit", theme::TEXT_DIM);

    bar(frame, Vec2::new(300.0, 500.0), session.volume(), theme::VOLUME_BAR);
    bar(frame, Vec2::new(300.0, 540.0), session.brightness(), theme::BRIGHTNESS_BAR);
}

/// 200x20 meter with its top-left corner at `origin`
fn bar(frame: &mut DrawList, origin: Vec2, fill: f32, color: Rgba) {
    const SIZE: Vec2 = Vec2::new(200.0, 20.0);
    frame.fill_rect(origin + SIZE * 0.5, SIZE * 0.5, theme::BAR_TRACK);
    if fill > 0.0 {
        let filled = Vec2::new(SIZE.x * fill, SIZE.y);
        frame.fill_rect(origin + filled * 0.5, filled * 0.5, color);
    }
}

fn win(frame: &mut DrawList, level: u32) {
    frame.text(Vec2::new(260.0, 260.0), 48.0, "YOU WIN!", theme::TEXT);
    let next = if level < MAX_LEVEL {
        "Press SPACE for the Next Level"
    } else {
        "Press SPACE to Return to Menu"
    };
    frame.text(Vec2::new(200.0, 380.0), 28.0, next, theme::TEXT_DIM);
    frame.text(Vec2::new(200.0, 420.0), 24.0, "Press ESC to Quit", theme::TEXT_DIM);
}

fn lose(frame: &mut DrawList) {
    frame.text(Vec2::new(250.0, 260.0), 48.0, "GAME OVER", theme::TEXT);
    frame.text(Vec2::new(230.0, 380.0), 28.0, "Press SPACE to Restart", theme::TEXT_DIM);
    frame.text(Vec2::new(230.0, 420.0), 24.0, "Press ESC to Quit", theme::TEXT_DIM);
}

fn level_complete(frame: &mut DrawList, level: u32) {
    frame.text(
        Vec2::new(200.0, 260.0),
        44.0,
        format!("LEVEL {level} COMPLETE"),
        theme::TEXT,
    );
    frame.text(
        Vec2::new(200.0, 380.0),
        28.0,
        format!("Press SPACE for Level {}", level + 1),
        theme::TEXT_DIM,
    );
}
