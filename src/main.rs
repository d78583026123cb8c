//! Tank Maze - terminal entry point

use std::fs::File;
use std::path::Path;
use std::process::ExitCode;

use tank_maze::audio::AudioManager;
use tank_maze::input::{FeedClassifier, GestureClassifier, NoGestures};
use tank_maze::platform::{FrameClock, TerminalKeyboard, TerminalRenderer};
use tank_maze::settings::config_path;
use tank_maze::{GameLoop, InitError, LoopControl, Settings};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("tank-maze: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), InitError> {
    let config = config_path();
    let settings = Settings::load(config.as_deref());
    init_logging(settings.as_ref().ok().and_then(|s| s.log_file.as_deref()))?;
    let settings = settings?;
    log::info!("Tank Maze starting...");
    match &config {
        Some(path) => log::info!("Loaded settings from {}", path.display()),
        None => log::info!("Using default settings"),
    }

    // Camera feed is checked before the terminal is touched
    let gestures: Box<dyn GestureClassifier> = match &settings.gesture_feed {
        Some(path) => Box::new(FeedClassifier::open(path).map_err(|source| {
            InitError::GestureFeed {
                path: path.clone(),
                source,
            }
        })?),
        None => {
            log::info!("No gesture feed configured - keyboard only");
            Box::new(NoGestures)
        }
    };

    let renderer = TerminalRenderer::init().map_err(InitError::Terminal)?;
    let mut keyboard = TerminalKeyboard::new(renderer.reports_key_release(), settings.target_fps);
    let audio = AudioManager::open(settings.music_file.as_deref(), settings.initial_volume);
    let mut game = GameLoop::new(&settings, gestures, audio, renderer)?;

    let mut clock = FrameClock::new(settings.target_fps);
    log::info!("Tank Maze running!");

    let result = loop {
        let dt = clock.begin_frame();
        if let Err(e) = keyboard.poll() {
            break Err(InitError::Terminal(e));
        }
        if keyboard.close_requested() {
            log::info!("Close requested");
            break Ok(());
        }
        match game.frame(&keyboard, dt) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Close) => break Ok(()),
            Err(e) => break Err(e.into()),
        }
        clock.end_frame();
    };

    // Music stops before the terminal is handed back
    drop(game.shutdown());
    result
}

/// Route logs to `log_file` when set; otherwise only errors reach stderr,
/// since the terminal is busy drawing the game
fn init_logging(log_file: Option<&Path>) -> Result<(), InitError> {
    let default_filter = if log_file.is_some() { "info" } else { "error" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = File::create(path).map_err(|source| InitError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}
