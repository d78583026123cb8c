//! Error types shared across the crate

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Enemy roster could not be built for a level
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("level {0} has no spawn plan")]
    UnknownLevel(u32),
    #[error(
        "level {level}: placed {placed} of {required} enemies before giving up after \
         {attempts} samples (maze too small for the spawn margin?)"
    )]
    PlacementExhausted {
        level: u32,
        placed: usize,
        required: usize,
        attempts: u32,
    },
    #[error("level {level}: every archetype is at its quota")]
    QuotaExhausted { level: u32 },
}

/// Launch configuration could not be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Camera capture or gesture classification failed for one frame
#[derive(Debug, Error)]
pub enum GestureError {
    #[error("frame capture failed: {0}")]
    Capture(#[from] io::Error),
    #[error("unrecognised gesture label `{0}`")]
    Classify(String),
}

/// Music output could not be opened; the game runs silently instead
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("built without the `music` feature")]
    Unsupported,
    #[error("no usable output device: {0}")]
    Device(String),
    #[error("failed to read music {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode music: {0}")]
    Decode(String),
}

/// Drawing a frame failed
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("terminal write failed: {0}")]
    Io(#[from] io::Error),
}

/// Startup failed; no session is started
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to set up terminal: {0}")]
    Terminal(#[source] io::Error),
    #[error("gesture feed {path} unavailable: {source}")]
    GestureFeed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Errors raised while the game is running
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Spawn(#[from] SpawnError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
