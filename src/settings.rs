//! Launch settings and live session parameters
//!
//! `Settings` is read once at startup and never written back.
//! `SessionParameters` holds the volume/brightness pair that the pause screen
//! adjusts; it lives for the process and survives level transitions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::SESSION_STEP;
use crate::error::ConfigError;

/// Environment variable naming an optional JSON settings file
pub const CONFIG_ENV_VAR: &str = "TANK_MAZE_CONFIG";

/// Settings file named by `TANK_MAZE_CONFIG`, if set
pub fn config_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from)
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maze rows and columns (odd)
    pub maze_rows: usize,
    /// Show the menu first instead of dropping straight into level 1
    pub start_in_menu: bool,

    // === Session defaults ===
    /// Starting music volume (0.0 - 1.0)
    pub initial_volume: f32,
    /// Starting brightness (0.0 - 1.0)
    pub initial_brightness: f32,

    // === Loop ===
    /// Frame pacing target
    pub target_fps: u32,
    /// Fixed RNG seed (random when absent)
    pub seed: Option<u64>,

    // === Collaborators ===
    /// File written by the external camera classifier; keyboard-only if absent
    pub gesture_feed: Option<PathBuf>,
    /// Redirect log output here (the terminal is busy drawing the game)
    pub log_file: Option<PathBuf>,
    /// Looping music file (WAV); the built-in track plays when absent
    pub music_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            maze_rows: 21,
            start_in_menu: false,

            initial_volume: 0.7,
            initial_brightness: 0.8,

            target_fps: 60,
            seed: None,

            gesture_feed: None,
            log_file: None,
            music_file: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or defaults when there is none.
    ///
    /// Runs before logging is set up, so it reports only through its result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Parse and validate settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the game cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.maze_rows < 7 || self.maze_rows % 2 == 0 {
            return Err(ConfigError::Invalid {
                field: "maze_rows",
                reason: format!("must be odd and at least 7, got {}", self.maze_rows),
            });
        }
        if self.target_fps == 0 {
            return Err(ConfigError::Invalid {
                field: "target_fps",
                reason: "must be positive".to_string(),
            });
        }
        for (field, value) in [
            ("initial_volume", self.initial_volume),
            ("initial_brightness", self.initial_brightness),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be within 0.0..=1.0, got {value}"),
                });
            }
        }
        Ok(())
    }

    /// Session parameters to start the process with
    pub fn session(&self) -> SessionParameters {
        SessionParameters::new(self.initial_volume, self.initial_brightness)
    }
}

/// Live-adjustable volume and brightness, both always within [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionParameters {
    volume: f32,
    brightness: f32,
}

impl Default for SessionParameters {
    fn default() -> Self {
        Settings::default().session()
    }
}

impl SessionParameters {
    pub fn new(volume: f32, brightness: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
            brightness: brightness.clamp(0.0, 1.0),
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Step volume up (+1) or down (-1); returns the new value
    pub fn step_volume(&mut self, steps: i32) -> f32 {
        self.volume = stepped(self.volume, steps);
        self.volume
    }

    /// Step brightness up (+1) or down (-1); returns the new value
    pub fn step_brightness(&mut self, steps: i32) -> f32 {
        self.brightness = stepped(self.brightness, steps);
        self.brightness
    }

    /// Alpha of the darkening overlay, zero at full brightness
    pub fn overlay_alpha(&self) -> f32 {
        1.0 - self.brightness
    }

    /// Volume as a whole percentage for display
    pub fn volume_percent(&self) -> u32 {
        (self.volume * 100.0).round() as u32
    }

    /// Brightness as a whole percentage for display
    pub fn brightness_percent(&self) -> u32 {
        (self.brightness * 100.0).round() as u32
    }
}

/// Apply `steps` increments and clamp. Rounding to thousandths drops the f32
/// drift that repeated tenths would otherwise accumulate.
fn stepped(value: f32, steps: i32) -> f32 {
    let raw = value + steps as f32 * SESSION_STEP;
    ((raw * 1000.0).round() / 1000.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Mutex;

    #[test]
    fn test_defaults_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.maze_rows, 21);
        assert!(!settings.start_in_menu);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "maze_rows": 15, "seed": 7 }"#).unwrap();
        assert_eq!(settings.maze_rows, 15);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.target_fps, 60);
        assert!((settings.initial_volume - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        assert_eq!(Settings::load(None).unwrap(), Settings::default());
    }

    #[test]
    fn test_load_reads_file() {
        let path = std::env::temp_dir().join(format!("tank-maze-settings-{}", std::process::id()));
        std::fs::write(&path, r#"{ "target_fps": 30, "music_file": "theme.wav" }"#).unwrap();
        let settings = Settings::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(settings.target_fps, 30);
        assert_eq!(settings.music_file, Some(PathBuf::from("theme.wav")));

        let missing = std::env::temp_dir().join("tank-maze-no-such-settings");
        assert!(matches!(
            Settings::load(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));
    }

    /// Records the target of every log record in this test binary
    struct TargetRecorder;

    static TARGETS: Mutex<Vec<String>> = Mutex::new(Vec::new());
    static RECORDER: TargetRecorder = TargetRecorder;

    impl log::Log for TargetRecorder {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            TARGETS.lock().unwrap().push(record.target().to_string());
        }

        fn flush(&self) {}
    }

    #[test]
    fn test_loading_logs_nothing() {
        // The logger does not exist yet when settings load
        let _ = log::set_logger(&RECORDER);
        log::set_max_level(log::LevelFilter::Trace);

        let path = std::env::temp_dir().join(format!("tank-maze-quiet-{}", std::process::id()));
        std::fs::write(&path, r#"{ "seed": 1 }"#).unwrap();
        Settings::load(Some(&path)).unwrap();
        Settings::load(None).unwrap();
        std::fs::remove_file(&path).unwrap();

        let targets = TARGETS.lock().unwrap();
        assert!(!targets.iter().any(|t| t == "tank_maze::settings"));
    }

    #[test]
    fn test_even_maze_rejected() {
        let err = Settings::from_json(r#"{ "maze_rows": 20 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "maze_rows", .. }));
    }

    #[test]
    fn test_out_of_range_volume_rejected() {
        let err = Settings::from_json(r#"{ "initial_volume": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "initial_volume", .. }));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_volume_saturates_at_one() {
        let mut session = SessionParameters::new(0.7, 0.8);
        for _ in 0..15 {
            session.step_volume(1);
        }
        assert_eq!(session.volume(), 1.0);
        assert_eq!(session.volume_percent(), 100);
    }

    #[test]
    fn test_brightness_saturates_at_zero() {
        let mut session = SessionParameters::new(0.7, 0.8);
        for _ in 0..15 {
            session.step_brightness(-1);
        }
        assert_eq!(session.brightness(), 0.0);
        assert_eq!(session.overlay_alpha(), 1.0);
    }

    #[test]
    fn test_single_step_from_default() {
        let mut session = SessionParameters::default();
        assert_eq!(session.step_volume(1), 0.8);
        assert_eq!(session.step_brightness(1), 0.9);
        assert_eq!(session.brightness_percent(), 90);
    }

    proptest! {
        #[test]
        fn prop_session_stays_in_range(
            start_volume in 0.0f32..=1.0,
            start_brightness in 0.0f32..=1.0,
            steps in proptest::collection::vec(prop_oneof![Just(1i32), Just(-1i32)], 0..60),
        ) {
            let mut session = SessionParameters::new(start_volume, start_brightness);
            for step in steps {
                let v = session.step_volume(step);
                let b = session.step_brightness(-step);
                prop_assert!((0.0..=1.0).contains(&v));
                prop_assert!((0.0..=1.0).contains(&b));
            }
        }

        #[test]
        fn prop_ten_steps_reach_the_bound(start in 0.0f32..=1.0) {
            let mut session = SessionParameters::new(start, start);
            for _ in 0..11 {
                session.step_volume(1);
                session.step_brightness(-1);
            }
            prop_assert_eq!(session.volume(), 1.0);
            prop_assert_eq!(session.brightness(), 0.0);
        }
    }
}
