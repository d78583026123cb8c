//! Background music
//!
//! The game only needs play, stop and volume. Those go through a
//! `MusicBackend`; without one the manager runs silently. With the `music`
//! feature the default output device loops either a WAV file or the
//! built-in procedural track.

#[cfg(feature = "music")]
pub mod device;
pub mod track;

pub use track::MusicTrack;

use std::path::Path;

use crate::error::AudioError;

/// A device that can loop the music track
pub trait MusicBackend {
    /// Linear volume, 0.0 - 1.0
    fn set_volume(&mut self, volume: f32);
    fn play(&mut self);
    fn stop(&mut self);
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn MusicBackend>>,
    volume: f32,
    playing: bool,
}

impl AudioManager {
    pub fn new(backend: Option<Box<dyn MusicBackend>>, volume: f32) -> Self {
        let mut manager = Self {
            backend,
            volume: 0.0,
            playing: false,
        };
        manager.set_volume(volume);
        manager
    }

    /// Music on the default output device, or silence if it cannot be
    /// opened. `music_file` replaces the built-in track.
    pub fn open(music_file: Option<&Path>, volume: f32) -> Self {
        match open_backend(music_file) {
            Ok(backend) => Self::new(Some(backend), volume),
            Err(e) => {
                log::warn!("Failed to open audio output - audio disabled: {}", e);
                Self::silent(volume)
            }
        }
    }

    /// Manager with no backend; all calls are no-ops
    pub fn silent(volume: f32) -> Self {
        Self::new(None, volume)
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Apply a volume immediately (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(backend) = &mut self.backend {
            backend.set_volume(self.volume);
        }
        log::debug!("Volume {:.0}%", self.volume * 100.0);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Start the track if it is not already playing
    pub fn play(&mut self) {
        if self.playing {
            return;
        }
        if let Some(backend) = &mut self.backend {
            backend.play();
        }
        self.playing = true;
    }

    pub fn stop(&mut self) {
        if !self.playing {
            return;
        }
        if let Some(backend) = &mut self.backend {
            backend.stop();
        }
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

#[cfg(feature = "music")]
fn open_backend(music_file: Option<&Path>) -> Result<Box<dyn MusicBackend>, AudioError> {
    Ok(Box::new(device::SpeakerMusic::open(music_file)?))
}

#[cfg(not(feature = "music"))]
fn open_backend(_music_file: Option<&Path>) -> Result<Box<dyn MusicBackend>, AudioError> {
    Err(AudioError::Unsupported)
}

impl Drop for AudioManager {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Volume(f32),
        Play,
        Stop,
    }

    struct Recorder(Rc<RefCell<Vec<Call>>>);

    impl MusicBackend for Recorder {
        fn set_volume(&mut self, volume: f32) {
            self.0.borrow_mut().push(Call::Volume(volume));
        }
        fn play(&mut self) {
            self.0.borrow_mut().push(Call::Play);
        }
        fn stop(&mut self) {
            self.0.borrow_mut().push(Call::Stop);
        }
    }

    fn recorded(volume: f32) -> (AudioManager, Rc<RefCell<Vec<Call>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let manager = AudioManager::new(Some(Box::new(Recorder(calls.clone()))), volume);
        (manager, calls)
    }

    #[test]
    fn test_initial_volume_applied() {
        let (manager, calls) = recorded(0.7);
        assert!(manager.is_enabled());
        assert_eq!(*calls.borrow(), vec![Call::Volume(0.7)]);
    }

    #[test]
    fn test_play_stop_idempotent() {
        let (mut manager, calls) = recorded(0.5);
        manager.play();
        manager.play();
        manager.stop();
        manager.stop();
        assert_eq!(
            *calls.borrow(),
            vec![Call::Volume(0.5), Call::Play, Call::Stop]
        );
    }

    #[test]
    fn test_drop_stops_music() {
        let (mut manager, calls) = recorded(0.5);
        manager.play();
        drop(manager);
        assert_eq!(calls.borrow().last(), Some(&Call::Stop));
    }

    #[test]
    fn test_volume_clamped() {
        let (mut manager, calls) = recorded(0.5);
        manager.set_volume(1.7);
        assert_eq!(manager.volume(), 1.0);
        assert_eq!(calls.borrow().last(), Some(&Call::Volume(1.0)));
    }

    #[test]
    fn test_unreadable_music_file_falls_back_to_silent() {
        let missing = std::env::temp_dir().join("tank-maze-no-such-track.wav");
        let mut manager = AudioManager::open(Some(&missing), 0.4);
        assert!(!manager.is_enabled());
        assert_eq!(manager.volume(), 0.4);
        manager.play();
        assert!(manager.is_playing());
    }

    #[test]
    fn test_silent_manager() {
        let mut manager = AudioManager::silent(0.3);
        manager.play();
        assert!(manager.is_playing());
        assert!(!manager.is_enabled());
        manager.stop();
        assert!(!manager.is_playing());
    }
}
