//! Speaker output through rodio

use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::track::{MusicTrack, SAMPLE_RATE};
use super::MusicBackend;
use crate::error::AudioError;

impl Source for MusicTrack {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// Loops one track on the default output device. The sink starts paused.
pub struct SpeakerMusic {
    // Dropping the stream silences the sink
    _stream: OutputStream,
    sink: Sink,
}

impl SpeakerMusic {
    pub fn open(music_file: Option<&Path>) -> Result<Self, AudioError> {
        let decoded = match music_file {
            Some(path) => {
                let bytes = std::fs::read(path).map_err(|source| AudioError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                let decoder = Decoder::new(Cursor::new(bytes))
                    .map_err(|e| AudioError::Decode(e.to_string()))?;
                Some((path, decoder))
            }
            None => None,
        };

        let (stream, handle) =
            OutputStream::try_default().map_err(|e| AudioError::Device(e.to_string()))?;
        let sink = Sink::try_new(&handle).map_err(|e| AudioError::Device(e.to_string()))?;
        sink.pause();

        match decoded {
            Some((path, decoder)) => {
                log::info!("Looping music from {}", path.display());
                sink.append(decoder.repeat_infinite());
            }
            None => {
                log::info!("Looping built-in music track");
                sink.append(MusicTrack::new());
            }
        }

        Ok(Self {
            _stream: stream,
            sink,
        })
    }
}

impl MusicBackend for SpeakerMusic {
    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn play(&mut self) {
        self.sink.play();
    }

    fn stop(&mut self) {
        self.sink.pause();
    }
}
