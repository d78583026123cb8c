//! Built-in procedural music loop
//!
//! A square-wave bass under a triangle lead, sequenced in eighth notes.
//! Every note restarts its oscillator so the output is a pure function of
//! the sample index and the loop repeats exactly.

use std::f32::consts::TAU;

pub const SAMPLE_RATE: u32 = 44_100;
/// 120 BPM eighth notes
const STEP_SAMPLES: u64 = SAMPLE_RATE as u64 * 60 / 120 / 2;

const BASS_GAIN: f32 = 0.22;
const LEAD_GAIN: f32 = 0.16;
/// Seconds of linear fade-in at each note start
const ATTACK: f32 = 0.005;

// MIDI note numbers, None rests
const BASS: [Option<u8>; 16] = [
    Some(40), None, Some(40), Some(47),
    Some(40), None, Some(43), Some(45),
    Some(36), None, Some(36), Some(43),
    Some(38), None, Some(38), Some(45),
];
const LEAD: [Option<u8>; 16] = [
    Some(64), Some(67), Some(71), None,
    Some(69), Some(67), Some(64), Some(62),
    Some(60), Some(64), Some(67), None,
    Some(66), Some(62), Some(69), None,
];

fn midi_to_hz(note: u8) -> f32 {
    440.0 * 2f32.powf((f32::from(note) - 69.0) / 12.0)
}

/// Endless mono sample stream of the built-in track
#[derive(Debug, Clone, Default)]
pub struct MusicTrack {
    sample: u64,
}

impl MusicTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples in one pass of the loop
    pub const fn loop_len() -> u64 {
        STEP_SAMPLES * BASS.len() as u64
    }

    pub fn next_sample(&mut self) -> f32 {
        let pos = self.sample % Self::loop_len();
        self.sample = self.sample.wrapping_add(1);

        let step = (pos / STEP_SAMPLES) as usize;
        let local = (pos % STEP_SAMPLES) as f32;
        let t = local / SAMPLE_RATE as f32;
        let progress = local / STEP_SAMPLES as f32;
        let envelope = (t / ATTACK).min(1.0) * (1.0 - progress).powi(2);

        let mut out = 0.0;
        if let Some(note) = BASS[step] {
            let square = if (TAU * midi_to_hz(note) * t).sin() >= 0.0 { 1.0 } else { -1.0 };
            out += square * BASS_GAIN;
        }
        if let Some(note) = LEAD[step] {
            let phase = (midi_to_hz(note) * t).fract();
            let triangle = 4.0 * (phase - 0.5).abs() - 1.0;
            out += triangle * LEAD_GAIN;
        }
        (out * envelope).clamp(-1.0, 1.0)
    }
}

impl Iterator for MusicTrack {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        Some(self.next_sample())
    }
}
