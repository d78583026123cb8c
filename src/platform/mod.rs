//! Terminal front end
//!
//! Handles the parts that touch the real terminal:
//! - Key events -> held-key samples (`TerminalKeyboard`)
//! - Draw lists -> coloured character cells (`TerminalRenderer`)
//! - Frame pacing (`FrameClock`)

pub mod keyboard;
pub mod terminal;

pub use keyboard::TerminalKeyboard;
pub use terminal::{CellGrid, TerminalRenderer};

use std::time::{Duration, Instant};

use crate::consts::MAX_FRAME_DT;

/// Measures frame deltas and sleeps to hold a target rate
#[derive(Debug)]
pub struct FrameClock {
    frame_budget: Duration,
    last: Instant,
    frame_start: Instant,
}

impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        let now = Instant::now();
        Self {
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1))),
            last: now,
            frame_start: now,
        }
    }

    /// Seconds since the previous call, capped at `MAX_FRAME_DT`
    pub fn begin_frame(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        self.frame_start = now;
        dt.min(MAX_FRAME_DT)
    }

    /// Sleep out the rest of this frame's budget
    pub fn end_frame(&self) {
        let elapsed = self.frame_start.elapsed();
        if elapsed < self.frame_budget {
            std::thread::sleep(self.frame_budget - elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_dt_is_capped() {
        let mut clock = FrameClock::new(60);
        std::thread::sleep(Duration::from_millis(150));
        let dt = clock.begin_frame();
        assert_eq!(dt, MAX_FRAME_DT);
    }

    #[test]
    fn test_end_frame_holds_rate() {
        let mut clock = FrameClock::new(50);
        clock.begin_frame();
        let start = Instant::now();
        clock.end_frame();
        assert!(start.elapsed() >= Duration::from_millis(15));
    }
}
