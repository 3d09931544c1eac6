//! Simulation clock: pause, slow motion and single-frame stepping
//!
//! Pausing never suspends the loop; it only drives the scaled delta to zero.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_DT, SLOW_MOTION_SCALE};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimClock {
    pub paused: bool,
    pub slow_motion: bool,
    /// One tick requested while paused
    step_requested: bool,
    /// Scaled seconds simulated so far
    pub elapsed: f64,
    /// Ticks that advanced the simulation
    pub frames: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::debug!("Simulation {}", if self.paused { "paused" } else { "resumed" });
    }

    pub fn set_slow_motion(&mut self, enabled: bool) {
        if self.slow_motion != enabled {
            log::debug!("Slow motion {}", if enabled { "on" } else { "off" });
        }
        self.slow_motion = enabled;
    }

    /// Advance exactly one tick on the next frame; only meaningful while paused
    pub fn request_step(&mut self) {
        if self.paused {
            self.step_requested = true;
        }
    }

    pub fn time_scale(&self) -> f32 {
        if self.paused {
            0.0
        } else if self.slow_motion {
            SLOW_MOTION_SCALE
        } else {
            1.0
        }
    }

    /// Turn a wall-clock frame delta into the simulation delta for this frame.
    /// Long hitches are clamped; a pending single step runs one unscaled frame.
    pub fn advance(&mut self, real_dt: f32) -> f32 {
        let real_dt = real_dt.clamp(0.0, MAX_FRAME_DT);
        let dt = if self.paused && self.step_requested {
            self.step_requested = false;
            real_dt
        } else {
            real_dt * self.time_scale()
        };
        if dt > 0.0 {
            self.elapsed += dt as f64;
            self.frames += 1;
        }
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;

    #[test]
    fn test_pause_freezes_time() {
        let mut clock = SimClock::new();
        clock.toggle_pause();
        assert_eq!(clock.advance(FRAME_DT), 0.0);
        assert_eq!(clock.frames, 0);
        clock.toggle_pause();
        assert_eq!(clock.advance(FRAME_DT), FRAME_DT);
    }

    #[test]
    fn test_step_advances_exactly_one_frame() {
        let mut clock = SimClock::new();
        clock.toggle_pause();
        clock.request_step();
        assert_eq!(clock.advance(FRAME_DT), FRAME_DT);
        assert_eq!(clock.advance(FRAME_DT), 0.0);
        assert_eq!(clock.frames, 1);
    }

    #[test]
    fn test_step_ignored_while_running() {
        let mut clock = SimClock::new();
        clock.request_step();
        clock.toggle_pause();
        assert_eq!(clock.advance(FRAME_DT), 0.0);
    }

    #[test]
    fn test_slow_motion_scales_and_hitches_clamp() {
        let mut clock = SimClock::new();
        clock.set_slow_motion(true);
        assert!((clock.advance(FRAME_DT) - FRAME_DT * SLOW_MOTION_SCALE).abs() < 1e-7);
        clock.set_slow_motion(false);
        assert_eq!(clock.advance(5.0), MAX_FRAME_DT);
        assert_eq!(clock.advance(-1.0), 0.0);
    }
}
