//! World camera with eased screen shake

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Shake below this snaps to zero
const SHAKE_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Camera {
    /// Current shake magnitude in world units
    pub shake: f32,
    /// Offset applied to the view this frame
    pub offset: Vec2,
    /// Drives the shake wobble; deterministic, no RNG rolls
    phase: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_shake(&mut self, amount: f32) {
        self.shake = (self.shake + amount).min(MAX_SCREEN_SHAKE);
    }

    /// Ease shake back toward zero and recompute the view offset
    pub fn update(&mut self, dt: f32, shake_enabled: bool) {
        self.shake *= (1.0 - SCREEN_SHAKE_DECAY * dt).max(0.0);
        if self.shake < SHAKE_EPSILON {
            self.shake = 0.0;
        }
        self.phase += dt;

        self.offset = if shake_enabled && self.shake > 0.0 {
            Vec2::new((self.phase * 53.0).sin(), (self.phase * 41.0).cos()) * self.shake
        } else {
            Vec2::ZERO
        };
    }

    /// Visible world rectangle as (min, max) corners
    pub fn view_bounds(&self) -> (Vec2, Vec2) {
        (
            self.offset,
            Vec2::new(WORLD_SIZE_X, WORLD_SIZE_Y) + self.offset,
        )
    }
}
