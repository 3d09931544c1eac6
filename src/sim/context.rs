//! Per-frame context handed to entity code
//!
//! Entities never touch pools directly. Anything that would insert into a
//! pool, play a sound, or shake the camera is queued as a [`SimCommand`] and
//! applied by the frame tick at fixed points, so no pool grows while it is
//! being iterated.

use glam::Vec2;

use super::bullet::Bullet;
use super::entity::Rgba;
use crate::GameRng;
use crate::audio::SoundEffect;
use crate::audio_balance_for_x;
use crate::consts::*;

/// Parameters for a cluster of debris
#[derive(Debug, Clone, PartialEq)]
pub struct DebrisBurst {
    pub pos: Vec2,
    /// Velocity every piece inherits before its random scatter is added
    pub base_velocity: Vec2,
    pub color: Rgba,
    pub count: u32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl DebrisBurst {
    /// Burst with the default scatter speeds and piece sizes
    pub fn new(pos: Vec2, base_velocity: Vec2, color: Rgba, count: u32) -> Self {
        Self {
            pos,
            base_velocity,
            color,
            count,
            min_speed: DEBRIS_MIN_SCATTER_SPEED,
            max_speed: DEBRIS_MAX_SCATTER_SPEED,
            min_radius: DEBRIS_MIN_RADIUS,
            max_radius: DEBRIS_MAX_RADIUS,
        }
    }

    /// Scale piece size (bigger explosions, bigger chunks)
    pub fn with_radius(mut self, min_radius: f32, max_radius: f32) -> Self {
        self.min_radius = min_radius;
        self.max_radius = max_radius;
        self
    }

    pub fn with_speed(mut self, min_speed: f32, max_speed: f32) -> Self {
        self.min_speed = min_speed;
        self.max_speed = max_speed;
        self
    }
}

/// Deferred side effect requested by entity or collision code
#[derive(Debug, Clone)]
pub enum SimCommand {
    SpawnBullet(Bullet),
    SpawnDebris(DebrisBurst),
    SpawnPowerUp { pos: Vec2 },
    /// Replacement for an asteroid destroyed by ramming
    SpawnAsteroid,
    PlaySound { effect: SoundEffect, balance: f32 },
    AddScreenShake(f32),
}

/// Queue of commands flushed by the frame tick
pub type CommandQueue = Vec<SimCommand>;

/// Borrowed services for one simulation step
pub struct SimContext<'a> {
    /// Scaled frame delta in seconds
    pub dt: f32,
    pub rng: &'a mut GameRng,
    pub commands: &'a mut CommandQueue,
    /// Positions of living player ships, in slot order
    pub targets: &'a [Vec2],
}

impl<'a> SimContext<'a> {
    pub fn new(
        dt: f32,
        rng: &'a mut GameRng,
        commands: &'a mut CommandQueue,
        targets: &'a [Vec2],
    ) -> Self {
        Self {
            dt,
            rng,
            commands,
            targets,
        }
    }

    pub fn push(&mut self, command: SimCommand) {
        self.commands.push(command);
    }

    /// Queue a one-shot sound panned to a world position
    pub fn play_sound(&mut self, effect: SoundEffect, pos: Vec2) {
        self.commands.push(SimCommand::PlaySound {
            effect,
            balance: audio_balance_for_x(pos.x),
        });
    }

    pub fn add_screen_shake(&mut self, amount: f32) {
        self.commands.push(SimCommand::AddScreenShake(amount));
    }

    /// Closest living player position, first in slot order on ties
    pub fn nearest_target(&self, from: Vec2) -> Option<Vec2> {
        let mut best: Option<(f32, Vec2)> = None;
        for target in self.targets {
            let dist_sq = from.distance_squared(*target);
            if best.is_none_or(|(d, _)| dist_sq < d) {
                best = Some((dist_sq, *target));
            }
        }
        best.map(|(_, p)| p)
    }
}
