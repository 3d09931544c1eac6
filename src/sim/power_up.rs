//! Pickups dropped by destroyed enemies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::BulletKind;
use super::context::{DebrisBurst, SimContext};
use super::entity::{Entity, EntityCore, EntityKind, palette};
use crate::GameRng;
use crate::consts::*;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    TriBullet,
    FiveBullet,
    BurstBullet,
    SniperBullet,
    Shield,
    Health,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::TriBullet,
        PowerUpKind::FiveBullet,
        PowerUpKind::BurstBullet,
        PowerUpKind::SniperBullet,
        PowerUpKind::Shield,
        PowerUpKind::Health,
    ];

    /// Fire pattern granted by weapon power-ups
    pub fn weapon(&self) -> Option<BulletKind> {
        match self {
            PowerUpKind::TriBullet => Some(BulletKind::Tri),
            PowerUpKind::FiveBullet => Some(BulletKind::Five),
            PowerUpKind::BurstBullet => Some(BulletKind::Burst),
            PowerUpKind::SniperBullet => Some(BulletKind::Sniper),
            PowerUpKind::Shield | PowerUpKind::Health => None,
        }
    }

    pub fn roll(rng: &mut GameRng) -> Self {
        let index = rng.roll_int_in_range(0, Self::ALL.len() as i32 - 1) as usize;
        Self::ALL[index]
    }
}

/// A drifting pickup that bounces off the world edges until collected or expired
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub core: EntityCore,
    pub kind: PowerUpKind,
    pub lifetime: f32,
}

impl PowerUp {
    pub fn new(pos: Vec2, vel: Vec2, kind: PowerUpKind) -> Self {
        let mut core = EntityCore::new(
            pos,
            POWER_UP_PHYSICS_RADIUS,
            POWER_UP_COSMETIC_RADIUS,
            1,
            palette::POWER_UP,
        );
        core.vel = vel;
        core.angular_velocity = 90.0;
        Self {
            core,
            kind,
            lifetime: POWER_UP_LIFETIME,
        }
    }

    pub fn spawn_random(pos: Vec2, rng: &mut GameRng) -> Self {
        let kind = PowerUpKind::roll(rng);
        let vel = rng.roll_direction() * POWER_UP_DRIFT_SPEED;
        Self::new(pos, vel, kind)
    }

    /// Taken by a ship: a small sparkle and gone
    pub fn consume(&mut self, ctx: &mut SimContext<'_>) {
        self.die(ctx);
    }
}

impl Entity for PowerUp {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn kind(&self) -> EntityKind {
        EntityKind::PowerUp
    }

    fn update(&mut self, ctx: &mut SimContext<'_>) {
        if !self.is_alive() {
            return;
        }
        self.core.integrate(ctx.dt);
        self.core.bounce_off_world_edges();
        if self.core.age >= self.lifetime {
            self.core.mark_garbage();
        }
    }

    fn death_burst(&self) -> Option<DebrisBurst> {
        Some(DebrisBurst::new(self.core.pos, Vec2::ZERO, self.core.color, 6).with_radius(0.1, 0.4))
    }
}
