//! Bullets and the fire patterns that create them

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::context::{DebrisBurst, SimContext};
use super::entity::{Entity, EntityCore, EntityKind, palette};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::direction_from_degrees;

/// Behavior variant, chosen by the firing ship's weapon power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BulletKind {
    #[default]
    Standard,
    Tri,
    Five,
    Burst,
    Sniper,
}

impl BulletKind {
    pub fn speed(&self) -> f32 {
        match self {
            BulletKind::Sniper => SNIPER_BULLET_SPEED,
            _ => BULLET_SPEED,
        }
    }

    pub fn range(&self) -> f32 {
        match self {
            BulletKind::Sniper => SNIPER_BULLET_RANGE,
            BulletKind::Burst => BURST_BULLET_RANGE,
            _ => BULLET_RANGE,
        }
    }

    /// Heading offsets (degrees) of every bullet in one trigger pull
    pub fn spread(&self) -> Vec<f32> {
        match self {
            BulletKind::Standard | BulletKind::Sniper => vec![0.0],
            BulletKind::Tri => vec![-TRI_BULLET_SPREAD, 0.0, TRI_BULLET_SPREAD],
            BulletKind::Five => vec![
                -2.0 * FIVE_BULLET_SPREAD,
                -FIVE_BULLET_SPREAD,
                0.0,
                FIVE_BULLET_SPREAD,
                2.0 * FIVE_BULLET_SPREAD,
            ],
            BulletKind::Burst => {
                let step = 360.0 / BURST_BULLET_COUNT as f32;
                (0..BURST_BULLET_COUNT).map(|i| i as f32 * step).collect()
            }
        }
    }
}

/// A projectile fired by a player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub core: EntityCore,
    /// Player id of the ship that fired it
    pub owner: u32,
    pub kind: BulletKind,
    pub spawn_pos: Vec2,
    pub max_range: f32,
    pub speed: f32,
}

impl Bullet {
    pub fn new(owner: u32, pos: Vec2, orientation: f32, kind: BulletKind) -> Self {
        let speed = kind.speed();
        let mut core = EntityCore::new(
            pos,
            BULLET_PHYSICS_RADIUS,
            BULLET_COSMETIC_RADIUS,
            1,
            palette::BULLET,
        );
        core.orientation = orientation;
        core.vel = direction_from_degrees(orientation) * speed;
        Self {
            core,
            owner,
            kind,
            spawn_pos: pos,
            max_range: kind.range(),
            speed,
        }
    }

    /// Every bullet produced by one trigger pull
    pub fn volley(owner: u32, pos: Vec2, orientation: f32, kind: BulletKind) -> Vec<Bullet> {
        kind.spread()
            .into_iter()
            .map(|offset| Bullet::new(owner, pos, orientation + offset, kind))
            .collect()
    }

    /// Distance covered since spawn
    pub fn traveled(&self) -> f32 {
        self.core.pos.distance(self.spawn_pos)
    }

    /// Quiet removal: out of range or off screen, no debris
    pub fn expire(&mut self) {
        self.core.mark_garbage();
    }
}

impl Entity for Bullet {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Bullet
    }

    fn update(&mut self, ctx: &mut SimContext<'_>) {
        if !self.is_alive() {
            return;
        }
        self.core.integrate(ctx.dt);
        if self.traveled() >= self.max_range || self.core.is_off_screen() {
            self.expire();
        }
    }

    /// Small backward spray at the impact point
    fn death_burst(&self) -> Option<DebrisBurst> {
        Some(
            DebrisBurst::new(
                self.core.pos,
                self.core.vel * IMPACT_SCATTER_FACTOR,
                self.core.color,
                3,
            )
            .with_radius(0.1, 0.3)
            .with_speed(1.0, 4.0),
        )
    }

    fn death_sound(&self) -> Option<SoundEffect> {
        Some(SoundEffect::Hit)
    }
}
