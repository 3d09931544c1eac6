//! Shared entity state and the capability trait every variant implements
//!
//! The variant set is closed ([`EntityKind`]); each variant is its own struct
//! embedding an [`EntityCore`] and living in its own pool.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::context::{DebrisBurst, SimCommand, SimContext};
use crate::audio::SoundEffect;
use crate::consts::{WORLD_SIZE_X, WORLD_SIZE_Y};
use crate::direction_from_degrees;

/// Linear RGBA color
pub type Rgba = [f32; 4];

/// Base colors for each variant
pub mod palette {
    use super::Rgba;

    pub const PLAYER: [Rgba; 4] = [
        [0.40, 0.60, 1.00, 1.0],
        [1.00, 0.55, 0.20, 1.0],
        [0.40, 1.00, 0.45, 1.0],
        [1.00, 0.35, 0.85, 1.0],
    ];
    pub const DAMAGE_FLASH: Rgba = [1.0, 0.15, 0.15, 1.0];
    pub const SHIELD: Rgba = [0.3, 0.8, 1.0, 0.35];
    pub const BULLET: Rgba = [1.0, 1.0, 0.4, 1.0];
    pub const ASTEROID: Rgba = [0.55, 0.45, 0.40, 1.0];
    pub const BEETLE: Rgba = [0.30, 0.75, 0.25, 1.0];
    pub const WASP: Rgba = [1.0, 0.85, 0.10, 1.0];
    pub const STAR: Rgba = [0.9, 0.9, 1.0, 1.0];
    pub const POWER_UP: Rgba = [0.95, 0.30, 0.95, 1.0];
}

/// The closed set of entity variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    PlayerShip,
    Bullet,
    Asteroid,
    Beetle,
    Wasp,
    Debris,
    Star,
    PowerUp,
}

/// State every entity carries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityCore {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgba,
    pub health: i32,
    /// Degrees, counter-clockwise from +x
    pub orientation: f32,
    /// Degrees per second
    pub angular_velocity: f32,
    /// Collision radius
    pub physics_radius: f32,
    /// Visual radius, also used for off-screen tests
    pub cosmetic_radius: f32,
    /// Seconds since spawn
    pub age: f32,
    pub is_dead: bool,
    pub is_garbage: bool,
    pub draw_debug: bool,
}

impl EntityCore {
    pub fn new(pos: Vec2, physics_radius: f32, cosmetic_radius: f32, health: i32, color: Rgba) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            color,
            health,
            orientation: 0.0,
            angular_velocity: 0.0,
            physics_radius,
            cosmetic_radius,
            age: 0.0,
            is_dead: false,
            is_garbage: false,
            draw_debug: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    /// Unit vector along the current orientation
    pub fn forward(&self) -> Vec2 {
        direction_from_degrees(self.orientation)
    }

    /// Advance position, spin and age by `dt`
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.orientation += self.angular_velocity * dt;
        self.age += dt;
    }

    /// Entirely outside the world rectangle, cosmetic radius included
    pub fn is_off_screen(&self) -> bool {
        let r = self.cosmetic_radius;
        self.pos.x < -r
            || self.pos.x > WORLD_SIZE_X + r
            || self.pos.y < -r
            || self.pos.y > WORLD_SIZE_Y + r
    }

    /// Teleport to the opposite edge once fully off screen
    pub fn wrap_around_world(&mut self) {
        let r = self.cosmetic_radius;
        if self.pos.x < -r {
            self.pos.x = WORLD_SIZE_X + r;
        } else if self.pos.x > WORLD_SIZE_X + r {
            self.pos.x = -r;
        }
        if self.pos.y < -r {
            self.pos.y = WORLD_SIZE_Y + r;
        } else if self.pos.y > WORLD_SIZE_Y + r {
            self.pos.y = -r;
        }
    }

    /// Keep the physics disc inside the world, reflecting velocity off the walls.
    /// Returns true when a wall was hit.
    pub fn bounce_off_world_edges(&mut self) -> bool {
        let r = self.physics_radius;
        let mut bounced = false;
        if self.pos.x < r {
            self.pos.x = r;
            self.vel.x = self.vel.x.abs();
            bounced = true;
        } else if self.pos.x > WORLD_SIZE_X - r {
            self.pos.x = WORLD_SIZE_X - r;
            self.vel.x = -self.vel.x.abs();
            bounced = true;
        }
        if self.pos.y < r {
            self.pos.y = r;
            self.vel.y = self.vel.y.abs();
            bounced = true;
        } else if self.pos.y > WORLD_SIZE_Y - r {
            self.pos.y = WORLD_SIZE_Y - r;
            self.vel.y = -self.vel.y.abs();
            bounced = true;
        }
        bounced
    }

    /// Flag for removal at the next sweep
    pub fn mark_garbage(&mut self) {
        self.is_dead = true;
        self.is_garbage = true;
    }
}

/// Capabilities shared by every variant: Update, LoseHealth and Die.
/// Rendering lives in [`crate::renderer`] so the simulation stays headless.
pub trait Entity {
    fn core(&self) -> &EntityCore;
    fn core_mut(&mut self) -> &mut EntityCore;
    fn kind(&self) -> EntityKind;

    /// Per-frame motion and timers
    fn update(&mut self, ctx: &mut SimContext<'_>);

    /// Debris thrown out on death
    fn death_burst(&self) -> Option<DebrisBurst> {
        None
    }

    fn death_sound(&self) -> Option<SoundEffect> {
        None
    }

    /// Variant-specific side effects after the common death handling
    fn on_death(&mut self, _ctx: &mut SimContext<'_>) {}

    fn is_alive(&self) -> bool {
        self.core().is_alive()
    }

    fn is_garbage(&self) -> bool {
        self.core().is_garbage
    }

    fn lose_health(&mut self, amount: i32, ctx: &mut SimContext<'_>) {
        if !self.is_alive() {
            return;
        }
        let core = self.core_mut();
        core.health -= amount;
        if core.health <= 0 {
            self.die(ctx);
        }
    }

    /// Mark dead and garbage, then emit the death burst and sound exactly once
    fn die(&mut self, ctx: &mut SimContext<'_>) {
        if !self.is_alive() {
            return;
        }
        self.core_mut().mark_garbage();
        if let Some(burst) = self.death_burst() {
            ctx.push(SimCommand::SpawnDebris(burst));
        }
        if let Some(sound) = self.death_sound() {
            ctx.play_sound(sound, self.core().pos);
        }
        self.on_death(ctx);
    }
}
