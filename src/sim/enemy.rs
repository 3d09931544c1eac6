//! Hostile entities: drifting asteroids and player-seeking beetles and wasps

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::context::{DebrisBurst, SimCommand, SimContext};
use super::entity::{Entity, EntityCore, EntityKind, palette};
use crate::GameRng;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::degrees_of;

/// Outline vertex count for asteroid shapes
pub const ASTEROID_OUTLINE_POINTS: usize = 16;

/// Point just outside a random world edge, `margin` beyond the boundary
pub fn random_edge_position(rng: &mut GameRng, margin: f32) -> Vec2 {
    match rng.roll_int_in_range(0, 3) {
        0 => Vec2::new(-margin, rng.roll_float_in_range(0.0, WORLD_SIZE_Y)),
        1 => Vec2::new(WORLD_SIZE_X + margin, rng.roll_float_in_range(0.0, WORLD_SIZE_Y)),
        2 => Vec2::new(rng.roll_float_in_range(0.0, WORLD_SIZE_X), -margin),
        _ => Vec2::new(rng.roll_float_in_range(0.0, WORLD_SIZE_X), WORLD_SIZE_Y + margin),
    }
}

/// Drifts in a straight line, spinning, wrapping around the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub core: EntityCore,
    /// Radius scale per outline vertex, for a lumpy silhouette
    pub outline: Vec<f32>,
}

impl Asteroid {
    pub fn new(pos: Vec2, vel: Vec2, spin: f32) -> Self {
        let mut core = EntityCore::new(
            pos,
            ASTEROID_PHYSICS_RADIUS,
            ASTEROID_COSMETIC_RADIUS,
            ASTEROID_HEALTH,
            palette::ASTEROID,
        );
        core.vel = vel;
        core.angular_velocity = spin;
        Self {
            core,
            outline: vec![1.0; ASTEROID_OUTLINE_POINTS],
        }
    }

    /// Enter from a random edge, heading somewhere through the middle of the world
    pub fn spawn_random(rng: &mut GameRng) -> Self {
        let pos = random_edge_position(rng, ASTEROID_COSMETIC_RADIUS);
        let aim = rng.roll_point_in_box(WORLD_CENTER * 0.5, WORLD_CENTER * 1.5);
        let vel = (aim - pos).normalize_or_zero() * ASTEROID_SPEED;
        let spin = rng.roll_float_in_range(-ASTEROID_MAX_SPIN, ASTEROID_MAX_SPIN);
        let mut asteroid = Self::new(pos, vel, spin);
        asteroid.core.orientation = rng.roll_float_in_range(0.0, 360.0);
        asteroid.outline = (0..ASTEROID_OUTLINE_POINTS)
            .map(|_| rng.roll_float_in_range(0.75, 1.0))
            .collect();
        asteroid
    }
}

impl Entity for Asteroid {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Asteroid
    }

    fn update(&mut self, ctx: &mut SimContext<'_>) {
        if !self.is_alive() {
            return;
        }
        self.core.integrate(ctx.dt);
        self.core.wrap_around_world();
    }

    fn death_burst(&self) -> Option<DebrisBurst> {
        Some(
            DebrisBurst::new(self.core.pos, self.core.vel, self.core.color, 10)
                .with_radius(0.3, 1.0),
        )
    }

    fn death_sound(&self) -> Option<SoundEffect> {
        Some(SoundEffect::EnemyExplode)
    }

    fn on_death(&mut self, ctx: &mut SimContext<'_>) {
        ctx.add_screen_shake(SHAKE_ON_ENEMY_DEATH);
    }
}

/// Beetle and wasp deaths may leave a power-up behind
fn roll_power_up_drop(pos: Vec2, ctx: &mut SimContext<'_>) {
    if ctx.rng.roll_percent_chance(POWER_UP_DROP_CHANCE) {
        ctx.push(SimCommand::SpawnPowerUp { pos });
    }
}

/// Slow, tough, steers straight at the nearest living player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beetle {
    pub core: EntityCore,
}

impl Beetle {
    pub fn new(pos: Vec2) -> Self {
        Self {
            core: EntityCore::new(
                pos,
                BEETLE_PHYSICS_RADIUS,
                BEETLE_COSMETIC_RADIUS,
                BEETLE_HEALTH,
                palette::BEETLE,
            ),
        }
    }

    pub fn spawn_random(rng: &mut GameRng) -> Self {
        Self::new(random_edge_position(rng, BEETLE_COSMETIC_RADIUS))
    }
}

impl Entity for Beetle {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Beetle
    }

    fn update(&mut self, ctx: &mut SimContext<'_>) {
        if !self.is_alive() {
            return;
        }
        if let Some(target) = ctx.nearest_target(self.core.pos) {
            let to_target = (target - self.core.pos).normalize_or_zero();
            if to_target != Vec2::ZERO {
                self.core.orientation = degrees_of(to_target);
                self.core.vel = to_target * BEETLE_SPEED;
            }
        }
        self.core.integrate(ctx.dt);
        self.core.wrap_around_world();
    }

    fn death_burst(&self) -> Option<DebrisBurst> {
        Some(DebrisBurst::new(self.core.pos, self.core.vel, self.core.color, 12))
    }

    fn death_sound(&self) -> Option<SoundEffect> {
        Some(SoundEffect::EnemyExplode)
    }

    fn on_death(&mut self, ctx: &mut SimContext<'_>) {
        ctx.add_screen_shake(SHAKE_ON_ENEMY_DEATH);
        roll_power_up_drop(self.core.pos, ctx);
    }
}

/// Fragile and fast, accelerates toward the nearest living player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wasp {
    pub core: EntityCore,
}

impl Wasp {
    pub fn new(pos: Vec2) -> Self {
        Self {
            core: EntityCore::new(
                pos,
                WASP_PHYSICS_RADIUS,
                WASP_COSMETIC_RADIUS,
                WASP_HEALTH,
                palette::WASP,
            ),
        }
    }

    pub fn spawn_random(rng: &mut GameRng) -> Self {
        Self::new(random_edge_position(rng, WASP_COSMETIC_RADIUS))
    }
}

impl Entity for Wasp {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Wasp
    }

    fn update(&mut self, ctx: &mut SimContext<'_>) {
        if !self.is_alive() {
            return;
        }
        if let Some(target) = ctx.nearest_target(self.core.pos) {
            let to_target = (target - self.core.pos).normalize_or_zero();
            self.core.vel += to_target * WASP_ACCELERATION * ctx.dt;
            self.core.vel = self.core.vel.clamp_length_max(WASP_MAX_SPEED);
        }
        if self.core.vel != Vec2::ZERO {
            self.core.orientation = degrees_of(self.core.vel);
        }
        self.core.integrate(ctx.dt);
        self.core.wrap_around_world();
    }

    fn death_burst(&self) -> Option<DebrisBurst> {
        Some(DebrisBurst::new(self.core.pos, self.core.vel, self.core.color, 10))
    }

    fn death_sound(&self) -> Option<SoundEffect> {
        Some(SoundEffect::EnemyExplode)
    }

    fn on_death(&mut self, ctx: &mut SimContext<'_>) {
        ctx.add_screen_shake(SHAKE_ON_ENEMY_DEATH);
        roll_power_up_drop(self.core.pos, ctx);
    }
}
