//! Cosmetic entities: fading debris and the drifting starfield

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::context::{DebrisBurst, SimContext};
use super::entity::{Entity, EntityCore, EntityKind, palette};
use crate::GameRng;
use crate::consts::*;

/// Outline vertex count for debris chunks
pub const DEBRIS_OUTLINE_POINTS: usize = 6;

/// A chunk thrown out by an explosion; fades and disappears
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debris {
    pub core: EntityCore,
    pub lifetime: f32,
    /// Alpha at spawn, faded linearly to zero over `lifetime`
    pub start_alpha: f32,
    pub outline: Vec<f32>,
}

impl Debris {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, color: [f32; 4]) -> Self {
        let mut core = EntityCore::new(pos, radius, radius, 1, color);
        core.vel = vel;
        Self {
            core,
            lifetime: DEBRIS_LIFETIME,
            start_alpha: color[3] * 0.5,
            outline: vec![1.0; DEBRIS_OUTLINE_POINTS],
        }
    }

    /// Build every piece of a burst with randomized scatter
    pub fn scatter(burst: &DebrisBurst, rng: &mut GameRng) -> Vec<Debris> {
        (0..burst.count)
            .map(|_| {
                let speed = rng.roll_float_in_range(burst.min_speed, burst.max_speed);
                let vel = burst.base_velocity + rng.roll_direction() * speed;
                let radius = rng.roll_float_in_range(burst.min_radius, burst.max_radius);
                let mut debris = Debris::new(burst.pos, vel, radius, burst.color);
                debris.core.orientation = rng.roll_float_in_range(0.0, 360.0);
                debris.core.angular_velocity = rng.roll_float_in_range(-200.0, 200.0);
                debris.outline = (0..DEBRIS_OUTLINE_POINTS)
                    .map(|_| rng.roll_float_in_range(0.5, 1.0))
                    .collect();
                debris
            })
            .collect()
    }

    /// Current opacity
    pub fn alpha(&self) -> f32 {
        let remaining = 1.0 - (self.core.age / self.lifetime).clamp(0.0, 1.0);
        self.start_alpha * remaining
    }
}

impl Entity for Debris {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Debris
    }

    fn update(&mut self, ctx: &mut SimContext<'_>) {
        if !self.is_alive() {
            return;
        }
        self.core.integrate(ctx.dt);
        self.core.color[3] = self.alpha();
        if self.core.age >= self.lifetime || self.core.is_off_screen() {
            self.core.mark_garbage();
        }
    }
}

/// Background star; drifts left for parallax and wraps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub core: EntityCore,
    pub brightness: f32,
}

impl Star {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, brightness: f32) -> Self {
        let mut color = palette::STAR;
        color[3] = brightness;
        let mut core = EntityCore::new(pos, radius, radius, 1, color);
        core.vel = vel;
        Self { core, brightness }
    }

    /// Anywhere in the world; nearer (bigger, brighter) stars drift faster
    pub fn spawn_random(rng: &mut GameRng) -> Self {
        let pos = rng.roll_point_in_box(Vec2::ZERO, Vec2::new(WORLD_SIZE_X, WORLD_SIZE_Y));
        let depth = rng.roll_float_zero_to_one();
        let drift = STAR_MIN_DRIFT + (STAR_MAX_DRIFT - STAR_MIN_DRIFT) * depth;
        Self::new(
            pos,
            Vec2::new(-drift, 0.0),
            0.1 + 0.2 * depth,
            0.3 + 0.7 * depth,
        )
    }
}

impl Entity for Star {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Star
    }

    fn update(&mut self, ctx: &mut SimContext<'_>) {
        self.core.integrate(ctx.dt);
        self.core.wrap_around_world();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::context::CommandQueue;

    #[test]
    fn test_scatter_makes_requested_count_near_base_velocity() {
        let mut rng = GameRng::new(3);
        let burst = DebrisBurst::new(Vec2::new(10.0, 10.0), Vec2::new(5.0, 0.0), palette::BEETLE, 8);
        let pieces = Debris::scatter(&burst, &mut rng);
        assert_eq!(pieces.len(), 8);
        for piece in &pieces {
            assert_eq!(piece.core.pos, burst.pos);
            let scatter = (piece.core.vel - burst.base_velocity).length();
            assert!(scatter >= burst.min_speed - 1e-3 && scatter <= burst.max_speed + 1e-3);
            assert!(piece.core.physics_radius >= burst.min_radius);
            assert!(piece.core.physics_radius <= burst.max_radius);
        }
    }

    #[test]
    fn test_debris_fades_then_expires() {
        let mut rng = GameRng::new(3);
        let mut commands = CommandQueue::new();
        let mut ctx = SimContext::new(0.5, &mut rng, &mut commands, &[]);

        let mut debris = Debris::new(Vec2::new(50.0, 50.0), Vec2::ZERO, 0.5, palette::ASTEROID);
        let initial = debris.alpha();
        debris.update(&mut ctx);
        assert!(debris.alpha() < initial);
        assert!(!debris.is_garbage());

        for _ in 0..3 {
            debris.update(&mut ctx);
        }
        assert!(debris.is_garbage());
        assert_eq!(debris.alpha(), 0.0);
    }

    #[test]
    fn test_debris_leaving_world_is_garbage() {
        let mut rng = GameRng::new(3);
        let mut commands = CommandQueue::new();
        let mut ctx = SimContext::new(0.1, &mut rng, &mut commands, &[]);

        let mut debris = Debris::new(Vec2::new(0.0, 50.0), Vec2::new(-50.0, 0.0), 0.5, palette::ASTEROID);
        debris.update(&mut ctx);
        assert!(debris.is_garbage());
    }

    #[test]
    fn test_star_wraps_instead_of_dying() {
        let mut rng = GameRng::new(3);
        let mut commands = CommandQueue::new();
        let mut ctx = SimContext::new(1.0, &mut rng, &mut commands, &[]);

        let mut star = Star::new(Vec2::new(0.0, 10.0), Vec2::new(-3.0, 0.0), 0.2, 1.0);
        star.update(&mut ctx);
        assert!(!star.is_garbage());
        assert!(star.core.pos.x > WORLD_SIZE_X);
    }
}
