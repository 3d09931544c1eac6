//! Starship Swarm - a wave-based arcade shooter simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity pools, collisions, waves, frame tick)
//! - `renderer`: Vertex generation and the renderer service interface
//! - `platform`: Input service interface
//! - `audio`: Audio service interface and sound bank
//! - `settings`: Player-facing configuration

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod rng;
pub mod settings;
pub mod sim;

pub use rng::GameRng;
pub use settings::{GameMode, GameSettings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Default frame step for headless runs (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Longest frame the clock will accept (prevents tunneling after hitches)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Time scale while slow motion is held
    pub const SLOW_MOTION_SCALE: f32 = 0.1;

    /// World dimensions (world units)
    pub const WORLD_SIZE_X: f32 = 200.0;
    pub const WORLD_SIZE_Y: f32 = 100.0;
    pub const WORLD_CENTER: Vec2 = Vec2::new(WORLD_SIZE_X * 0.5, WORLD_SIZE_Y * 0.5);

    /// Pool capacities
    pub const MAX_PLAYERS: usize = 4;
    pub const MAX_BULLETS: usize = 100;
    pub const MAX_ASTEROIDS: usize = 50;
    pub const MAX_BEETLES: usize = 40;
    pub const MAX_WASPS: usize = 40;
    pub const MAX_DEBRIS: usize = 600;
    pub const MAX_POWER_UPS: usize = 10;
    pub const MAX_STARS: usize = 150;

    /// Player ship
    pub const PLAYER_SHIP_ACCELERATION: f32 = 30.0;
    pub const PLAYER_SHIP_TURN_SPEED: f32 = 300.0; // degrees per second
    pub const PLAYER_SHIP_MAX_SPEED: f32 = 40.0;
    pub const PLAYER_SHIP_PHYSICS_RADIUS: f32 = 1.75;
    pub const PLAYER_SHIP_COSMETIC_RADIUS: f32 = 2.25;
    pub const PLAYER_SHIELD_RADIUS: f32 = 2.75;
    pub const PLAYER_SHIP_HEALTH: i32 = 3;
    pub const PLAYER_STARTING_LIVES: u32 = 3;
    pub const PLAYER_RESPAWN_DELAY: f32 = 2.0;
    pub const PLAYER_RESPAWN_INVULNERABILITY: f32 = 3.0;
    pub const DAMAGE_FLASH_DURATION: f32 = 0.25;
    pub const SHIELD_DURATION: f32 = 6.0;
    pub const WEAPON_POWER_UP_DURATION: f32 = 10.0;
    /// Nose offset where bullets leave the ship
    pub const PLAYER_SHIP_GUN_OFFSET: f32 = 1.0;

    /// Bullets
    pub const BULLET_SPEED: f32 = 50.0;
    pub const BULLET_RANGE: f32 = 50.0;
    pub const BULLET_PHYSICS_RADIUS: f32 = 0.5;
    pub const BULLET_COSMETIC_RADIUS: f32 = 2.0;
    pub const SNIPER_BULLET_SPEED: f32 = 100.0;
    pub const SNIPER_BULLET_RANGE: f32 = 150.0;
    pub const BURST_BULLET_RANGE: f32 = 25.0;
    pub const BURST_BULLET_COUNT: u32 = 12;
    pub const TRI_BULLET_SPREAD: f32 = 15.0; // degrees
    pub const FIVE_BULLET_SPREAD: f32 = 10.0; // degrees between neighbours

    /// Asteroids
    pub const ASTEROID_SPEED: f32 = 10.0;
    pub const ASTEROID_PHYSICS_RADIUS: f32 = 1.6;
    pub const ASTEROID_COSMETIC_RADIUS: f32 = 2.0;
    pub const ASTEROID_HEALTH: i32 = 3;
    pub const ASTEROID_MAX_SPIN: f32 = 200.0; // degrees per second

    /// Beetles: slow, tough, steer straight at the nearest player
    pub const BEETLE_SPEED: f32 = 8.0;
    pub const BEETLE_PHYSICS_RADIUS: f32 = 2.5;
    pub const BEETLE_COSMETIC_RADIUS: f32 = 3.0;
    pub const BEETLE_HEALTH: i32 = 3;

    /// Wasps: fragile, accelerate toward the nearest player
    pub const WASP_ACCELERATION: f32 = 20.0;
    pub const WASP_MAX_SPEED: f32 = 16.0;
    pub const WASP_PHYSICS_RADIUS: f32 = 1.75;
    pub const WASP_COSMETIC_RADIUS: f32 = 2.25;
    pub const WASP_HEALTH: i32 = 2;

    /// Debris
    pub const DEBRIS_LIFETIME: f32 = 2.0;
    pub const DEBRIS_MIN_SCATTER_SPEED: f32 = 2.0;
    pub const DEBRIS_MAX_SCATTER_SPEED: f32 = 12.0;
    pub const DEBRIS_MIN_RADIUS: f32 = 0.2;
    pub const DEBRIS_MAX_RADIUS: f32 = 0.8;
    /// Bullet impact bursts scatter backwards along the bullet path
    pub const IMPACT_SCATTER_FACTOR: f32 = -0.1;

    /// Power-ups
    pub const POWER_UP_PHYSICS_RADIUS: f32 = 1.2;
    pub const POWER_UP_COSMETIC_RADIUS: f32 = 1.6;
    pub const POWER_UP_LIFETIME: f32 = 15.0;
    pub const POWER_UP_DROP_CHANCE: f32 = 0.15;
    pub const POWER_UP_DRIFT_SPEED: f32 = 4.0;

    /// Starfield
    pub const STAR_MIN_DRIFT: f32 = 0.5;
    pub const STAR_MAX_DRIFT: f32 = 3.0;

    /// Screen shake (world units of camera offset)
    pub const MAX_SCREEN_SHAKE: f32 = 2.0;
    pub const SCREEN_SHAKE_DECAY: f32 = 4.0; // per second
    pub const SHAKE_ON_PLAYER_HIT: f32 = 1.0;
    pub const SHAKE_ON_PLAYER_DEATH: f32 = 2.0;
    pub const SHAKE_ON_ENEMY_DEATH: f32 = 0.3;

    /// Randomized waves (multiplayer, past the scripted table)
    pub const RANDOM_WAVE_BASE_ENEMIES: u32 = 4;
    pub const RANDOM_WAVE_ENEMIES_PER_WAVE: u32 = 2;
}

/// Normalize an angle in degrees to [-180, 180)
#[inline]
pub fn normalize_degrees(mut degrees: f32) -> f32 {
    while degrees >= 180.0 {
        degrees -= 360.0;
    }
    while degrees < -180.0 {
        degrees += 360.0;
    }
    degrees
}

/// Unit vector pointing along an orientation in degrees
#[inline]
pub fn direction_from_degrees(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Convert polar (length, degrees) to cartesian
#[inline]
pub fn polar_degrees(length: f32, degrees: f32) -> Vec2 {
    direction_from_degrees(degrees) * length
}

/// Orientation of a vector in degrees (0 for the zero vector)
#[inline]
pub fn degrees_of(v: Vec2) -> f32 {
    if v.length_squared() < f32::EPSILON {
        return 0.0;
    }
    v.y.atan2(v.x).to_degrees()
}

/// Rotate `current` toward `goal` by at most `max_delta` degrees, the short way round
pub fn turn_toward_degrees(current: f32, goal: f32, max_delta: f32) -> f32 {
    let delta = normalize_degrees(goal - current);
    let clamped = delta.clamp(-max_delta, max_delta);
    normalize_degrees(current + clamped)
}

/// Stereo balance for a world x position: -1 at the left edge, +1 at the right edge
#[inline]
pub fn audio_balance_for_x(x: f32) -> f32 {
    ((x / consts::WORLD_SIZE_X) * 2.0 - 1.0).clamp(-1.0, 1.0)
}
