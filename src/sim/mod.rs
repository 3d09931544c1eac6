//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame delta supplied by the caller, scaled by the clock
//! - Seeded RNG only
//! - Stable iteration order (pool slot order)
//! - No rendering or platform dependencies (input and audio arrive as traits)

pub mod autopilot;
pub mod bullet;
pub mod camera;
pub mod clock;
pub mod collision;
pub mod context;
pub mod debris;
pub mod disc;
pub mod enemy;
pub mod entity;
pub mod pool;
pub mod power_up;
pub mod ship;
pub mod state;
pub mod tick;
pub mod wave;

pub use bullet::{Bullet, BulletKind};
pub use camera::Camera;
pub use clock::SimClock;
pub use collision::{resolve_bullet_hits, resolve_enemy_contacts, resolve_player_contacts};
pub use context::{CommandQueue, DebrisBurst, SimCommand, SimContext};
pub use debris::{Debris, Star};
pub use disc::{Disc, DiscContact, do_discs_overlap, push_disc_out_of_fixed_disc, push_discs_apart};
pub use enemy::{Asteroid, Beetle, Wasp};
pub use entity::{Entity, EntityCore, EntityKind};
pub use pool::Pool;
pub use power_up::{PowerUp, PowerUpKind};
pub use ship::{PlayerShip, ShipCommand, TimedEffect};
pub use state::{GamePhase, GameSnapshot, GameState, Pools};
pub use tick::tick;
pub use wave::{WaveEvent, WaveOrder, WavePhase, WavePlan, WaveSpawner};
