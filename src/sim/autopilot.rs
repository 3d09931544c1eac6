//! Demo pilot for headless runs and attract mode
//!
//! Turns toward the closest threat, closes to a standoff distance and fires
//! whenever the nose is roughly on target.

use glam::Vec2;

use super::entity::Entity;
use super::ship::{PlayerShip, ShipCommand};
use super::state::Pools;
use crate::consts::WORLD_CENTER;
use crate::{degrees_of, normalize_degrees};

/// Stay at least this far from the target before thrusting
const STANDOFF_DISTANCE: f32 = 30.0;
/// Fire only when the heading is within this many degrees of the target
const FIRE_CONE: f32 = 12.0;
/// Frames between trigger pulls
const FIRE_INTERVAL: u64 = 8;

/// Closest live beetle, wasp or asteroid to `from`; first found wins ties
fn nearest_threat(pools: &Pools, from: Vec2) -> Option<Vec2> {
    let beetles = pools.beetles.iter().filter(|e| e.is_alive()).map(|e| e.core.pos);
    let wasps = pools.wasps.iter().filter(|e| e.is_alive()).map(|e| e.core.pos);
    let asteroids = pools.asteroids.iter().filter(|e| e.is_alive()).map(|e| e.core.pos);
    beetles
        .chain(wasps)
        .chain(asteroids)
        .map(|pos| (from.distance_squared(pos), pos))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, pos)| pos)
}

/// What the demo pilot would do with `ship` this frame
pub fn autopilot_command(ship: &PlayerShip, pools: &Pools, frame: u64) -> ShipCommand {
    let from = ship.core.pos;
    let Some(target) = nearest_threat(pools, from) else {
        // Nothing to shoot: drift back toward the middle
        let home = WORLD_CENTER - from;
        return ShipCommand {
            aim: Some(degrees_of(home)),
            thrust: if home.length() > STANDOFF_DISTANCE { 0.3 } else { 0.0 },
            ..Default::default()
        };
    };

    let to_target = target - from;
    let aim = degrees_of(to_target);
    let facing_error = normalize_degrees(aim - ship.core.orientation).abs();
    ShipCommand {
        aim: Some(aim),
        turn: 0.0,
        thrust: if to_target.length() > STANDOFF_DISTANCE { 0.6 } else { 0.0 },
        fire: facing_error < FIRE_CONE && frame % FIRE_INTERVAL == 0,
    }
}
