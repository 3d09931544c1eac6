//! Collision resolution between pools
//!
//! Runs after every entity has moved, as three ordered passes: bullets,
//! players, then enemy-vs-enemy. Nothing is inserted or removed here; deaths
//! only flag entities and queue their side effects, so a target killed early
//! in a pass is still in its slot (but not alive) for the rest of the frame.
//! Every test therefore checks `is_alive()` first.

use super::bullet::Bullet;
use super::context::{SimCommand, SimContext};
use super::disc::{do_discs_overlap, push_disc_out_of_fixed_disc, push_discs_apart};
use super::entity::{Entity, EntityCore};
use super::pool::Pool;
use super::ship::PlayerShip;
use super::state::Pools;

/// Physics discs of two entities touch
#[inline]
fn touching(a: &EntityCore, b: &EntityCore) -> bool {
    do_discs_overlap(a.pos, a.physics_radius, b.pos, b.physics_radius)
}

/// Whether `ship` touches `other`, using the shield disc when it is raised
#[inline]
fn ship_touching(ship: &PlayerShip, other: &EntityCore) -> bool {
    do_discs_overlap(
        ship.core.pos,
        ship.collision_radius(),
        other.pos,
        other.physics_radius,
    )
}

/// Bullets against asteroids, then beetles, then wasps.
///
/// A bullet keeps testing after its first hit, so one bullet can damage
/// several overlapping targets in the same frame. Its own death (and impact
/// burst) happens only once.
pub fn resolve_bullet_hits(pools: &mut Pools, ctx: &mut SimContext<'_>) {
    let Pools {
        bullets,
        asteroids,
        beetles,
        wasps,
        ..
    } = pools;

    for bullet in bullets.iter_mut() {
        if !bullet.is_alive() {
            continue;
        }
        bullet_vs_pool(bullet, asteroids, ctx);
        bullet_vs_pool(bullet, beetles, ctx);
        bullet_vs_pool(bullet, wasps, ctx);
    }
}

fn bullet_vs_pool<T: Entity, const N: usize>(
    bullet: &mut Bullet,
    targets: &mut Pool<T, N>,
    ctx: &mut SimContext<'_>,
) {
    for target in targets.iter_mut() {
        if target.is_alive() && touching(&bullet.core, target.core()) {
            target.lose_health(1, ctx);
            bullet.die(ctx);
        }
    }
}

/// Every live ship against asteroids, beetles, wasps, other ships, power-ups
/// and (when `friendly_fire`) bullets fired by other players
pub fn resolve_player_contacts(pools: &mut Pools, ctx: &mut SimContext<'_>, friendly_fire: bool) {
    let Pools {
        ships,
        bullets,
        asteroids,
        beetles,
        wasps,
        power_ups,
        ..
    } = pools;

    let slots = ships.occupied_indices();
    for (n, &slot) in slots.iter().enumerate() {
        if let Some(ship) = ships.get_mut(slot) {
            ship_vs_asteroids(ship, asteroids, ctx);
            ship_vs_swarm(ship, beetles, ctx);
            ship_vs_swarm(ship, wasps, ctx);
        }

        for &other in &slots[n + 1..] {
            if let Some((a, b)) = ships.pair_mut(slot, other) {
                ship_vs_ship(a, b);
            }
        }

        if let Some(ship) = ships.get_mut(slot) {
            ship_vs_power_ups(ship, power_ups, ctx);
            if friendly_fire {
                ship_vs_bullets(ship, bullets, ctx);
            }
        }
    }
}

/// Shielded ships smash asteroids. Unshielded ships take a hit, the asteroid
/// breaks, and a fresh one is sent in to replace it.
fn ship_vs_asteroids<const N: usize>(
    ship: &mut PlayerShip,
    asteroids: &mut Pool<super::enemy::Asteroid, N>,
    ctx: &mut SimContext<'_>,
) {
    for asteroid in asteroids.iter_mut() {
        if !ship.is_alive() {
            return;
        }
        if !asteroid.is_alive() || !ship_touching(ship, &asteroid.core) {
            continue;
        }
        if ship.is_shielded() {
            asteroid.die(ctx);
        } else {
            ship.lose_health(1, ctx);
            asteroid.die(ctx);
            ctx.push(SimCommand::SpawnAsteroid);
        }
    }
}

/// Beetles and wasps are shoved out of the ship's disc and survive the
/// contact; the ship takes damage unless shielded
fn ship_vs_swarm<T: Entity, const N: usize>(
    ship: &mut PlayerShip,
    enemies: &mut Pool<T, N>,
    ctx: &mut SimContext<'_>,
) {
    for enemy in enemies.iter_mut() {
        if !ship.is_alive() {
            return;
        }
        if !enemy.is_alive() || !ship_touching(ship, enemy.core()) {
            continue;
        }
        if !ship.is_shielded() {
            ship.lose_health(1, ctx);
        }
        let enemy_core = enemy.core_mut();
        push_disc_out_of_fixed_disc(
            ship.core.pos,
            ship.collision_radius(),
            &mut enemy_core.pos,
            enemy_core.physics_radius,
        );
    }
}

/// Ships bump each other. A raised shield holds its ground against an
/// unshielded ship; otherwise both give way equally.
fn ship_vs_ship(a: &mut PlayerShip, b: &mut PlayerShip) {
    if !a.is_alive() || !b.is_alive() {
        return;
    }
    let (radius_a, radius_b) = (a.collision_radius(), b.collision_radius());
    match (a.is_shielded(), b.is_shielded()) {
        (true, false) => {
            push_disc_out_of_fixed_disc(a.core.pos, radius_a, &mut b.core.pos, radius_b);
        }
        (false, true) => {
            push_disc_out_of_fixed_disc(b.core.pos, radius_b, &mut a.core.pos, radius_a);
        }
        _ => {
            push_discs_apart(&mut a.core.pos, radius_a, &mut b.core.pos, radius_b);
        }
    }
}

fn ship_vs_power_ups<const N: usize>(
    ship: &mut PlayerShip,
    power_ups: &mut Pool<super::power_up::PowerUp, N>,
    ctx: &mut SimContext<'_>,
) {
    for power_up in power_ups.iter_mut() {
        if !ship.is_alive() {
            return;
        }
        if power_up.is_alive() && ship_touching(ship, &power_up.core) {
            ship.pick_up(power_up.kind, ctx);
            power_up.consume(ctx);
        }
    }
}

/// Versus play: another player's bullet damages the ship and is destroyed
fn ship_vs_bullets<const N: usize>(
    ship: &mut PlayerShip,
    bullets: &mut Pool<Bullet, N>,
    ctx: &mut SimContext<'_>,
) {
    for bullet in bullets.iter_mut() {
        if !ship.is_alive() {
            return;
        }
        if bullet.is_alive() && bullet.owner != ship.player_id && ship_touching(ship, &bullet.core) {
            ship.lose_health(1, ctx);
            bullet.die(ctx);
        }
    }
}

/// Asteroids ram beetles and wasps (the asteroid breaks, the enemy takes a
/// hit), the swarm jostles without damage, and asteroids that collide
/// destroy each other
pub fn resolve_enemy_contacts(pools: &mut Pools, ctx: &mut SimContext<'_>) {
    let Pools {
        asteroids,
        beetles,
        wasps,
        ..
    } = pools;

    for asteroid in asteroids.iter_mut() {
        asteroid_vs_pool(asteroid, beetles, ctx);
        asteroid_vs_pool(asteroid, wasps, ctx);
    }

    beetles.for_each_pair(jostle);
    wasps.for_each_pair(jostle);
    for beetle in beetles.iter_mut() {
        for wasp in wasps.iter_mut() {
            jostle(beetle, wasp);
        }
    }

    asteroids.for_each_pair(|a, b| {
        if a.is_alive() && b.is_alive() && touching(&a.core, &b.core) {
            a.die(ctx);
            b.die(ctx);
        }
    });
}

fn asteroid_vs_pool<T: Entity, const N: usize>(
    asteroid: &mut super::enemy::Asteroid,
    enemies: &mut Pool<T, N>,
    ctx: &mut SimContext<'_>,
) {
    for enemy in enemies.iter_mut() {
        if !asteroid.is_alive() {
            return;
        }
        if enemy.is_alive() && touching(&asteroid.core, enemy.core()) {
            asteroid.die(ctx);
            enemy.lose_health(1, ctx);
        }
    }
}

/// Symmetric push-apart between two live enemies
fn jostle<A: Entity, B: Entity>(a: &mut A, b: &mut B) {
    if !a.is_alive() || !b.is_alive() {
        return;
    }
    let radius_a = a.core().physics_radius;
    let radius_b = b.core().physics_radius;
    push_discs_apart(
        &mut a.core_mut().pos,
        radius_a,
        &mut b.core_mut().pos,
        radius_b,
    );
}
