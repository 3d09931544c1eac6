//! Scene assembly: turns the game state into batched draw calls

use glam::Vec2;

use super::shapes::{arrowhead, circle, lumpy_polygon, quad, ring};
use super::vertex::{Vertex, colors};
use super::{BlendMode, RasterizerMode, Renderer};
use crate::consts::*;
use crate::sim::entity::palette;
use crate::sim::{Entity, GameState, PlayerShip, PowerUpKind};

const CIRCLE_SEGMENTS: u32 = 16;
const SMALL_CIRCLE_SEGMENTS: u32 = 6;
const DEBUG_RING_THICKNESS: f32 = 0.1;
/// Invulnerable ships blink this many times per second
const BLINK_RATE: f32 = 10.0;

const HUD_ROW_HEIGHT: f32 = 4.0;
const HUD_MARGIN: f32 = 2.0;
const HUD_LIFE_SPACING: f32 = 3.0;

fn with_alpha(mut color: [f32; 4], alpha: f32) -> [f32; 4] {
    color[3] *= alpha;
    color
}

fn power_up_color(kind: PowerUpKind) -> [f32; 4] {
    match kind {
        PowerUpKind::Shield => colors::POWER_UP_SHIELD,
        PowerUpKind::Health => colors::POWER_UP_HEALTH,
        _ => colors::POWER_UP_WEAPON,
    }
}

/// Hull and shield for one ship; nothing while dead or in a blink-off frame
fn push_ship(out: &mut Vec<Vertex>, ship: &PlayerShip) {
    if !ship.is_alive() {
        return;
    }
    let invulnerability = &ship.respawn_invulnerability;
    if invulnerability.active && (invulnerability.age * BLINK_RATE) as u32 % 2 == 1 {
        return;
    }
    let core = &ship.core;
    arrowhead(out, core.pos, core.cosmetic_radius, core.orientation, ship.display_color());
    if ship.thrust > 0.0 {
        let flame = core.pos - core.forward() * core.cosmetic_radius * (0.6 + 0.4 * ship.thrust);
        circle(out, flame, 0.4, [1.0, 0.5, 0.1, 0.8], SMALL_CIRCLE_SEGMENTS);
    }
    if ship.is_shielded() {
        circle(out, core.pos, PLAYER_SHIELD_RADIUS, palette::SHIELD, CIRCLE_SEGMENTS);
    }
}

fn push_debug_rings<'a, T: Entity + 'a>(
    out: &mut Vec<Vertex>,
    entities: impl Iterator<Item = &'a T>,
    all: bool,
) {
    for entity in entities {
        let core = entity.core();
        if !(all || core.draw_debug) || !entity.is_alive() {
            continue;
        }
        ring(out, core.pos, core.physics_radius, DEBUG_RING_THICKNESS, colors::DEBUG_PHYSICS, CIRCLE_SEGMENTS);
        ring(out, core.pos, core.cosmetic_radius, DEBUG_RING_THICKNESS, colors::DEBUG_COSMETIC, CIRCLE_SEGMENTS);
    }
}

/// Lives and health per connected player, top-left, unaffected by shake
fn push_hud(out: &mut Vec<Vertex>, state: &GameState) {
    for (row, ship) in state.pools.ships.iter().enumerate() {
        let y = WORLD_SIZE_Y - HUD_MARGIN - HUD_ROW_HEIGHT * (row as f32 + 0.5);
        let width = HUD_LIFE_SPACING * (PLAYER_STARTING_LIVES + PLAYER_SHIP_HEALTH as u32 + 1) as f32;
        quad(
            out,
            Vec2::new(HUD_MARGIN * 0.5, y - HUD_ROW_HEIGHT * 0.5),
            Vec2::new(HUD_MARGIN + width, y + HUD_ROW_HEIGHT * 0.5),
            colors::HUD_PANEL,
        );

        let color = palette::PLAYER[ship.player_id as usize % palette::PLAYER.len()];
        let mut x = HUD_MARGIN + HUD_LIFE_SPACING * 0.5;
        for _ in 0..ship.lives {
            arrowhead(out, Vec2::new(x, y), 1.2, 90.0, color);
            x += HUD_LIFE_SPACING;
        }
        x += HUD_LIFE_SPACING * 0.5;
        if ship.is_alive() {
            for _ in 0..ship.core.health.max(0) {
                circle(out, Vec2::new(x, y), 0.6, colors::HUD_HEALTH, SMALL_CIRCLE_SEGMENTS);
                x += HUD_LIFE_SPACING * 0.6;
            }
        }
    }
}

/// Draw one frame of `state` through `renderer`
pub fn render_game(state: &GameState, renderer: &mut dyn Renderer) {
    let pools = &state.pools;
    let (min, max) = state.camera.view_bounds();
    let mut batch: Vec<Vertex> = Vec::with_capacity(4096);

    renderer.set_camera(min, max);
    renderer.bind_texture(None);
    renderer.set_rasterizer_mode(RasterizerMode::SolidCullNone);

    renderer.set_blend_mode(BlendMode::Alpha);
    quad(&mut batch, min, max, colors::BACKGROUND);
    renderer.draw_vertex_array(&batch);

    // Glowing layers
    renderer.set_blend_mode(BlendMode::Additive);
    batch.clear();
    for star in pools.stars.iter() {
        circle(&mut batch, star.core.pos, star.core.cosmetic_radius, star.core.color, SMALL_CIRCLE_SEGMENTS);
    }
    renderer.draw_vertex_array(&batch);

    renderer.set_blend_mode(BlendMode::Alpha);
    batch.clear();
    for debris in pools.debris.iter().filter(|d| d.is_alive()) {
        let color = with_alpha(debris.core.color, debris.alpha());
        lumpy_polygon(&mut batch, debris.core.pos, debris.core.cosmetic_radius, debris.core.orientation, &debris.outline, color);
    }
    for power_up in pools.power_ups.iter().filter(|p| p.is_alive()) {
        let core = &power_up.core;
        let color = power_up_color(power_up.kind);
        ring(&mut batch, core.pos, core.cosmetic_radius, 0.3, color, CIRCLE_SEGMENTS);
        circle(&mut batch, core.pos, core.physics_radius * 0.6, palette::POWER_UP, CIRCLE_SEGMENTS);
    }
    for asteroid in pools.asteroids.iter().filter(|a| a.is_alive()) {
        let core = &asteroid.core;
        lumpy_polygon(&mut batch, core.pos, core.cosmetic_radius, core.orientation, &asteroid.outline, core.color);
    }
    for beetle in pools.beetles.iter().filter(|b| b.is_alive()) {
        let core = &beetle.core;
        circle(&mut batch, core.pos, core.cosmetic_radius, core.color, CIRCLE_SEGMENTS);
        let head = core.pos + core.forward() * core.cosmetic_radius * 0.8;
        circle(&mut batch, head, core.cosmetic_radius * 0.4, with_alpha(core.color, 0.7), SMALL_CIRCLE_SEGMENTS);
    }
    for wasp in pools.wasps.iter().filter(|w| w.is_alive()) {
        let core = &wasp.core;
        arrowhead(&mut batch, core.pos, core.cosmetic_radius, core.orientation, core.color);
    }
    for ship in pools.ships.iter() {
        push_ship(&mut batch, ship);
    }
    renderer.draw_vertex_array(&batch);

    renderer.set_blend_mode(BlendMode::Additive);
    batch.clear();
    for bullet in pools.bullets.iter().filter(|b| b.is_alive()) {
        let core = &bullet.core;
        circle(&mut batch, core.pos, core.cosmetic_radius, with_alpha(core.color, 0.25), SMALL_CIRCLE_SEGMENTS);
        circle(&mut batch, core.pos, core.physics_radius, core.color, SMALL_CIRCLE_SEGMENTS);
    }
    renderer.draw_vertex_array(&batch);

    renderer.set_blend_mode(BlendMode::Alpha);
    batch.clear();
    let all = state.debug_draw;
    push_debug_rings(&mut batch, pools.ships.iter(), all);
    push_debug_rings(&mut batch, pools.bullets.iter(), all);
    push_debug_rings(&mut batch, pools.asteroids.iter(), all);
    push_debug_rings(&mut batch, pools.beetles.iter(), all);
    push_debug_rings(&mut batch, pools.wasps.iter(), all);
    push_debug_rings(&mut batch, pools.power_ups.iter(), all);
    if !batch.is_empty() {
        renderer.set_rasterizer_mode(RasterizerMode::WireframeCullNone);
        renderer.draw_vertex_array(&batch);
        renderer.set_rasterizer_mode(RasterizerMode::SolidCullNone);
    }

    batch.clear();
    renderer.set_camera(Vec2::ZERO, Vec2::new(WORLD_SIZE_X, WORLD_SIZE_Y));
    push_hud(&mut batch, state);
    renderer.draw_vertex_array(&batch);
}
