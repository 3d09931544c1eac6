//! Frame tick
//!
//! One call advances the game by one frame in a fixed order: global keys,
//! ship input, `Update` on every pool, the three collision passes, garbage
//! sweep, wave poll, camera easing, then audio. Requests queued by entities
//! are flushed after input, after update, and after the sweep, so no pool
//! grows while it is being walked.

use super::autopilot::autopilot_command;
use super::collision::{resolve_bullet_hits, resolve_enemy_contacts, resolve_player_contacts};
use super::context::{SimCommand, SimContext};
use super::debris::Debris;
use super::enemy::{Asteroid, Beetle, Wasp};
use super::entity::Entity;
use super::power_up::PowerUp;
use super::ship::ShipCommand;
use super::state::{GamePhase, GameState};
use super::wave::{WaveEvent, WavePlan};
use crate::audio::{AudioBackend, PlaybackParams, SoundEffect};
use crate::consts::*;
use crate::platform::{Button, InputSource, Key};
use crate::{GameMode, audio_balance_for_x, degrees_of};

/// Stick deflection below this is ignored
const STICK_DEAD_ZONE: f32 = 0.25;

/// Advance the game by one frame of `real_dt` wall-clock seconds
pub fn tick(
    state: &mut GameState,
    input: &dyn InputSource,
    audio: &mut dyn AudioBackend,
    real_dt: f32,
) {
    handle_global_input(state, input, audio);

    // Paused frames skip the simulation entirely
    let dt = state.clock.advance(real_dt);
    if dt > 0.0 {
        step(state, input, audio, dt);
    }

    update_engine_audio(state, audio);
}

fn step(state: &mut GameState, input: &dyn InputSource, audio: &mut dyn AudioBackend, dt: f32) {
    let targets = state.pools.ship_targets();

    // 1. Input
    let ship_commands = gather_ship_commands(state, input);
    {
        let mut ctx = SimContext::new(dt, &mut state.rng, &mut state.commands, &targets);
        for (slot, command) in &ship_commands {
            if let Some(ship) = state.pools.ships.get_mut(*slot) {
                ship.apply_command(command, &mut ctx);
            }
        }
    }
    flush_commands(state, audio);

    // 2. Motion and timers
    {
        let mut ctx = SimContext::new(dt, &mut state.rng, &mut state.commands, &targets);
        state.pools.update_all(&mut ctx);
    }
    flush_commands(state, audio);

    // 3. Collisions
    {
        let friendly_fire = state.settings.mode.friendly_fire();
        let mut ctx = SimContext::new(dt, &mut state.rng, &mut state.commands, &targets);
        resolve_bullet_hits(&mut state.pools, &mut ctx);
        resolve_player_contacts(&mut state.pools, &mut ctx, friendly_fire);
        resolve_enemy_contacts(&mut state.pools, &mut ctx);
    }

    // 4. Garbage, then the debris and drops the dead asked for
    state.pools.sweep_all();
    flush_commands(state, audio);

    // 5. Waves and end of game
    if state.phase == GamePhase::Playing {
        poll_waves(state, audio);
        check_game_over(state, audio);
    }

    // 6. Camera
    let shake_enabled = state.settings.effective_screen_shake();
    state.camera.update(dt, shake_enabled);
}

/// Pause, slow motion, stepping, debug draw, joining and restarting
fn handle_global_input(state: &mut GameState, input: &dyn InputSource, audio: &mut dyn AudioBackend) {
    let controllers: Vec<_> = (0..MAX_PLAYERS).map(|i| input.controller(i)).collect();

    let pause_pressed = input.was_key_just_pressed(Key::P)
        || input.was_key_just_pressed(Key::Escape)
        || controllers
            .iter()
            .any(|c| c.connected && c.was_button_just_pressed(Button::Back));
    if pause_pressed {
        state.clock.toggle_pause();
    }
    state.clock.set_slow_motion(input.is_key_down(Key::T));
    if input.was_key_just_pressed(Key::O) {
        state.clock.request_step();
    }
    if input.was_key_just_pressed(Key::F1) {
        state.debug_draw = !state.debug_draw;
        log::debug!("Debug draw {}", if state.debug_draw { "on" } else { "off" });
    }

    let mut restart = input.was_key_just_pressed(Key::Enter) && state.is_over();
    for (index, controller) in controllers.iter().enumerate() {
        if !controller.connected || !controller.was_button_just_pressed(Button::Start) {
            continue;
        }
        if state.is_over() {
            restart = true;
        } else if state.settings.is_multiplayer() {
            state.connect_player(index as u32);
        }
    }
    if restart {
        state.restart(audio);
    }
}

/// One command per occupied ship slot, from the autopilot or the player's devices
fn gather_ship_commands(state: &GameState, input: &dyn InputSource) -> Vec<(usize, ShipCommand)> {
    let frame = state.clock.frames;
    state
        .pools
        .ships
        .iter_indexed()
        .map(|(slot, ship)| {
            let command = if state.settings.autopilot {
                autopilot_command(ship, &state.pools, frame)
            } else {
                read_ship_command(ship.player_id, input)
            };
            (slot, command)
        })
        .collect()
}

/// Keyboard drives player 0; controller `n` drives player `n`
fn read_ship_command(player_id: u32, input: &dyn InputSource) -> ShipCommand {
    let mut command = ShipCommand::default();
    if player_id == 0 {
        if input.is_key_down(Key::Up) || input.is_key_down(Key::W) {
            command.thrust = 1.0;
        }
        if input.is_key_down(Key::Left) || input.is_key_down(Key::A) {
            command.turn += 1.0;
        }
        if input.is_key_down(Key::Right) || input.is_key_down(Key::D) {
            command.turn -= 1.0;
        }
        command.fire |= input.was_key_just_pressed(Key::Space);
    }

    let controller = input.controller(player_id as usize);
    if controller.connected {
        let magnitude = controller.stick_magnitude();
        if magnitude > STICK_DEAD_ZONE {
            command.aim = Some(degrees_of(controller.left_stick));
            command.thrust = command.thrust.max(magnitude);
        }
        command.fire |= controller.was_button_just_pressed(Button::A);
    }
    command
}

/// Apply every queued request. Full pools drop spawns silently.
fn flush_commands(state: &mut GameState, audio: &mut dyn AudioBackend) {
    let commands = std::mem::take(&mut state.commands);
    for command in commands {
        match command {
            SimCommand::SpawnBullet(bullet) => {
                state.pools.bullets.try_insert(bullet);
            }
            SimCommand::SpawnDebris(burst) => {
                for piece in Debris::scatter(&burst, &mut state.rng) {
                    if state.pools.debris.try_insert(piece).is_none() {
                        break;
                    }
                }
            }
            SimCommand::SpawnPowerUp { pos } => {
                let power_up = PowerUp::spawn_random(pos, &mut state.rng);
                state.pools.power_ups.try_insert(power_up);
            }
            SimCommand::SpawnAsteroid => {
                let asteroid = Asteroid::spawn_random(&mut state.rng);
                state.pools.asteroids.try_insert(asteroid);
            }
            SimCommand::PlaySound { effect, balance } => play_sound(state, audio, effect, balance),
            SimCommand::AddScreenShake(amount) => state.camera.add_shake(amount),
        }
    }
}

fn play_sound(state: &GameState, audio: &mut dyn AudioBackend, effect: SoundEffect, balance: f32) {
    let Some(sound) = state.sounds.id(effect) else {
        return;
    };
    let volume = effect.base_volume() * state.settings.effective_sfx_volume();
    audio.start_sound(
        sound,
        PlaybackParams {
            volume,
            balance,
            ..Default::default()
        },
    );
}

fn poll_waves(state: &mut GameState, audio: &mut dyn AudioBackend) {
    let live_enemies = state.pools.live_enemy_count();
    let live_asteroids = state.pools.live_asteroid_count();
    let multiplayer = state.settings.is_multiplayer();

    match state
        .waves
        .poll(live_enemies, live_asteroids, multiplayer, &mut state.rng)
    {
        Some(WaveEvent::Started(order)) => {
            let spawned = spawn_wave(state, &order.plan);
            state.waves.mark_active(spawned);
            play_sound(state, audio, SoundEffect::WaveStart, 0.0);
        }
        Some(WaveEvent::Victory) => {
            state.phase = GamePhase::Victory;
            log::info!("Victory after {} waves", state.waves.wave_number());
            play_sound(state, audio, SoundEffect::Victory, 0.0);
        }
        None => {}
    }
}

/// Insert a wave's enemies at the world edges; returns the beetles and wasps that fit
fn spawn_wave(state: &mut GameState, plan: &WavePlan) -> u32 {
    let mut spawned = 0;
    for _ in 0..plan.beetles {
        let beetle = Beetle::spawn_random(&mut state.rng);
        if state.pools.beetles.try_insert(beetle).is_some() {
            spawned += 1;
        }
    }
    for _ in 0..plan.wasps {
        let wasp = Wasp::spawn_random(&mut state.rng);
        if state.pools.wasps.try_insert(wasp).is_some() {
            spawned += 1;
        }
    }
    for _ in 0..plan.asteroids {
        let asteroid = Asteroid::spawn_random(&mut state.rng);
        state.pools.asteroids.try_insert(asteroid);
    }
    spawned
}

/// Defeat when nobody can respawn; in versus, the last player with lives wins
fn check_game_over(state: &mut GameState, audio: &mut dyn AudioBackend) {
    if state.phase != GamePhase::Playing {
        return;
    }
    if state.all_players_out() {
        state.phase = GamePhase::Defeat;
        log::info!("All players out of lives on wave {}", state.waves.wave_number());
        play_sound(state, audio, SoundEffect::GameOver, 0.0);
        return;
    }
    if state.settings.mode == GameMode::Versus && state.pools.ships.len() > 1 {
        let mut standing = state.pools.ships.iter().filter(|s| !s.is_out());
        if let (Some(winner), None) = (standing.next(), standing.next()) {
            log::info!("Player {} wins the match", winner.player_id);
            state.phase = GamePhase::Victory;
            play_sound(state, audio, SoundEffect::Victory, 0.0);
        }
    }
}

/// Keep one looping engine sound per ship: volume follows thrust, balance
/// follows screen position, silent while paused or dead
fn update_engine_audio(state: &mut GameState, audio: &mut dyn AudioBackend) {
    let Some(engine) = state.sounds.id(SoundEffect::Engine) else {
        return;
    };
    let base_volume = SoundEffect::Engine.base_volume() * state.settings.effective_sfx_volume();
    let paused = state.clock.paused;

    for ship in state.pools.ships.iter_mut() {
        let playback = *ship.engine_playback.get_or_insert_with(|| {
            audio.start_sound(
                engine,
                PlaybackParams {
                    looped: true,
                    volume: 0.0,
                    ..Default::default()
                },
            )
        });
        let volume = if paused || !ship.is_alive() {
            0.0
        } else {
            base_volume * ship.thrust
        };
        audio.set_sound_playback_volume(playback, volume);
        audio.set_sound_playback_balance(playback, audio_balance_for_x(ship.core.pos.x));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameSettings;
    use crate::audio::NullAudio;
    use crate::platform::{ControllerState, InputState};
    use crate::sim::bullet::{Bullet, BulletKind};
    use glam::Vec2;

    fn new_game(mode: GameMode, players: u32, seed: u64) -> (GameState, NullAudio) {
        let mut audio = NullAudio::new();
        let mut settings = GameSettings::for_mode(mode, players);
        settings.seed = Some(seed);
        let state = GameState::new(settings, &mut audio);
        (state, audio)
    }

    fn kill_all_enemies(state: &mut GameState) {
        for beetle in state.pools.beetles.iter_mut() {
            beetle.core.mark_garbage();
        }
        for wasp in state.pools.wasps.iter_mut() {
            wasp.core.mark_garbage();
        }
    }

    #[test]
    fn test_first_tick_spawns_wave_one() {
        let (mut state, mut audio) = new_game(GameMode::SinglePlayer, 1, 7);
        let input = InputState::new();
        tick(&mut state, &input, &mut audio, FRAME_DT);

        assert_eq!(state.waves.wave_number(), 1);
        assert_eq!(state.pools.beetles.len(), 1);
        assert_eq!(state.pools.wasps.len(), 0);
        assert_eq!(state.pools.asteroids.len(), 4);
        assert_eq!(audio.starts_of(SoundEffect::WaveStart.asset_path()), 1);
    }

    #[test]
    fn test_killing_last_beetle_starts_wave_two() {
        let (mut state, mut audio) = new_game(GameMode::SinglePlayer, 1, 7);
        let input = InputState::new();
        tick(&mut state, &input, &mut audio, FRAME_DT);
        tick(&mut state, &input, &mut audio, FRAME_DT);
        assert_eq!(state.waves.wave_number(), 1, "asteroids alone never clear a wave");

        kill_all_enemies(&mut state);
        tick(&mut state, &input, &mut audio, FRAME_DT);

        assert_eq!(state.waves.wave_number(), 2);
        assert_eq!(state.pools.beetles.len(), 2);
        assert_eq!(state.pools.wasps.len(), 0);
        assert!(state.pools.asteroids.len() > 1, "leftover asteroids stay in play");
    }

    #[test]
    fn test_bullet_kill_clears_wave_in_the_same_tick() {
        let (mut state, mut audio) = new_game(GameMode::SinglePlayer, 1, 7);
        let input = InputState::new();
        tick(&mut state, &input, &mut audio, FRAME_DT);
        assert_eq!(state.pools.beetles.len(), 1);

        let target = Vec2::new(150.0, 80.0);
        for beetle in state.pools.beetles.iter_mut() {
            beetle.core.pos = target;
            beetle.core.vel = Vec2::ZERO;
            beetle.core.health = 1;
        }
        state
            .pools
            .bullets
            .try_insert(Bullet::new(0, target, 0.0, BulletKind::Standard));

        tick(&mut state, &input, &mut audio, FRAME_DT);

        assert_eq!(state.waves.wave_number(), 2);
        assert_eq!(state.pools.beetles.len(), 2, "the dead beetle was swept before wave 2 spawned");
        assert!(state.pools.beetles.iter().all(|b| b.is_alive()));
        assert!(state.pools.bullets.is_empty());
        assert!(audio.starts_of(SoundEffect::EnemyExplode.asset_path()) >= 1);
    }

    #[test]
    fn test_single_player_victory_after_last_wave() {
        let (mut state, mut audio) = new_game(GameMode::SinglePlayer, 1, 11);
        let input = InputState::new();
        for _ in 0..20 {
            tick(&mut state, &input, &mut audio, FRAME_DT);
            if state.is_over() {
                break;
            }
            kill_all_enemies(&mut state);
        }
        assert_eq!(state.phase, GamePhase::Victory);
        assert_eq!(state.waves.wave_number(), 5);
        assert_eq!(audio.starts_of(SoundEffect::Victory.asset_path()), 1);
    }

    #[test]
    fn test_defeat_then_restart() {
        let (mut state, mut audio) = new_game(GameMode::SinglePlayer, 1, 3);
        let mut input = InputState::new();
        if let Some(ship) = state.player_ship_mut(0) {
            ship.lives = 0;
            ship.core.is_dead = true;
        }
        tick(&mut state, &input, &mut audio, FRAME_DT);
        assert_eq!(state.phase, GamePhase::Defeat);

        input.press_key(Key::Enter);
        tick(&mut state, &input, &mut audio, FRAME_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player_ship(0).map(|s| s.lives), Some(PLAYER_STARTING_LIVES));
    }

    #[test]
    fn test_versus_last_player_standing_wins() {
        let (mut state, mut audio) = new_game(GameMode::Versus, 2, 3);
        let input = InputState::new();
        if let Some(ship) = state.player_ship_mut(1) {
            ship.lives = 0;
            ship.core.is_dead = true;
        }
        tick(&mut state, &input, &mut audio, FRAME_DT);
        assert_eq!(state.phase, GamePhase::Victory);
    }

    #[test]
    fn test_pause_freezes_world_and_step_advances_one_frame() {
        let (mut state, mut audio) = new_game(GameMode::SinglePlayer, 1, 5);
        let mut input = InputState::new();
        tick(&mut state, &input, &mut audio, FRAME_DT);
        let before = state.snapshot();

        input.press_key(Key::P);
        tick(&mut state, &input, &mut audio, FRAME_DT);
        input.end_frame();
        input.release_key(Key::P);
        tick(&mut state, &input, &mut audio, FRAME_DT);
        assert!(state.clock.paused);
        assert_eq!(state.snapshot(), before);

        input.press_key(Key::O);
        tick(&mut state, &input, &mut audio, FRAME_DT);
        input.end_frame();
        assert_eq!(state.clock.frames, before.frames + 1);

        tick(&mut state, &input, &mut audio, FRAME_DT);
        assert_eq!(state.clock.frames, before.frames + 1);
    }

    #[test]
    fn test_keyboard_fire_spawns_a_bullet() {
        let (mut state, mut audio) = new_game(GameMode::SinglePlayer, 1, 5);
        let mut input = InputState::new();
        input.press_key(Key::Space);
        tick(&mut state, &input, &mut audio, FRAME_DT);
        assert_eq!(state.pools.bullets.len(), 1);
        assert_eq!(audio.starts_of(SoundEffect::Shoot.asset_path()), 1);

        // Holding the key does not auto-fire
        input.end_frame();
        tick(&mut state, &input, &mut audio, FRAME_DT);
        assert_eq!(audio.starts_of(SoundEffect::Shoot.asset_path()), 1);
    }

    #[test]
    fn test_engine_volume_follows_thrust() {
        let (mut state, mut audio) = new_game(GameMode::SinglePlayer, 1, 5);
        let mut input = InputState::new();
        tick(&mut state, &input, &mut audio, FRAME_DT);
        let playback = state.player_ship(0).and_then(|s| s.engine_playback).unwrap();
        assert!(audio.playbacks[playback].params.looped);
        assert_eq!(audio.playbacks[playback].params.volume, 0.0);

        input.press_key(Key::Up);
        tick(&mut state, &input, &mut audio, FRAME_DT);
        assert!(audio.playbacks[playback].params.volume > 0.0);
        // One engine loop per ship, reused every frame
        assert_eq!(audio.starts_of(SoundEffect::Engine.asset_path()), 1);

        state.shutdown(&mut audio);
        assert!(audio.playbacks[playback].stopped);
    }

    #[test]
    fn test_controller_start_joins_coop() {
        let (mut state, mut audio) = new_game(GameMode::Coop, 1, 5);
        let mut input = InputState::new();
        if let Some(controller) = input.controller_mut(2) {
            *controller = ControllerState::connected();
            controller.press(Button::Start);
        }
        tick(&mut state, &input, &mut audio, FRAME_DT);
        assert_eq!(state.pools.ships.len(), 2);
        assert!(state.player_ship(2).is_some());
    }

    #[test]
    fn test_controller_stick_aims_ship() {
        let (mut state, mut audio) = new_game(GameMode::Coop, 1, 5);
        let mut input = InputState::new();
        if let Some(controller) = input.controller_mut(0) {
            *controller = ControllerState::connected();
            controller.left_stick = Vec2::new(-1.0, 0.0);
        }
        for _ in 0..60 {
            tick(&mut state, &input, &mut audio, FRAME_DT);
        }
        let ship = state.player_ship(0).unwrap();
        assert!(ship.core.vel.x < 0.0);
        assert!((ship.core.orientation.abs() - 180.0).abs() < 1.0);
    }

    #[test]
    fn test_full_bullet_pool_drops_spawns_silently() {
        let (mut state, mut audio) = new_game(GameMode::SinglePlayer, 1, 5);
        for _ in 0..MAX_BULLETS + 5 {
            state.commands.push(SimCommand::SpawnBullet(Bullet::new(
                0,
                Vec2::new(10.0, 10.0),
                0.0,
                BulletKind::Standard,
            )));
        }
        flush_commands(&mut state, &mut audio);
        assert_eq!(state.pools.bullets.len(), MAX_BULLETS);
        assert!(state.commands.is_empty());
    }

    #[test]
    fn test_debug_draw_toggle() {
        let (mut state, mut audio) = new_game(GameMode::SinglePlayer, 1, 5);
        let mut input = InputState::new();
        input.press_key(Key::F1);
        tick(&mut state, &input, &mut audio, FRAME_DT);
        assert!(state.debug_draw);
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut audio = NullAudio::new();
            let mut settings = GameSettings::for_mode(GameMode::Coop, 2);
            settings.seed = Some(99_999);
            settings.autopilot = true;
            let mut state = GameState::new(settings, &mut audio);
            let input = InputState::new();
            for _ in 0..900 {
                tick(&mut state, &input, &mut audio, FRAME_DT);
            }
            serde_json::to_string(&state.snapshot()).unwrap()
        };
        assert_eq!(run(), run());
    }
}
