//! Game state: every pool, the wave spawner, clock and camera
//!
//! `GameState` is the sole owner of all entities. Entity code only ever sees
//! a [`SimContext`] and requests insertions through the command queue.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::camera::Camera;
use super::clock::SimClock;
use super::context::{CommandQueue, SimContext};
use super::debris::{Debris, Star};
use super::enemy::{Asteroid, Beetle, Wasp};
use super::entity::Entity;
use super::pool::Pool;
use super::power_up::PowerUp;
use super::ship::PlayerShip;
use super::wave::WaveSpawner;
use crate::audio::{AudioBackend, SoundBank};
use crate::consts::*;
use crate::{GameMode, GameRng, GameSettings};

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Every scripted wave cleared (single player)
    Victory,
    /// Every ship out of lives
    Defeat,
}

/// One fixed-capacity pool per entity variant
#[derive(Debug, Clone, Default)]
pub struct Pools {
    pub ships: Pool<PlayerShip, MAX_PLAYERS>,
    pub bullets: Pool<Bullet, MAX_BULLETS>,
    pub asteroids: Pool<Asteroid, MAX_ASTEROIDS>,
    pub beetles: Pool<Beetle, MAX_BEETLES>,
    pub wasps: Pool<Wasp, MAX_WASPS>,
    pub debris: Pool<Debris, MAX_DEBRIS>,
    pub power_ups: Pool<PowerUp, MAX_POWER_UPS>,
    pub stars: Pool<Star, MAX_STARS>,
}

impl Pools {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Update` on every pool, ships first, cosmetic pools last
    pub fn update_all(&mut self, ctx: &mut SimContext<'_>) {
        self.ships.for_each_live(|e| e.update(ctx));
        self.bullets.for_each_live(|e| e.update(ctx));
        self.asteroids.for_each_live(|e| e.update(ctx));
        self.beetles.for_each_live(|e| e.update(ctx));
        self.wasps.for_each_live(|e| e.update(ctx));
        self.power_ups.for_each_live(|e| e.update(ctx));
        self.debris.for_each_live(|e| e.update(ctx));
        self.stars.for_each_live(|e| e.update(ctx));
    }

    /// Free every garbage slot; returns how many entities were dropped
    pub fn sweep_all(&mut self) -> usize {
        self.ships.sweep_garbage()
            + self.bullets.sweep_garbage()
            + self.asteroids.sweep_garbage()
            + self.beetles.sweep_garbage()
            + self.wasps.sweep_garbage()
            + self.debris.sweep_garbage()
            + self.power_ups.sweep_garbage()
            + self.stars.sweep_garbage()
    }

    /// Beetles plus wasps; asteroids never hold a wave open
    pub fn live_enemy_count(&self) -> usize {
        self.beetles.live_count() + self.wasps.live_count()
    }

    pub fn live_asteroid_count(&self) -> usize {
        self.asteroids.live_count()
    }

    /// Positions of living ships in slot order, for enemy steering
    pub fn ship_targets(&self) -> Vec<Vec2> {
        self.ships
            .iter()
            .filter(|s| s.is_alive())
            .map(|s| s.core.pos)
            .collect()
    }

    /// Drop everything except ships and stars
    pub fn clear_world(&mut self) {
        self.bullets.clear();
        self.asteroids.clear();
        self.beetles.clear();
        self.wasps.clear();
        self.debris.clear();
        self.power_ups.clear();
    }
}

/// Complete game state
pub struct GameState {
    pub settings: GameSettings,
    pub rng: GameRng,
    pub pools: Pools,
    /// Deferred spawns, sounds and shake, flushed by the tick
    pub commands: CommandQueue,
    pub waves: WaveSpawner,
    pub clock: SimClock,
    pub camera: Camera,
    pub phase: GamePhase,
    pub sounds: SoundBank,
    /// Draw physics and cosmetic radii
    pub debug_draw: bool,
}

impl GameState {
    /// New run: stars, one ship per configured player, wave 1 on the first tick
    pub fn new(settings: GameSettings, audio: &mut dyn AudioBackend) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        let player_count = match settings.mode {
            GameMode::SinglePlayer => 1,
            _ => settings.player_count.clamp(1, MAX_PLAYERS as u32),
        };
        log::info!(
            "Starting {} game: {} player(s), seed {}",
            settings.mode.as_str(),
            player_count,
            seed
        );

        let mut state = Self {
            settings,
            rng: GameRng::new(seed),
            pools: Pools::new(),
            commands: CommandQueue::new(),
            waves: WaveSpawner::new(),
            clock: SimClock::new(),
            camera: Camera::new(),
            phase: GamePhase::Playing,
            sounds: SoundBank::load(audio),
            debug_draw: false,
        };

        for _ in 0..MAX_STARS {
            let star = Star::spawn_random(&mut state.rng);
            state.pools.stars.try_insert(star);
        }
        for player_id in 0..player_count {
            state.connect_player(player_id);
        }
        state
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Put a ship in play for `player_id`. False when the id is out of range,
    /// already connected, or the mode has no room for another player.
    pub fn connect_player(&mut self, player_id: u32) -> bool {
        if player_id as usize >= MAX_PLAYERS || self.player_ship(player_id).is_some() {
            return false;
        }
        if self.settings.mode == GameMode::SinglePlayer && !self.pools.ships.is_empty() {
            return false;
        }
        let ship = PlayerShip::new(player_id, PlayerShip::home_for_slot(player_id));
        if self.pools.ships.try_insert(ship).is_none() {
            return false;
        }
        log::info!("Player {player_id} connected");
        true
    }

    /// Ship lookup by player id; `None` for unknown ids
    pub fn player_ship(&self, player_id: u32) -> Option<&PlayerShip> {
        self.pools.ships.iter().find(|s| s.player_id == player_id)
    }

    pub fn player_ship_mut(&mut self, player_id: u32) -> Option<&mut PlayerShip> {
        self.pools.ships.iter_mut().find(|s| s.player_id == player_id)
    }

    pub fn is_over(&self) -> bool {
        self.phase != GamePhase::Playing
    }

    /// At least one ship, and none of them can come back
    pub fn all_players_out(&self) -> bool {
        !self.pools.ships.is_empty() && self.pools.ships.iter().all(|s| s.is_out())
    }

    /// Fresh run with the same players; the RNG stream carries on
    pub fn restart(&mut self, audio: &mut dyn AudioBackend) {
        self.stop_engines(audio);
        let players: Vec<u32> = self.pools.ships.iter().map(|s| s.player_id).collect();
        self.pools.ships.clear();
        self.pools.clear_world();
        self.commands.clear();
        self.waves = WaveSpawner::new();
        self.camera = Camera::new();
        self.phase = GamePhase::Playing;
        for player_id in players {
            self.connect_player(player_id);
        }
        log::info!("Game restarted");
    }

    /// Stop looping sounds before the state is dropped
    pub fn shutdown(&mut self, audio: &mut dyn AudioBackend) {
        self.stop_engines(audio);
    }

    fn stop_engines(&mut self, audio: &mut dyn AudioBackend) {
        for ship in self.pools.ships.iter_mut() {
            if let Some(playback) = ship.engine_playback.take() {
                audio.stop_sound(playback);
            }
        }
    }

    /// Serializable summary of the run
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            seed: self.seed(),
            frames: self.clock.frames,
            elapsed: self.clock.elapsed,
            wave: self.waves.wave_number(),
            phase: self.phase,
            players: self
                .pools
                .ships
                .iter()
                .map(|s| PlayerSnapshot {
                    player_id: s.player_id,
                    lives: s.lives,
                    health: s.core.health,
                    alive: s.is_alive(),
                    pos: s.core.pos,
                })
                .collect(),
            bullets: self.pools.bullets.len(),
            asteroids: self.pools.asteroids.len(),
            beetles: self.pools.beetles.len(),
            wasps: self.pools.wasps.len(),
            debris: self.pools.debris.len(),
            power_ups: self.pools.power_ups.len(),
            rng_rolls: self.rng.rolls(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub player_id: u32,
    pub lives: u32,
    pub health: i32,
    pub alive: bool,
    pub pos: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub seed: u64,
    pub frames: u64,
    pub elapsed: f64,
    pub wave: u32,
    pub phase: GamePhase,
    pub players: Vec<PlayerSnapshot>,
    pub bullets: usize,
    pub asteroids: usize,
    pub beetles: usize,
    pub wasps: usize,
    pub debris: usize,
    pub power_ups: usize,
    pub rng_rolls: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;

    fn seeded(mode: GameMode, players: u32) -> GameState {
        let mut settings = GameSettings::for_mode(mode, players);
        settings.seed = Some(42);
        GameState::new(settings, &mut NullAudio::new())
    }

    #[test]
    fn test_new_game_has_stars_and_ships() {
        let state = seeded(GameMode::Coop, 3);
        assert_eq!(state.pools.stars.len(), MAX_STARS);
        assert_eq!(state.pools.ships.len(), 3);
        assert_eq!(state.seed(), 42);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.pools.live_enemy_count(), 0);
    }

    #[test]
    fn test_single_player_ignores_extra_players() {
        let mut state = seeded(GameMode::SinglePlayer, 3);
        assert_eq!(state.pools.ships.len(), 1);
        assert!(!state.connect_player(1));
    }

    #[test]
    fn test_connect_player_rejects_duplicates_and_bad_ids() {
        let mut state = seeded(GameMode::Versus, 1);
        assert!(!state.connect_player(0));
        assert!(!state.connect_player(MAX_PLAYERS as u32));
        assert!(state.connect_player(2));
        assert!(state.player_ship(2).is_some());
        assert!(state.player_ship(3).is_none());
    }

    #[test]
    fn test_all_players_out_needs_every_ship() {
        let mut state = seeded(GameMode::Coop, 2);
        assert!(!state.all_players_out());
        for ship in state.pools.ships.iter_mut() {
            ship.lives = 0;
            ship.core.is_dead = true;
        }
        assert!(state.all_players_out());
    }

    #[test]
    fn test_restart_keeps_players_and_clears_world() {
        let mut audio = NullAudio::new();
        let mut state = seeded(GameMode::Coop, 2);
        state.pools.beetles.try_insert(Beetle::new(Vec2::new(10.0, 10.0)));
        state.phase = GamePhase::Defeat;
        if let Some(ship) = state.player_ship_mut(1) {
            ship.lives = 0;
        }

        state.restart(&mut audio);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.pools.beetles.is_empty());
        assert_eq!(state.pools.ships.len(), 2);
        assert_eq!(state.player_ship(1).map(|s| s.lives), Some(PLAYER_STARTING_LIVES));
        assert_eq!(state.pools.stars.len(), MAX_STARS);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = seeded(GameMode::SinglePlayer, 1);
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"seed\":42"));
        assert!(json.contains("\"phase\":\"Playing\""));
    }
}
