//! Player ships: thrust, turning, weapons, shields, death and respawn

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::{Bullet, BulletKind};
use super::context::{DebrisBurst, SimCommand, SimContext};
use super::entity::{Entity, EntityCore, EntityKind, Rgba, palette};
use super::power_up::PowerUpKind;
use crate::audio::{PlaybackId, SoundEffect};
use crate::consts::*;
use crate::turn_toward_degrees;

/// A timed state: active flag plus age against a maximum age
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimedEffect {
    pub active: bool,
    pub age: f32,
    pub max_age: f32,
}

impl TimedEffect {
    pub fn start(&mut self, max_age: f32) {
        self.active = true;
        self.age = 0.0;
        self.max_age = max_age;
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.age = 0.0;
    }

    /// Advance; deactivates once `max_age` is reached
    pub fn tick(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.age += dt;
        if self.age >= self.max_age {
            self.stop();
        }
    }

    /// Fraction of the duration left, 0 when inactive
    pub fn remaining_fraction(&self) -> f32 {
        if !self.active || self.max_age <= 0.0 {
            return 0.0;
        }
        (1.0 - self.age / self.max_age).clamp(0.0, 1.0)
    }
}

/// Weapon granted by a bullet power-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponPowerUp {
    pub kind: BulletKind,
    pub timer: TimedEffect,
}

/// What a player asked the ship to do this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShipCommand {
    /// 0 (coast) to 1 (full thrust)
    pub thrust: f32,
    /// -1 (clockwise) to +1 (counter-clockwise); ignored when `aim` is set
    pub turn: f32,
    /// Absolute heading to turn toward, in degrees (analog stick)
    pub aim: Option<f32>,
    pub fire: bool,
}

/// A player-controlled ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerShip {
    pub core: EntityCore,
    pub player_id: u32,
    pub lives: u32,
    /// Spawn and respawn position
    pub home: Vec2,
    pub shield: TimedEffect,
    pub damage_flash: TimedEffect,
    pub respawn_invulnerability: TimedEffect,
    pub weapon: Option<WeaponPowerUp>,
    /// Current throttle, drives the engine sound
    pub thrust: f32,
    /// Seconds spent dead, counts toward respawn
    pub respawn_timer: f32,
    #[serde(skip)]
    pub engine_playback: Option<PlaybackId>,
}

impl PlayerShip {
    pub fn new(player_id: u32, home: Vec2) -> Self {
        let color = palette::PLAYER[player_id as usize % palette::PLAYER.len()];
        let mut core = EntityCore::new(
            home,
            PLAYER_SHIP_PHYSICS_RADIUS,
            PLAYER_SHIP_COSMETIC_RADIUS,
            PLAYER_SHIP_HEALTH,
            color,
        );
        core.orientation = 90.0;
        Self {
            core,
            player_id,
            lives: PLAYER_STARTING_LIVES,
            home,
            shield: TimedEffect::default(),
            damage_flash: TimedEffect::default(),
            respawn_invulnerability: TimedEffect::default(),
            weapon: None,
            thrust: 0.0,
            respawn_timer: 0.0,
            engine_playback: None,
        }
    }

    /// Home position for a player slot: spread along the lower middle of the world
    pub fn home_for_slot(player_id: u32) -> Vec2 {
        let slots = MAX_PLAYERS as f32;
        let x = WORLD_SIZE_X * (player_id as f32 + 1.0) / (slots + 1.0);
        Vec2::new(x, WORLD_SIZE_Y * 0.5)
    }

    pub fn is_shielded(&self) -> bool {
        self.shield.active
    }

    pub fn is_invulnerable(&self) -> bool {
        self.respawn_invulnerability.active
    }

    /// Disc used against other entities: the shield when raised
    pub fn collision_radius(&self) -> f32 {
        if self.is_shielded() {
            PLAYER_SHIELD_RADIUS
        } else {
            self.core.physics_radius
        }
    }

    /// Dead with no lives left
    pub fn is_out(&self) -> bool {
        self.core.is_dead && self.lives == 0
    }

    /// Active fire pattern
    pub fn bullet_kind(&self) -> BulletKind {
        self.weapon.map(|w| w.kind).unwrap_or_default()
    }

    /// Color after the damage flash
    pub fn display_color(&self) -> Rgba {
        if self.damage_flash.active {
            palette::DAMAGE_FLASH
        } else {
            self.core.color
        }
    }

    pub fn activate_shield(&mut self, duration: f32) {
        self.shield.start(duration);
    }

    /// Steering, throttle and trigger for this frame
    pub fn apply_command(&mut self, command: &ShipCommand, ctx: &mut SimContext<'_>) {
        if !self.is_alive() {
            self.thrust = 0.0;
            return;
        }
        let max_turn = PLAYER_SHIP_TURN_SPEED * ctx.dt;
        if let Some(aim) = command.aim {
            self.core.orientation = turn_toward_degrees(self.core.orientation, aim, max_turn);
        } else {
            self.core.orientation += command.turn.clamp(-1.0, 1.0) * max_turn;
        }
        self.thrust = command.thrust.clamp(0.0, 1.0);
        if command.fire {
            self.fire(ctx);
        }
    }

    /// Queue one volley from the nose
    pub fn fire(&mut self, ctx: &mut SimContext<'_>) {
        if !self.is_alive() {
            return;
        }
        let nose = self.core.pos + self.core.forward() * PLAYER_SHIP_GUN_OFFSET;
        for bullet in Bullet::volley(self.player_id, nose, self.core.orientation, self.bullet_kind()) {
            ctx.push(SimCommand::SpawnBullet(bullet));
        }
        ctx.play_sound(SoundEffect::Shoot, self.core.pos);
    }

    /// Apply a collected power-up
    pub fn pick_up(&mut self, kind: PowerUpKind, ctx: &mut SimContext<'_>) {
        match kind {
            PowerUpKind::Shield => {
                self.activate_shield(SHIELD_DURATION);
                ctx.play_sound(SoundEffect::ShieldUp, self.core.pos);
            }
            PowerUpKind::Health => {
                self.core.health = (self.core.health + 1).min(PLAYER_SHIP_HEALTH);
            }
            _ => {
                if let Some(bullet_kind) = kind.weapon() {
                    let mut timer = TimedEffect::default();
                    timer.start(WEAPON_POWER_UP_DURATION);
                    self.weapon = Some(WeaponPowerUp {
                        kind: bullet_kind,
                        timer,
                    });
                }
            }
        }
        ctx.play_sound(SoundEffect::PowerUpCollect, self.core.pos);
    }

    /// Back at home with full health and a grace period
    pub fn respawn(&mut self, ctx: &mut SimContext<'_>) {
        self.core.pos = self.home;
        self.core.vel = Vec2::ZERO;
        self.core.orientation = 90.0;
        self.core.health = PLAYER_SHIP_HEALTH;
        self.core.is_dead = false;
        self.respawn_timer = 0.0;
        self.damage_flash.stop();
        self.respawn_invulnerability
            .start(PLAYER_RESPAWN_INVULNERABILITY);
        ctx.play_sound(SoundEffect::Respawn, self.core.pos);
        log::info!("Player {} respawned ({} lives left)", self.player_id, self.lives);
    }

    fn tick_timers(&mut self, dt: f32) {
        self.shield.tick(dt);
        self.damage_flash.tick(dt);
        self.respawn_invulnerability.tick(dt);
        if let Some(weapon) = &mut self.weapon {
            weapon.timer.tick(dt);
            if !weapon.timer.active {
                self.weapon = None;
            }
        }
    }
}

impl Entity for PlayerShip {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn kind(&self) -> EntityKind {
        EntityKind::PlayerShip
    }

    fn update(&mut self, ctx: &mut SimContext<'_>) {
        if !self.is_alive() {
            if self.lives > 0 {
                self.respawn_timer += ctx.dt;
                if self.respawn_timer >= PLAYER_RESPAWN_DELAY {
                    self.respawn(ctx);
                }
            }
            return;
        }

        let dt = ctx.dt;
        self.core.vel += self.core.forward() * PLAYER_SHIP_ACCELERATION * self.thrust * dt;
        self.core.vel = self.core.vel.clamp_length_max(PLAYER_SHIP_MAX_SPEED);
        self.core.integrate(dt);
        self.core.bounce_off_world_edges();
        self.tick_timers(dt);
    }

    fn death_burst(&self) -> Option<DebrisBurst> {
        Some(
            DebrisBurst::new(self.core.pos, self.core.vel, self.core.color, 30)
                .with_radius(0.3, 1.0)
                .with_speed(4.0, 20.0),
        )
    }

    fn death_sound(&self) -> Option<SoundEffect> {
        Some(SoundEffect::PlayerExplode)
    }

    /// Shields and the respawn grace period absorb all damage
    fn lose_health(&mut self, amount: i32, ctx: &mut SimContext<'_>) {
        if !self.is_alive() || self.is_shielded() || self.is_invulnerable() {
            return;
        }
        self.core.health -= amount;
        self.damage_flash.start(DAMAGE_FLASH_DURATION);
        ctx.add_screen_shake(SHAKE_ON_PLAYER_HIT);
        if self.core.health <= 0 {
            self.die(ctx);
        } else {
            ctx.play_sound(SoundEffect::PlayerHit, self.core.pos);
        }
    }

    /// Ships stay in their slot while dead; they cost a life and wait to respawn
    fn die(&mut self, ctx: &mut SimContext<'_>) {
        if !self.is_alive() {
            return;
        }
        self.core.is_dead = true;
        self.core.health = 0;
        self.lives = self.lives.saturating_sub(1);
        self.respawn_timer = 0.0;
        self.thrust = 0.0;
        self.shield.stop();
        self.weapon = None;
        if let Some(burst) = self.death_burst() {
            ctx.push(SimCommand::SpawnDebris(burst));
        }
        ctx.play_sound(SoundEffect::PlayerExplode, self.core.pos);
        ctx.add_screen_shake(SHAKE_ON_PLAYER_DEATH);
        self.core.vel = Vec2::ZERO;
        log::info!("Player {} destroyed ({} lives left)", self.player_id, self.lives);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameRng;
    use crate::sim::context::CommandQueue;

    fn ship() -> PlayerShip {
        PlayerShip::new(0, Vec2::new(100.0, 50.0))
    }

    fn count(commands: &CommandQueue, pred: impl Fn(&SimCommand) -> bool) -> usize {
        commands.iter().filter(|c| pred(c)).count()
    }

    #[test]
    fn test_thrust_accelerates_along_heading() {
        let mut rng = GameRng::new(1);
        let mut commands = CommandQueue::new();
        let mut ctx = SimContext::new(0.1, &mut rng, &mut commands, &[]);

        let mut ship = ship();
        ship.core.orientation = 0.0;
        ship.apply_command(&ShipCommand { thrust: 1.0, ..Default::default() }, &mut ctx);
        ship.update(&mut ctx);
        assert!((ship.core.vel.x - PLAYER_SHIP_ACCELERATION * 0.1).abs() < 1e-4);
        assert!(ship.core.vel.y.abs() < 1e-4);
    }

    #[test]
    fn test_aim_turns_at_limited_rate() {
        let mut rng = GameRng::new(1);
        let mut commands = CommandQueue::new();
        let mut ctx = SimContext::new(0.1, &mut rng, &mut commands, &[]);

        let mut ship = ship();
        ship.core.orientation = 0.0;
        ship.apply_command(&ShipCommand { aim: Some(180.0 - 1.0), ..Default::default() }, &mut ctx);
        assert!((ship.core.orientation - PLAYER_SHIP_TURN_SPEED * 0.1).abs() < 1e-3);
    }

    #[test]
    fn test_fire_uses_weapon_power_up() {
        let mut rng = GameRng::new(1);
        let mut commands = CommandQueue::new();
        let mut ctx = SimContext::new(0.1, &mut rng, &mut commands, &[]);

        let mut ship = ship();
        ship.pick_up(PowerUpKind::FiveBullet, &mut ctx);
        ship.apply_command(&ShipCommand { fire: true, ..Default::default() }, &mut ctx);
        assert_eq!(
            count(&commands, |c| matches!(c, SimCommand::SpawnBullet(b) if b.kind == BulletKind::Five && b.owner == 0)),
            5
        );
    }

    #[test]
    fn test_weapon_power_up_expires() {
        let mut rng = GameRng::new(1);
        let mut commands = CommandQueue::new();
        let mut ctx = SimContext::new(1.0, &mut rng, &mut commands, &[]);

        let mut ship = ship();
        ship.pick_up(PowerUpKind::SniperBullet, &mut ctx);
        assert_eq!(ship.bullet_kind(), BulletKind::Sniper);
        for _ in 0..(WEAPON_POWER_UP_DURATION as usize) {
            ship.update(&mut ctx);
        }
        assert_eq!(ship.bullet_kind(), BulletKind::Standard);
        assert!(ship.weapon.is_none());
    }

    #[test]
    fn test_health_power_up_caps_at_max() {
        let mut rng = GameRng::new(1);
        let mut commands = CommandQueue::new();
        let mut ctx = SimContext::new(0.1, &mut rng, &mut commands, &[]);

        let mut ship = ship();
        ship.pick_up(PowerUpKind::Health, &mut ctx);
        assert_eq!(ship.core.health, PLAYER_SHIP_HEALTH);
        ship.lose_health(1, &mut ctx);
        ship.pick_up(PowerUpKind::Health, &mut ctx);
        assert_eq!(ship.core.health, PLAYER_SHIP_HEALTH);
    }

    #[test]
    fn test_shield_absorbs_damage_and_grows_radius() {
        let mut rng = GameRng::new(1);
        let mut commands = CommandQueue::new();
        let mut ctx = SimContext::new(0.1, &mut rng, &mut commands, &[]);

        let mut ship = ship();
        ship.pick_up(PowerUpKind::Shield, &mut ctx);
        assert_eq!(ship.collision_radius(), PLAYER_SHIELD_RADIUS);
        ship.lose_health(1, &mut ctx);
        assert_eq!(ship.core.health, PLAYER_SHIP_HEALTH);
        assert!(!ship.damage_flash.active);
    }

    #[test]
    fn test_damage_flashes_then_fades() {
        let mut rng = GameRng::new(1);
        let mut commands = CommandQueue::new();
        let mut ctx = SimContext::new(0.1, &mut rng, &mut commands, &[]);

        let mut ship = ship();
        ship.lose_health(1, &mut ctx);
        assert_eq!(ship.core.health, PLAYER_SHIP_HEALTH - 1);
        assert_eq!(ship.display_color(), palette::DAMAGE_FLASH);

        // The flash is cosmetic: a second hit lands straight away
        ship.lose_health(1, &mut ctx);
        assert_eq!(ship.core.health, PLAYER_SHIP_HEALTH - 2);
        assert!(ship.is_alive());
        for _ in 0..3 {
            ship.update(&mut ctx);
        }
        assert_eq!(ship.display_color(), ship.core.color);
    }

    #[test]
    fn test_death_costs_a_life_and_respawns_with_grace_period() {
        let mut rng = GameRng::new(1);
        let mut commands = CommandQueue::new();
        let mut ctx = SimContext::new(0.5, &mut rng, &mut commands, &[]);

        let mut ship = ship();
        ship.core.pos = Vec2::new(30.0, 30.0);
        for _ in 0..PLAYER_SHIP_HEALTH {
            ship.lose_health(1, &mut ctx);
        }
        assert!(ship.core.is_dead);
        assert!(!ship.is_garbage(), "ships keep their slot while dead");
        assert_eq!(ship.lives, PLAYER_STARTING_LIVES - 1);

        // Corpses do not take further hits
        ship.lose_health(1, &mut ctx);
        assert_eq!(ship.lives, PLAYER_STARTING_LIVES - 1);

        for _ in 0..4 {
            ship.update(&mut ctx);
        }
        assert!(ship.is_alive());
        assert_eq!(ship.core.pos, ship.home);
        assert_eq!(ship.core.health, PLAYER_SHIP_HEALTH);
        assert!(ship.is_invulnerable());

        ship.lose_health(1, &mut ctx);
        assert_eq!(ship.core.health, PLAYER_SHIP_HEALTH);

        assert_eq!(count(&commands, |c| matches!(c, SimCommand::SpawnDebris(_))), 1);
    }

    #[test]
    fn test_last_life_stays_dead() {
        let mut rng = GameRng::new(1);
        let mut commands = CommandQueue::new();
        let mut ctx = SimContext::new(1.0, &mut rng, &mut commands, &[]);

        let mut ship = ship();
        ship.lives = 1;
        ship.die(&mut ctx);
        assert!(ship.is_out());
        for _ in 0..10 {
            ship.update(&mut ctx);
        }
        assert!(ship.is_out());
    }

    #[test]
    fn test_timed_effect_runs_out() {
        let mut effect = TimedEffect::default();
        effect.start(1.0);
        effect.tick(0.4);
        assert!(effect.active);
        assert!((effect.remaining_fraction() - 0.6).abs() < 1e-5);
        effect.tick(0.6);
        assert!(!effect.active);
        assert_eq!(effect.remaining_fraction(), 0.0);
    }
}
