//! Wave progression
//!
//! `Idle(n) -> Spawning -> Active -> Cleared -> Idle(n + 1)`. The spawner only
//! decides what to send; the frame tick inserts the entities. Completion is
//! polled once per frame and counts beetles and wasps only, never asteroids.

use serde::{Deserialize, Serialize};

use crate::GameRng;
use crate::consts::*;

/// Enemy composition of one wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WavePlan {
    pub beetles: u32,
    pub wasps: u32,
    pub asteroids: u32,
}

impl WavePlan {
    pub const fn new(beetles: u32, wasps: u32, asteroids: u32) -> Self {
        Self {
            beetles,
            wasps,
            asteroids,
        }
    }

    /// Beetles plus wasps; the count that has to reach zero
    pub fn enemies(&self) -> u32 {
        self.beetles + self.wasps
    }
}

/// Scripted waves, played in order
pub const WAVE_TABLE: [WavePlan; 5] = [
    WavePlan::new(1, 0, 4),
    WavePlan::new(2, 0, 1),
    WavePlan::new(2, 1, 2),
    WavePlan::new(3, 2, 2),
    WavePlan::new(4, 3, 3),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WavePhase {
    /// Waiting to send the wave at `wave_index`
    #[default]
    Idle,
    /// Order handed out, waiting for the tick to insert it
    Spawning,
    Active,
    Cleared,
    /// Single player ran out of scripted waves
    Finished,
}

/// A wave ready to be inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveOrder {
    /// 1-based wave number
    pub number: u32,
    pub plan: WavePlan,
    pub randomized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveEvent {
    Started(WaveOrder),
    Victory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveSpawner {
    /// 0-based index of the current (or next) wave
    pub wave_index: u32,
    pub phase: WavePhase,
    /// Live beetles and wasps at the last poll
    pub enemies_remaining: u32,
}

impl WaveSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1-based number of the current wave, 0 before the first one
    pub fn wave_number(&self) -> u32 {
        match self.phase {
            WavePhase::Idle | WavePhase::Finished => self.wave_index,
            _ => self.wave_index + 1,
        }
    }

    /// Advance the state machine. Called once per frame with the live counts
    /// after the garbage sweep.
    pub fn poll(
        &mut self,
        live_enemies: usize,
        live_asteroids: usize,
        multiplayer: bool,
        rng: &mut GameRng,
    ) -> Option<WaveEvent> {
        self.enemies_remaining = live_enemies as u32;

        if self.phase == WavePhase::Active && live_enemies == 0 {
            self.phase = WavePhase::Cleared;
        }
        if self.phase == WavePhase::Cleared {
            self.wave_index += 1;
            self.phase = WavePhase::Idle;
        }
        if self.phase != WavePhase::Idle {
            return None;
        }

        let index = self.wave_index as usize;
        let (plan, randomized) = match WAVE_TABLE.get(index) {
            Some(plan) => (*plan, false),
            None if multiplayer => (randomized_plan(self.wave_index, rng), true),
            None => {
                self.phase = WavePhase::Finished;
                log::info!("All {} waves cleared", WAVE_TABLE.len());
                return Some(WaveEvent::Victory);
            }
        };

        let room = MAX_ASTEROIDS.saturating_sub(live_asteroids) as u32;
        let plan = WavePlan {
            asteroids: plan.asteroids.min(room),
            ..plan
        };
        self.phase = WavePhase::Spawning;
        let order = WaveOrder {
            number: self.wave_index + 1,
            plan,
            randomized,
        };
        log::info!(
            "Wave {} starting: {} beetles, {} wasps, {} asteroids{}",
            order.number,
            plan.beetles,
            plan.wasps,
            plan.asteroids,
            if randomized { " (randomized)" } else { "" }
        );
        Some(WaveEvent::Started(order))
    }

    /// The tick has inserted the order; start watching for completion
    pub fn mark_active(&mut self, spawned_enemies: u32) {
        if self.phase == WavePhase::Spawning {
            self.phase = WavePhase::Active;
            self.enemies_remaining = spawned_enemies;
        }
    }
}

/// Past the scripted table: more enemies every wave, wasps growing more likely
pub fn randomized_plan(wave_index: u32, rng: &mut GameRng) -> WavePlan {
    let total = RANDOM_WAVE_BASE_ENEMIES + RANDOM_WAVE_ENEMIES_PER_WAVE * wave_index;
    let wasp_weight = 0.5 + 0.1 * wave_index as f32;
    let weights = [1.0, wasp_weight];

    let mut plan = WavePlan::new(0, 0, 0);
    for _ in 0..total {
        match rng.roll_weighted_index(&weights) {
            0 => plan.beetles += 1,
            _ => plan.wasps += 1,
        }
    }
    plan.asteroids = rng.roll_int_in_range(1, 3) as u32;
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(event: Option<WaveEvent>) -> WaveOrder {
        match event {
            Some(WaveEvent::Started(order)) => order,
            other => panic!("expected a wave start, got {other:?}"),
        }
    }

    #[test]
    fn test_first_poll_starts_wave_one() {
        let mut rng = GameRng::new(1);
        let mut spawner = WaveSpawner::new();
        assert_eq!(spawner.wave_number(), 0);

        let order = started(spawner.poll(0, 0, false, &mut rng));
        assert_eq!(order.number, 1);
        assert_eq!(order.plan, WavePlan::new(1, 0, 4));
        assert_eq!(spawner.phase, WavePhase::Spawning);

        // Nothing more until the tick confirms the spawn
        assert_eq!(spawner.poll(0, 0, false, &mut rng), None);
    }

    #[test]
    fn test_clearing_beetles_starts_next_wave_ignoring_asteroids() {
        let mut rng = GameRng::new(1);
        let mut spawner = WaveSpawner::new();
        let wave1 = started(spawner.poll(0, 0, false, &mut rng));
        spawner.mark_active(wave1.plan.enemies());

        // Beetle alive, asteroids alive: still active
        assert_eq!(spawner.poll(1, 4, false, &mut rng), None);
        assert_eq!(spawner.phase, WavePhase::Active);

        // Beetle dead, leftover asteroids do not hold the wave open
        let wave2 = started(spawner.poll(0, 4, false, &mut rng));
        assert_eq!(wave2.number, 2);
        assert_eq!(wave2.plan, WavePlan::new(2, 0, 1));
        assert_eq!(spawner.wave_number(), 2);
    }

    #[test]
    fn test_asteroids_clamped_to_pool_room() {
        let mut rng = GameRng::new(1);
        let mut spawner = WaveSpawner::new();
        let order = started(spawner.poll(0, MAX_ASTEROIDS - 2, false, &mut rng));
        assert_eq!(order.plan.asteroids, 2);

        let mut spawner = WaveSpawner::new();
        let order = started(spawner.poll(0, MAX_ASTEROIDS + 5, false, &mut rng));
        assert_eq!(order.plan.asteroids, 0);
    }

    fn clear_every_scripted_wave(spawner: &mut WaveSpawner, multiplayer: bool, rng: &mut GameRng) -> Option<WaveEvent> {
        let mut last = spawner.poll(0, 0, multiplayer, rng);
        for _ in 0..WAVE_TABLE.len() {
            if let Some(WaveEvent::Started(order)) = last {
                spawner.mark_active(order.plan.enemies());
            }
            last = spawner.poll(0, 0, multiplayer, rng);
        }
        last
    }

    #[test]
    fn test_single_player_wins_after_table() {
        let mut rng = GameRng::new(1);
        let mut spawner = WaveSpawner::new();
        assert_eq!(clear_every_scripted_wave(&mut spawner, false, &mut rng), Some(WaveEvent::Victory));
        assert_eq!(spawner.phase, WavePhase::Finished);
        assert_eq!(spawner.poll(0, 0, false, &mut rng), None);
    }

    #[test]
    fn test_multiplayer_continues_with_randomized_waves() {
        let mut rng = GameRng::new(1);
        let mut spawner = WaveSpawner::new();
        let order = started(clear_every_scripted_wave(&mut spawner, true, &mut rng));
        assert!(order.randomized);
        assert_eq!(order.number, WAVE_TABLE.len() as u32 + 1);
        assert_eq!(
            order.plan.enemies(),
            RANDOM_WAVE_BASE_ENEMIES + RANDOM_WAVE_ENEMIES_PER_WAVE * WAVE_TABLE.len() as u32
        );
    }

    #[test]
    fn test_randomized_waves_grow() {
        let mut rng = GameRng::new(5);
        let small = randomized_plan(5, &mut rng);
        let large = randomized_plan(12, &mut rng);
        assert!(large.enemies() > small.enemies());
        assert!((1..=3).contains(&large.asteroids));
    }
}
