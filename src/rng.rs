//! Seeded random source shared by the whole simulation
//!
//! One generator drives every roll so a run is fully reproducible from its
//! seed, given the same inputs and the same pool iteration order.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::direction_from_degrees;

/// Deterministic uniform random source
#[derive(Debug, Clone)]
pub struct GameRng {
    seed: u64,
    rolls: u64,
    rng: Pcg32,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rolls: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed this generator was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of rolls taken so far (cheap divergence check for replays)
    pub fn rolls(&self) -> u64 {
        self.rolls
    }

    /// Uniform integer in `[min, max]` (inclusive); returns `min` for an empty range
    pub fn roll_int_in_range(&mut self, min: i32, max: i32) -> i32 {
        self.rolls += 1;
        if max <= min {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    /// Uniform float in `[min, max)`; returns `min` for an empty range
    pub fn roll_float_in_range(&mut self, min: f32, max: f32) -> f32 {
        self.rolls += 1;
        if max <= min {
            return min;
        }
        self.rng.random_range(min..max)
    }

    /// Uniform float in `[0, 1)`
    pub fn roll_float_zero_to_one(&mut self) -> f32 {
        self.roll_float_in_range(0.0, 1.0)
    }

    /// True with the given probability (clamped to `[0, 1]`)
    pub fn roll_percent_chance(&mut self, probability: f32) -> bool {
        self.roll_float_zero_to_one() < probability.clamp(0.0, 1.0)
    }

    /// Random unit vector
    pub fn roll_direction(&mut self) -> Vec2 {
        direction_from_degrees(self.roll_float_in_range(0.0, 360.0))
    }

    /// Random point inside an axis-aligned box
    pub fn roll_point_in_box(&mut self, min: Vec2, max: Vec2) -> Vec2 {
        Vec2::new(
            self.roll_float_in_range(min.x, max.x),
            self.roll_float_in_range(min.y, max.y),
        )
    }

    /// Pick an index from a non-empty slice of weights; returns 0 when all weights are zero
    pub fn roll_weighted_index(&mut self, weights: &[f32]) -> usize {
        let total: f32 = weights.iter().copied().filter(|w| *w > 0.0).sum();
        if total <= 0.0 {
            return 0;
        }
        let mut roll = self.roll_float_in_range(0.0, total);
        for (i, w) in weights.iter().enumerate() {
            if *w <= 0.0 {
                continue;
            }
            if roll < *w {
                return i;
            }
            roll -= *w;
        }
        weights.len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.roll_int_in_range(-5, 5), b.roll_int_in_range(-5, 5));
            assert_eq!(a.roll_float_in_range(0.0, 10.0), b.roll_float_in_range(0.0, 10.0));
        }
        assert_eq!(a.rolls(), 200);
    }

    #[test]
    fn test_int_range_is_inclusive() {
        let mut rng = GameRng::new(7);
        let mut saw_min = false;
        let mut saw_max = false;
        for _ in 0..500 {
            let v = rng.roll_int_in_range(1, 3);
            assert!((1..=3).contains(&v));
            saw_min |= v == 1;
            saw_max |= v == 3;
        }
        assert!(saw_min && saw_max);
    }

    #[test]
    fn test_empty_ranges_do_not_panic() {
        let mut rng = GameRng::new(1);
        assert_eq!(rng.roll_int_in_range(4, 4), 4);
        assert_eq!(rng.roll_int_in_range(9, 2), 9);
        assert_eq!(rng.roll_float_in_range(2.5, 2.5), 2.5);
    }

    #[test]
    fn test_percent_chance_extremes() {
        let mut rng = GameRng::new(3);
        for _ in 0..100 {
            assert!(!rng.roll_percent_chance(0.0));
            assert!(rng.roll_percent_chance(1.0));
            assert!(rng.roll_percent_chance(5.0)); // clamped
        }
    }

    #[test]
    fn test_weighted_index_skips_zero_weights() {
        let mut rng = GameRng::new(11);
        for _ in 0..200 {
            assert_eq!(rng.roll_weighted_index(&[0.0, 1.0, 0.0]), 1);
        }
        assert_eq!(rng.roll_weighted_index(&[0.0, 0.0]), 0);
    }

    #[test]
    fn test_direction_is_unit_length() {
        let mut rng = GameRng::new(5);
        for _ in 0..50 {
            assert!((rng.roll_direction().length() - 1.0).abs() < 1e-4);
        }
    }
}
