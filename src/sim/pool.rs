//! Fixed-capacity entity pools
//!
//! A pool is an arena of `N` slots, each empty or owning one entity. Insertion
//! takes the first empty slot in index order and silently fails when the pool
//! is full: capacity is the admission policy. Iteration always runs in slot
//! order, which keeps pairwise collision outcomes reproducible.

use super::entity::Entity;

/// Arena of `N` optionally occupied slots
#[derive(Debug, Clone)]
pub struct Pool<T, const N: usize> {
    slots: Vec<Option<T>>,
}

impl<T, const N: usize> Default for Pool<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Pool<T, N> {
    pub fn new() -> Self {
        Self {
            slots: (0..N).map(|_| None).collect(),
        }
    }

    /// Compile-time slot count
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Put `entity` in the first free slot and return its index.
    /// A full pool drops the entity and returns `None`.
    pub fn try_insert(&mut self, entity: T) -> Option<usize> {
        let index = self.slots.iter().position(Option::is_none)?;
        self.slots[index] = Some(entity);
        Some(index)
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Two distinct occupied slots at once (for same-pool pair tests)
    pub fn pair_mut(&mut self, a: usize, b: usize) -> Option<(&mut T, &mut T)> {
        if a == b || a >= N || b >= N {
            return None;
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.slots.split_at_mut(high);
        let low_ref = head[low].as_mut()?;
        let high_ref = tail[0].as_mut()?;
        if a < b {
            Some((low_ref, high_ref))
        } else {
            Some((high_ref, low_ref))
        }
    }

    /// Occupied entities in slot order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Occupied entities in slot order, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    /// Occupied entities with their slot index
    pub fn iter_indexed(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|e| (i, e)))
    }

    /// Indices of occupied slots, in order
    pub fn occupied_indices(&self) -> Vec<usize> {
        self.iter_indexed().map(|(i, _)| i).collect()
    }

    /// Apply `f` to every occupied slot in index order
    pub fn for_each_live(&mut self, mut f: impl FnMut(&mut T)) {
        for entity in self.iter_mut() {
            f(entity);
        }
    }

    /// Visit every unordered pair of occupied slots once, lower index first
    pub fn for_each_pair(&mut self, mut f: impl FnMut(&mut T, &mut T)) {
        let indices = self.occupied_indices();
        for (n, &a) in indices.iter().enumerate() {
            for &b in &indices[n + 1..] {
                if let Some((first, second)) = self.pair_mut(a, b) {
                    f(first, second);
                }
            }
        }
    }

    /// Empty every slot
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }
}

impl<T: Entity, const N: usize> Pool<T, N> {
    /// Drop every garbage entity and free its slot; returns how many were removed
    pub fn sweep_garbage(&mut self) -> usize {
        let mut removed = 0;
        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(|e| e.is_garbage()) {
                *slot = None;
                removed += 1;
            }
        }
        removed
    }

    /// Entities that are not dead (garbage may still be present before a sweep)
    pub fn live_count(&self) -> usize {
        self.iter().filter(|e| e.is_alive()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::debris::Star;
    use glam::Vec2;
    use proptest::prelude::*;

    fn star(x: f32) -> Star {
        Star::new(Vec2::new(x, 0.0), Vec2::ZERO, 0.2, 1.0)
    }

    #[test]
    fn test_insert_uses_first_free_slot() {
        let mut pool: Pool<Star, 3> = Pool::new();
        assert_eq!(pool.try_insert(star(0.0)), Some(0));
        assert_eq!(pool.try_insert(star(1.0)), Some(1));
        assert_eq!(pool.try_insert(star(2.0)), Some(2));
        assert!(pool.is_full());

        pool.get_mut(1).expect("occupied").core_mut().is_garbage = true;
        assert_eq!(pool.sweep_garbage(), 1);
        assert!(pool.get(1).is_none());

        // Freed slot is recycled right away
        assert_eq!(pool.try_insert(star(9.0)), Some(1));
        assert_eq!(pool.get(1).map(|s| s.core().pos.x), Some(9.0));
    }

    #[test]
    fn test_full_pool_rejects_without_side_effects() {
        let mut pool: Pool<Star, 2> = Pool::new();
        pool.try_insert(star(0.0));
        pool.try_insert(star(1.0));
        assert_eq!(pool.try_insert(star(5.0)), None);
        assert_eq!(pool.len(), 2);
        let xs: Vec<f32> = pool.iter().map(|s| s.core().pos.x).collect();
        assert_eq!(xs, vec![0.0, 1.0]);
    }

    #[test]
    fn test_swept_entities_are_never_visited_again() {
        let mut pool: Pool<Star, 4> = Pool::new();
        for i in 0..4 {
            pool.try_insert(star(i as f32));
        }
        pool.get_mut(0).expect("occupied").core_mut().is_garbage = true;
        pool.get_mut(2).expect("occupied").core_mut().is_garbage = true;
        pool.sweep_garbage();

        let mut visited = Vec::new();
        pool.for_each_live(|s| visited.push(s.core().pos.x));
        assert_eq!(visited, vec![1.0, 3.0]);
        assert_eq!(pool.occupied_indices(), vec![1, 3]);
    }

    #[test]
    fn test_pair_mut_returns_requested_order() {
        let mut pool: Pool<Star, 3> = Pool::new();
        pool.try_insert(star(0.0));
        pool.try_insert(star(1.0));
        pool.try_insert(star(2.0));

        let (a, b) = pool.pair_mut(2, 0).expect("both occupied");
        assert_eq!(a.core().pos.x, 2.0);
        assert_eq!(b.core().pos.x, 0.0);

        assert!(pool.pair_mut(1, 1).is_none());
        assert!(pool.pair_mut(0, 7).is_none());
    }

    #[test]
    fn test_pair_mut_on_empty_slot_is_none() {
        let mut pool: Pool<Star, 3> = Pool::new();
        pool.try_insert(star(0.0));
        assert!(pool.pair_mut(0, 1).is_none());
    }

    #[test]
    fn test_for_each_pair_visits_each_pair_once() {
        let mut pool: Pool<Star, 5> = Pool::new();
        for x in [0.0, 1.0, 2.0] {
            pool.try_insert(star(x));
        }
        pool.try_insert(star(3.0));
        pool.get_mut(1).expect("occupied").core_mut().is_garbage = true;
        pool.sweep_garbage();

        let mut pairs = Vec::new();
        pool.for_each_pair(|a, b| pairs.push((a.core().pos.x, b.core().pos.x)));
        assert_eq!(pairs, vec![(0.0, 2.0), (0.0, 3.0), (2.0, 3.0)]);
    }

    proptest! {
        #[test]
        fn prop_live_count_never_exceeds_capacity(ops in proptest::collection::vec(any::<(bool, u8)>(), 0..200)) {
            let mut pool: Pool<Star, 8> = Pool::new();
            for (insert, index) in ops {
                if insert {
                    let was_full = pool.is_full();
                    let before = pool.len();
                    let result = pool.try_insert(star(0.0));
                    if was_full {
                        prop_assert!(result.is_none());
                        prop_assert_eq!(pool.len(), before);
                    } else {
                        prop_assert!(result.is_some());
                    }
                } else if let Some(entity) = pool.get_mut(index as usize % 8) {
                    entity.core_mut().is_garbage = true;
                    pool.sweep_garbage();
                }
                prop_assert!(pool.len() <= pool.capacity());
            }
        }
    }
}
