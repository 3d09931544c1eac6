//! Disc geometry: overlap tests and push-apart correction
//!
//! Every collider in the game is a disc (center + radius). Overlap includes
//! touching: two discs overlap when the distance between centers is at most
//! the sum of their radii.

use glam::Vec2;

/// Center-to-center distance below which the separation axis is undefined
const DEGENERATE_DISTANCE: f32 = 1e-6;

/// A circle in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub center: Vec2,
    pub radius: f32,
}

/// Penetration between two overlapping discs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscContact {
    /// Unit axis pointing from the first disc toward the second
    pub normal: Vec2,
    /// (ra + rb) - distance, never negative
    pub depth: f32,
}

impl Disc {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    #[inline]
    pub fn overlaps(&self, other: &Disc) -> bool {
        do_discs_overlap(self.center, self.radius, other.center, other.radius)
    }

    /// Contact info when overlapping, `None` otherwise
    pub fn contact(&self, other: &Disc) -> Option<DiscContact> {
        let delta = other.center - self.center;
        let distance = delta.length();
        let depth = (self.radius + other.radius) - distance;
        if depth < 0.0 {
            return None;
        }
        // Identical centers: any axis separates them
        let normal = if distance > DEGENERATE_DISTANCE {
            delta / distance
        } else {
            Vec2::X
        };
        Some(DiscContact { normal, depth })
    }
}

/// Symmetric by construction: both the squared distance and the radius sum
/// are independent of argument order.
#[inline]
pub fn do_discs_overlap(center_a: Vec2, radius_a: f32, center_b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    center_a.distance_squared(center_b) <= reach * reach
}

/// Move both discs apart along the center axis, half the overlap each.
/// Returns true when they were overlapping.
pub fn push_discs_apart(a: &mut Vec2, radius_a: f32, b: &mut Vec2, radius_b: f32) -> bool {
    let Some(contact) = Disc::new(*a, radius_a).contact(&Disc::new(*b, radius_b)) else {
        return false;
    };
    let half = contact.normal * (contact.depth * 0.5);
    *a -= half;
    *b += half;
    true
}

/// Move only `movable` out of a disc that holds its position.
/// Returns true when they were overlapping.
pub fn push_disc_out_of_fixed_disc(
    fixed: Vec2,
    fixed_radius: f32,
    movable: &mut Vec2,
    movable_radius: f32,
) -> bool {
    let Some(contact) = Disc::new(fixed, fixed_radius).contact(&Disc::new(*movable, movable_radius)) else {
        return false;
    };
    *movable += contact.normal * contact.depth;
    true
}
