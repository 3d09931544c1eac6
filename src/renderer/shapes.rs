//! Triangle-list generation for 2D primitives
//!
//! Every builder appends to a caller-owned buffer so one layer of the scene
//! becomes a single draw call.

use glam::Vec2;

use super::vertex::Vertex;
use crate::polar_degrees;

/// Point on a circle of `radius` around `center` at `degrees`
#[inline]
fn on_circle(center: Vec2, radius: f32, degrees: f32) -> Vec2 {
    center + polar_degrees(radius, degrees)
}

fn push_triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::at(a, color));
    out.push(Vertex::at(b, color));
    out.push(Vertex::at(c, color));
}

/// Filled disc as a triangle fan
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    let step = 360.0 / segments as f32;
    for i in 0..segments {
        let a = on_circle(center, radius, i as f32 * step);
        let b = on_circle(center, radius, (i + 1) as f32 * step);
        push_triangle(out, center, a, b, color);
    }
}

/// Hollow circle of the given line thickness, centered on `radius`
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    thickness: f32,
    color: [f32; 4],
    segments: u32,
) {
    let inner = (radius - thickness * 0.5).max(0.0);
    let outer = radius + thickness * 0.5;
    let step = 360.0 / segments as f32;
    for i in 0..segments {
        let (t1, t2) = (i as f32 * step, (i + 1) as f32 * step);
        let inner1 = on_circle(center, inner, t1);
        let outer1 = on_circle(center, outer, t1);
        let inner2 = on_circle(center, inner, t2);
        let outer2 = on_circle(center, outer, t2);
        push_triangle(out, inner1, outer1, inner2, color);
        push_triangle(out, inner2, outer1, outer2, color);
    }
}

/// Irregular filled polygon: one vertex per `outline` entry, each scaling
/// `radius`, rotated by `orientation` degrees
pub fn lumpy_polygon(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    orientation: f32,
    outline: &[f32],
    color: [f32; 4],
) {
    if outline.len() < 3 {
        return;
    }
    let step = 360.0 / outline.len() as f32;
    for (i, scale) in outline.iter().enumerate() {
        let next = outline[(i + 1) % outline.len()];
        let a = on_circle(center, radius * scale, orientation + i as f32 * step);
        let b = on_circle(center, radius * next, orientation + (i + 1) as f32 * step);
        push_triangle(out, center, a, b, color);
    }
}

/// Arrowhead pointing along `orientation`, nose at `radius` from center
pub fn arrowhead(out: &mut Vec<Vertex>, center: Vec2, radius: f32, orientation: f32, color: [f32; 4]) {
    let nose = on_circle(center, radius, orientation);
    let left = on_circle(center, radius, orientation + 140.0);
    let right = on_circle(center, radius, orientation - 140.0);
    let notch = on_circle(center, radius * 0.35, orientation + 180.0);
    push_triangle(out, nose, left, notch, color);
    push_triangle(out, nose, notch, right, color);
}

/// Axis-aligned filled rectangle
pub fn quad(out: &mut Vec<Vertex>, min: Vec2, max: Vec2, color: [f32; 4]) {
    let (a, b, c, d) = (
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
    );
    out.push(Vertex::at(a, color).with_uv(0.0, 0.0));
    out.push(Vertex::at(b, color).with_uv(1.0, 0.0));
    out.push(Vertex::at(c, color).with_uv(1.0, 1.0));
    out.push(Vertex::at(a, color).with_uv(0.0, 0.0));
    out.push(Vertex::at(c, color).with_uv(1.0, 1.0));
    out.push(Vertex::at(d, color).with_uv(0.0, 1.0));
}

/// Thick line segment between two points
pub fn line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, thickness: f32, color: [f32; 4]) {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let side = dir.perp() * (thickness * 0.5);
    push_triangle(out, from + side, from - side, to + side, color);
    push_triangle(out, to + side, from - side, to - side, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_fan_stays_within_radius() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::new(5.0, 5.0), 2.0, [1.0; 4], 12);
        assert_eq!(out.len(), 36);
        for v in &out {
            let p = Vec2::from(v.position);
            assert!(p.distance(Vec2::new(5.0, 5.0)) <= 2.0 + 1e-4);
        }
    }

    #[test]
    fn test_ring_spans_thickness() {
        let mut out = Vec::new();
        ring(&mut out, Vec2::ZERO, 3.0, 0.5, [1.0; 4], 16);
        assert_eq!(out.len(), 16 * 6);
        for v in &out {
            let r = Vec2::from(v.position).length();
            assert!(r >= 2.75 - 1e-4 && r <= 3.25 + 1e-4);
        }
    }

    #[test]
    fn test_lumpy_polygon_needs_three_points() {
        let mut out = Vec::new();
        lumpy_polygon(&mut out, Vec2::ZERO, 1.0, 0.0, &[1.0, 1.0], [1.0; 4]);
        assert!(out.is_empty());
        lumpy_polygon(&mut out, Vec2::ZERO, 1.0, 0.0, &[1.0, 0.5, 1.0, 0.5], [1.0; 4]);
        assert_eq!(out.len(), 12);
    }

    #[test]
    fn test_arrowhead_nose_leads() {
        let mut out = Vec::new();
        arrowhead(&mut out, Vec2::ZERO, 2.0, 0.0, [1.0; 4]);
        let max_x = out.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert!((max_x - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_line_is_skipped() {
        let mut out = Vec::new();
        line(&mut out, Vec2::ONE, Vec2::ONE, 1.0, [1.0; 4]);
        assert!(out.is_empty());
        line(&mut out, Vec2::ZERO, Vec2::X, 1.0, [1.0; 4]);
        assert_eq!(out.len(), 6);
    }
}
