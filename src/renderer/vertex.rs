//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// 2D vertex with position, color and texture coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
            uv: [0.0, 0.0],
        }
    }

    pub fn at(pos: Vec2, color: [f32; 4]) -> Self {
        Self::new(pos.x, pos.y, color)
    }

    pub fn with_uv(mut self, u: f32, v: f32) -> Self {
        self.uv = [u, v];
        self
    }

    /// Raw bytes for upload to a GPU vertex buffer
    pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

/// Colors for things that are not entities
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.01, 0.01, 0.04, 1.0];
    pub const HUD_PANEL: [f32; 4] = [0.0, 0.0, 0.0, 0.45];
    pub const HUD_HEALTH: [f32; 4] = [0.9, 0.2, 0.25, 1.0];
    pub const DEBUG_PHYSICS: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const DEBUG_COSMETIC: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
    pub const POWER_UP_WEAPON: [f32; 4] = [1.0, 0.6, 0.1, 1.0];
    pub const POWER_UP_SHIELD: [f32; 4] = [0.3, 0.8, 1.0, 1.0];
    pub const POWER_UP_HEALTH: [f32; 4] = [0.2, 1.0, 0.3, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 8 * std::mem::size_of::<f32>());
        let vertices = [Vertex::new(1.0, 2.0, colors::BACKGROUND).with_uv(0.5, 1.0)];
        let bytes = Vertex::as_bytes(&vertices);
        assert_eq!(bytes.len(), std::mem::size_of::<Vertex>());
        let floats: &[f32] = bytemuck::cast_slice(bytes);
        assert_eq!(floats[0], 1.0);
        assert_eq!(floats[7], 1.0);
    }
}
