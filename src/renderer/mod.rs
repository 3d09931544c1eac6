//! Rendering interface
//!
//! The game never talks to a graphics API directly. It builds triangle lists
//! in world space and hands them to a [`Renderer`], which owns the device.

pub mod scene;
pub mod shapes;
pub mod vertex;

use glam::Vec2;

pub use scene::render_game;
pub use vertex::Vertex;

/// Opaque texture id handed out by the backend
pub type TextureHandle = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Alpha,
    Additive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterizerMode {
    #[default]
    SolidCullNone,
    WireframeCullNone,
}

/// Graphics backend service
pub trait Renderer {
    /// Orthographic view covering `min..max` in world units
    fn set_camera(&mut self, min: Vec2, max: Vec2);
    fn bind_texture(&mut self, texture: Option<TextureHandle>);
    fn set_blend_mode(&mut self, mode: BlendMode);
    fn set_rasterizer_mode(&mut self, mode: RasterizerMode);
    /// Draw a triangle list with the current state
    fn draw_vertex_array(&mut self, vertices: &[Vertex]);
}

/// One submitted batch and the state it was drawn with
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub vertex_count: usize,
    pub blend: BlendMode,
    pub rasterizer: RasterizerMode,
    pub texture: Option<TextureHandle>,
    pub camera: (Vec2, Vec2),
}

/// Renderer that keeps a log of draw calls instead of drawing
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<DrawCall>,
    blend: BlendMode,
    rasterizer: RasterizerMode,
    texture: Option<TextureHandle>,
    camera: (Vec2, Vec2),
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_vertices(&self) -> usize {
        self.calls.iter().map(|c| c.vertex_count).sum()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn set_camera(&mut self, min: Vec2, max: Vec2) {
        self.camera = (min, max);
    }

    fn bind_texture(&mut self, texture: Option<TextureHandle>) {
        self.texture = texture;
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn set_rasterizer_mode(&mut self, mode: RasterizerMode) {
        self.rasterizer = mode;
    }

    fn draw_vertex_array(&mut self, vertices: &[Vertex]) {
        if vertices.is_empty() {
            return;
        }
        self.calls.push(DrawCall {
            vertex_count: vertices.len(),
            blend: self.blend,
            rasterizer: self.rasterizer,
            texture: self.texture,
            camera: self.camera,
        });
    }
}
