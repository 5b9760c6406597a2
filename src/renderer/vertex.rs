//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex with position and color.
/// `position` is in field coordinates until the pipeline maps it to NDC.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements (sRGB, straight alpha)
pub mod colors {
    pub const SKY_TOP: [f32; 4] = [0.529, 0.808, 0.922, 1.0]; // #87CEEB
    pub const SKY_BOTTOM: [f32; 4] = [0.878, 0.957, 1.0, 1.0]; // #E0F4FF
    pub const RUG_EDGE: [f32; 4] = [0.545, 0.271, 0.075, 1.0]; // #8B4513
    pub const RUG_CENTER: [f32; 4] = [0.627, 0.322, 0.176, 1.0]; // #A0522D
    pub const RUG_STRIPE: [f32; 4] = [0.855, 0.647, 0.125, 1.0]; // Goldenrod
    pub const RUG_SHADOW: [f32; 4] = [0.0, 0.0, 0.0, 0.2];
    pub const PENGUIN_BODY: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const PENGUIN_BELLY: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const SCORE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const SCORE_OUTLINE: [f32; 4] = [0.0, 0.0, 0.0, 0.3];

    /// `color` with its alpha scaled by `alpha`
    pub fn faded(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], color[3] * alpha]
    }
}
