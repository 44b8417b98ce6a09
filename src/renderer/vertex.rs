//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
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

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.094, 0.094, 0.106, 1.0]; // #18181b
    pub const GRID: [f32; 4] = [0.153, 0.153, 0.165, 1.0]; // #27272a
    pub const PLATFORM: [f32; 4] = [0.247, 0.247, 0.275, 1.0]; // #3f3f46
    pub const GOAL: [f32; 4] = [0.290, 0.871, 0.502, 1.0]; // #4ade80
    pub const HAZARD: [f32; 4] = [0.937, 0.267, 0.267, 1.0]; // #ef4444
    pub const HIGHLIGHT: [f32; 4] = [1.0, 1.0, 1.0, 0.05];
    pub const HELM: [f32; 4] = [0.443, 0.443, 0.478, 1.0]; // #71717a
    pub const SCARF: [f32; 4] = [0.937, 0.267, 0.267, 1.0];
    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    /// Same color with a different alpha
    pub const fn with_alpha(c: [f32; 4], a: f32) -> [f32; 4] {
        [c[0], c[1], c[2], a]
    }
}
