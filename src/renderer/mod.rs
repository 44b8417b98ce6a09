//! WebGPU rendering module
//!
//! The scene is rebuilt from game state every frame as a flat triangle list
//! and pushed through a single pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
