//! Rendering system for the voxel world.
//!
//! Chunks upload their geometry as [`VertexBuffer`]s and submit them to the
//! [`SceneRenderer`](scene_renderer::SceneRenderer) every frame. The renderer draws
//! opaque geometry first and alpha-blended geometry second, back to front.
//!
//! # Architecture
//! - `scene_renderer`: Frame protocol and the two render passes
//! - `render_queue`: GPU-free request queue and back-to-front ordering
//! - `pipeline_manager`: Opaque and alpha-blended pipelines
//! - `bind_group_state`: Scene uniform and atlas bind groups
//! - `vertex` / `vertex_buffer`: Vertex format and GPU vertex buffers
//! - `texture`: Depth buffer and block atlas textures

mod bind_group_state;
mod pipeline_manager;
pub mod render_queue;
pub mod scene_renderer;
mod texture;
mod vertex;
mod vertex_buffer;

// Re-export commonly used types
pub use vertex::Vertex;
pub use vertex_buffer::VertexBuffer;
