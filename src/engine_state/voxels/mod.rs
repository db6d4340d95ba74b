//! # Voxel World Model
//!
//! Everything that describes the block grid and how it becomes geometry.
//!
//! ## Architecture
//!
//! * **Block**: Block types, the registry that owns them, per-block face visibility
//! * **Chunk**: A 16×64×16 column of cells plus its derived geometry and GPU buffers
//! * **Generators**: Fill chunks with terrain and place structures on top
//! * **Structures**: Small authored block layouts stamped into the world, such as trees
//! * **World**: The fixed chunk grid, world-space block access and per-frame preparation
//!
//! ## Data Flow
//!
//! 1. A generator fills every chunk, then places structures through the world
//! 2. Every block write marks its chunk dirty, and the neighbour too on a shared edge
//! 3. Before drawing, dirty chunks recompute face visibility and rebuild their buffers
//! 4. Chunks submit their buffers to the scene renderer

pub mod block;
pub mod chunk;
pub mod generators;
pub mod structures;
pub mod world;
