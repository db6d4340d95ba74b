//! # Chunk Border
//!
//! A read-only snapshot of the cells bordering a chunk on its four horizontal sides.
//! The world takes one from the neighbouring chunks before rebuilding a chunk, so faces
//! on the chunk edge can be culled against blocks that live in another chunk.
//!
//! Each plane stores, per cell, whether that neighbour cell exposes the face touching it
//! (see [`Cell::exposes_neighbours`](crate::engine_state::voxels::block::Cell::exposes_neighbours)).
//! A missing plane means there is no chunk on that side and everything is exposed.

use super::Chunk;
use crate::engine_state::voxels::block::axis_directions::AxisDirections;

/// Exposure flags of the neighbouring chunks' touching planes.
#[derive(Default, Debug, Clone)]
pub struct ChunkBorder {
    /// Plane `x = 0` of the chunk on the +X side, indexed `y * LENGTH + z`.
    x_positive: Option<Vec<bool>>,
    /// Plane `x = WIDTH - 1` of the chunk on the -X side, indexed `y * LENGTH + z`.
    x_negative: Option<Vec<bool>>,
    /// Plane `z = 0` of the chunk on the +Z side, indexed `y * WIDTH + x`.
    z_positive: Option<Vec<bool>>,
    /// Plane `z = LENGTH - 1` of the chunk on the -Z side, indexed `y * WIDTH + x`.
    z_negative: Option<Vec<bool>>,
}

impl ChunkBorder {
    /// A border with no neighbours: every outside cell counts as empty.
    pub fn open() -> Self {
        Self::default()
    }

    /// Snapshots the planes of whichever neighbours exist.
    pub fn from_neighbours(
        x_positive: Option<&Chunk>,
        x_negative: Option<&Chunk>,
        z_positive: Option<&Chunk>,
        z_negative: Option<&Chunk>,
    ) -> Self {
        Self {
            x_positive: x_positive.map(|c| c.exposure_plane(AxisDirections::X_NEGATIVE)),
            x_negative: x_negative.map(|c| c.exposure_plane(AxisDirections::X_POSITIVE)),
            z_positive: z_positive.map(|c| c.exposure_plane(AxisDirections::Z_NEGATIVE)),
            z_negative: z_negative.map(|c| c.exposure_plane(AxisDirections::Z_POSITIVE)),
        }
    }

    /// Whether the cell at chunk-local `(x, y, z)`, which lies just outside the chunk on
    /// one horizontal side, exposes the face of the block next to it.
    pub fn exposes(&self, x: i32, y: i32, z: i32) -> bool {
        if y < 0 || y >= Chunk::HEIGHT as i32 {
            return true;
        }
        let y = y as usize;

        let (plane, index) = if x >= Chunk::WIDTH as i32 {
            (&self.x_positive, y * Chunk::LENGTH + z as usize)
        } else if x < 0 {
            (&self.x_negative, y * Chunk::LENGTH + z as usize)
        } else if z >= Chunk::LENGTH as i32 {
            (&self.z_positive, y * Chunk::WIDTH + x as usize)
        } else if z < 0 {
            (&self.z_negative, y * Chunk::WIDTH + x as usize)
        } else {
            return true;
        };

        plane
            .as_ref()
            .and_then(|flags| flags.get(index).copied())
            .unwrap_or(true)
    }
}
