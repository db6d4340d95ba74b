//! Trees.

use cgmath::Vector3;

use super::Structure;
use crate::engine_state::{
    error::VoxelError,
    voxels::block::registry::{BlockTypeRegistry, LEAVES, LOG},
};

/// `[x][y][z]`, rows top-down. 1 = leaves, 2 = log.
const BASIC_TREE_LAYOUT: [[[u8; 5]; 8]; 5] = [
    [
        [0, 0, 0, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 1, 1, 1, 0],
        [1, 1, 1, 1, 1],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
    ],
    [
        [0, 0, 0, 0, 0],
        [0, 1, 1, 1, 0],
        [1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
    ],
    [
        [0, 0, 1, 0, 0],
        [1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1],
        [0, 0, 2, 0, 0],
        [0, 0, 2, 0, 0],
        [0, 0, 2, 0, 0],
        [0, 0, 2, 0, 0],
    ],
    [
        [0, 0, 0, 0, 0],
        [0, 1, 1, 1, 0],
        [1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
    ],
    [
        [0, 0, 0, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 1, 1, 1, 0],
        [1, 1, 1, 1, 1],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
    ],
];

/// A small broadleaf tree: a four block log trunk under a leaves canopy, placed by the
/// base of its trunk.
pub struct BasicTree;

impl BasicTree {
    /// Builds the stamp, resolving `leaves` and `log` through `registry`.
    pub fn build(registry: &BlockTypeRegistry) -> Result<Structure, VoxelError> {
        let types = [None, Some(registry.get(LEAVES)?), Some(registry.get(LOG)?)];
        let mut structure = Structure::new(Vector3::new(2, 0, 2), 5, 8, 5);
        structure.create_blocks(&types, &BASIC_TREE_LAYOUT)?;
        Ok(structure)
    }
}
