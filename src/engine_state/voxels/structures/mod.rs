//! # Structures
//!
//! Pre-built block stamps (trees and the like) that generators place into the world with
//! [`World::build_structure`](crate::engine_state::voxels::world::World::build_structure).
//!
//! A stamp is a dense `width x height x length` array of optional blocks. `None` cells
//! leave whatever the terrain put there untouched.
//!
//! ## Authoring layouts
//!
//! Layouts are written as `layout[x][y][z]` arrays of indices into a type table, with the
//! `y` rows listed **top-down** so that each `x` slice reads like a picture of the
//! structure. [`Structure::create_blocks`] flips them into the bottom-up storage order.

use std::rc::Rc;

use cgmath::Vector3;

use super::block::{block_type::BlockType, Block};
use crate::engine_state::error::VoxelError;

pub mod trees;

pub use trees::BasicTree;

/// A fixed-size block stamp.
#[derive(Clone, Debug)]
pub struct Structure {
    origin: Vector3<i32>,
    width: usize,
    height: usize,
    length: usize,
    blocks: Vec<Option<Block>>,
}

impl Structure {
    /// Creates an empty stamp. `origin` is the placement point inside the stamp, so a
    /// structure built at `(x, y, z)` puts its origin cell there.
    pub fn new(origin: Vector3<i32>, width: usize, height: usize, length: usize) -> Self {
        Self {
            origin,
            width,
            height,
            length,
            blocks: vec![None; width * height * length],
        }
    }

    /// Fills the stamp from an authored layout.
    ///
    /// # Arguments
    /// * `types` - Type table. Slot `None` leaves the world untouched.
    /// * `layout` - `layout[x][y][z]` indices into `types`, `y` rows top-down.
    ///
    /// # Errors
    /// [`VoxelError::StructureSizeMismatch`] if the layout is not `width x height x length`.
    /// [`VoxelError::InvalidStructureIndex`] if an index has no slot in `types`.
    pub fn create_blocks<const W: usize, const H: usize, const L: usize>(
        &mut self,
        types: &[Option<Rc<BlockType>>],
        layout: &[[[u8; L]; H]; W],
    ) -> Result<(), VoxelError> {
        let expected = (self.width, self.height, self.length);
        if (W, H, L) != expected {
            return Err(VoxelError::StructureSizeMismatch {
                expected,
                found: (W, H, L),
            });
        }

        for (x, slice) in layout.iter().enumerate() {
            for (row, line) in slice.iter().enumerate() {
                for (z, &index) in line.iter().enumerate() {
                    let slot = types.get(index as usize).ok_or(VoxelError::InvalidStructureIndex {
                        index,
                        types: types.len(),
                    })?;
                    let y = self.height - row - 1;
                    let i = self.index(x, y, z);
                    self.blocks[i] = slot.as_ref().map(|t| Block::new(t.clone()));
                }
            }
        }
        Ok(())
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.height + y) * self.length + z
    }

    /// The stamp cell at `(x, y, z)`, bottom-up. `None` for untouched or out-of-range
    /// cells.
    pub fn block_at(&self, x: usize, y: usize, z: usize) -> Option<&Block> {
        if x >= self.width || y >= self.height || z >= self.length {
            return None;
        }
        self.blocks[self.index(x, y, z)].as_ref()
    }

    /// Every set cell of the stamp with its position inside the stamp.
    pub fn blocks(&self) -> impl Iterator<Item = (Vector3<i32>, &Block)> + '_ {
        (0..self.width).flat_map(move |x| {
            (0..self.height).flat_map(move |y| {
                (0..self.length).filter_map(move |z| {
                    self.block_at(x, y, z)
                        .map(|block| (Vector3::new(x as i32, y as i32, z as i32), block))
                })
            })
        })
    }

    /// The placement point inside the stamp.
    pub fn origin(&self) -> Vector3<i32> {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::TextureRect;

    fn stone() -> Rc<BlockType> {
        Rc::new(BlockType::with_texture("Stone", TextureRect::new(0, 0, 8, 8)))
    }

    #[test]
    fn layouts_are_flipped_top_down() {
        let mut structure = Structure::new(Vector3::new(0, 0, 0), 1, 3, 1);
        let layout = [[[1], [0], [0]]];
        structure.create_blocks(&[None, Some(stone())], &layout).unwrap();

        assert!(structure.block_at(0, 2, 0).is_some());
        assert!(structure.block_at(0, 0, 0).is_none());
        assert!(structure.block_at(0, 3, 0).is_none());
        assert_eq!(structure.blocks().count(), 1);
    }

    #[test]
    fn unknown_indices_are_rejected() {
        let mut structure = Structure::new(Vector3::new(0, 0, 0), 1, 1, 2);
        let result = structure.create_blocks(&[None, Some(stone())], &[[[0, 4]]]);
        assert_eq!(result, Err(VoxelError::InvalidStructureIndex { index: 4, types: 2 }));
    }

    #[test]
    fn layouts_of_the_wrong_size_are_rejected() {
        let mut structure = Structure::new(Vector3::new(0, 0, 0), 2, 1, 1);
        let result = structure.create_blocks(&[None, Some(stone())], &[[[1]]]);
        assert_eq!(
            result,
            Err(VoxelError::StructureSizeMismatch {
                expected: (2, 1, 1),
                found: (1, 1, 1),
            })
        );
        assert_eq!(structure.blocks().count(), 0);
    }
}
