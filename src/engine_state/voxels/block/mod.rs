//! # Block Module
//!
//! This module provides the block-level data model:
//!
//! * [`BlockType`](block_type::BlockType) - shared, immutable per-kind properties
//! * [`BlockTypeRegistry`](registry::BlockTypeRegistry) - id to type lookup
//! * [`AxisDirections`](axis_directions::AxisDirections) - face bit flags
//! * [`Block`] - one placed voxel: a type plus its current face visibility mask
//! * [`Cell`] - a chunk slot, which may hold no voxel at all

use std::rc::Rc;

use axis_directions::AxisDirections;
use block_type::BlockType;

pub mod axis_directions;
pub mod block_type;
pub mod registry;

/// A single voxel placed in the world.
///
/// The visibility mask is derived state: chunks recompute it from the neighbourhood
/// before building geometry, so a freshly created block starts with every face hidden.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    block_type: Rc<BlockType>,
    visible_faces: AxisDirections,
}

impl Block {
    /// Creates a block of `block_type` with every face hidden.
    pub fn new(block_type: Rc<BlockType>) -> Self {
        Self {
            block_type,
            visible_faces: AxisDirections::NONE,
        }
    }

    /// The shared type of this block.
    pub fn block_type(&self) -> &Rc<BlockType> {
        &self.block_type
    }

    /// Faces currently marked visible.
    pub fn visible_faces(&self) -> AxisDirections {
        self.visible_faces
    }

    /// Marks `faces` visible, leaving the others untouched.
    pub fn set_face_visible(&mut self, faces: AxisDirections) {
        self.visible_faces |= faces;
    }

    /// Marks `faces` hidden, leaving the others untouched.
    pub fn set_face_hidden(&mut self, faces: AxisDirections) {
        self.visible_faces = self.visible_faces & !faces;
    }

    /// `true` when the block contributes geometry at all.
    pub fn is_drawable(&self) -> bool {
        !self.block_type.is_invisible && !self.visible_faces.is_empty()
    }
}

/// The content of one chunk slot.
///
/// `Empty` means no voxel was ever placed there, which is different from a slot holding a
/// block of the invisible air type. Both expose their neighbours' faces.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Cell {
    /// No voxel.
    #[default]
    Empty,
    /// A placed voxel.
    Occupied(Block),
}

impl Cell {
    /// Wraps a fresh block of `block_type`.
    pub fn of(block_type: &Rc<BlockType>) -> Self {
        Cell::Occupied(Block::new(block_type.clone()))
    }

    /// The block in this slot, if any.
    pub fn block(&self) -> Option<&Block> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(block) => Some(block),
        }
    }

    /// Mutable access to the block in this slot, if any.
    pub fn block_mut(&mut self) -> Option<&mut Block> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(block) => Some(block),
        }
    }

    /// Whether a block next to this slot shows the face that touches it.
    pub fn exposes_neighbours(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Occupied(block) => block.block_type.exposes_neighbours(),
        }
    }
}

impl From<Block> for Cell {
    fn from(block: Block) -> Self {
        Cell::Occupied(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::TextureRect;

    fn dirt() -> Rc<BlockType> {
        Rc::new(BlockType::with_texture("Dirt", TextureRect::new(16, 0, 8, 8)))
    }

    #[test]
    fn visibility_bits_toggle_independently() {
        let mut block = Block::new(dirt());
        assert_eq!(block.visible_faces(), AxisDirections::NONE);

        block.set_face_visible(AxisDirections::ALL);
        block.set_face_hidden(AxisDirections::Y_NEGATIVE | AxisDirections::X_POSITIVE);
        assert!(!block.visible_faces().contains(AxisDirections::Y_NEGATIVE));
        assert!(!block.visible_faces().contains(AxisDirections::X_POSITIVE));
        assert_eq!(block.visible_faces().count(), 4);

        block.set_face_visible(AxisDirections::Y_NEGATIVE);
        assert!(block.visible_faces().contains(AxisDirections::Y_NEGATIVE));
    }

    #[test]
    fn empty_and_air_both_expose_neighbours() {
        let air = Rc::new(BlockType::new("Air").invisible());
        assert!(Cell::Empty.exposes_neighbours());
        assert!(Cell::of(&air).exposes_neighbours());
        assert!(!Cell::of(&dirt()).exposes_neighbours());
        assert_ne!(Cell::Empty, Cell::of(&air));
    }

    #[test]
    fn invisible_blocks_are_never_drawable() {
        let mut air = Block::new(Rc::new(BlockType::new("Air").invisible()));
        air.set_face_visible(AxisDirections::ALL);
        assert!(!air.is_drawable());
    }
}
