//! Flat terrain with debug marker columns.

use std::rc::Rc;

use super::{TerrainGenerator, TerrainPalette};
use crate::engine_state::{
    error::VoxelError,
    voxels::{
        block::{
            block_type::BlockType,
            registry::{BlockTypeRegistry, DEBUG},
            Cell,
        },
        chunk::Chunk,
        world::World,
    },
};

/// Height of the grass layer.
pub const GROUND_LEVEL: i32 = 16;
/// Spacing of the marker columns along X and Z.
pub const MARKER_SPACING: i32 = 10;

/// Generates a level grass plain at [`GROUND_LEVEL`] and marks every
/// [`MARKER_SPACING`]th column with a pillar of debug blocks.
pub struct FlatTerrainGenerator {
    palette: TerrainPalette,
    marker: Rc<BlockType>,
    ground_level: i32,
}

impl FlatTerrainGenerator {
    pub fn new(registry: &BlockTypeRegistry) -> Result<Self, VoxelError> {
        Ok(Self {
            palette: TerrainPalette::from_registry(registry)?,
            marker: registry.get(DEBUG)?,
            ground_level: GROUND_LEVEL,
        })
    }
}

impl TerrainGenerator for FlatTerrainGenerator {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn generate_chunk(&self, chunk: &mut Chunk) {
        for x in 0..Chunk::WIDTH as i32 {
            for y in 0..Chunk::HEIGHT as i32 {
                for z in 0..Chunk::LENGTH as i32 {
                    chunk.replace_block(x, y, z, self.palette.layer_cell(y, self.ground_level));
                }
            }
        }
    }

    fn generate_structures(&mut self, world: &mut World) {
        for x in (0..world.width_in_blocks()).step_by(MARKER_SPACING as usize) {
            for z in (0..world.length_in_blocks()).step_by(MARKER_SPACING as usize) {
                for y in (self.ground_level..world.height_in_blocks()).rev() {
                    world.replace_block(x, y, z, Cell::of(&self.marker));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::AtlasSize;

    fn generator() -> FlatTerrainGenerator {
        let registry = BlockTypeRegistry::with_standard_block_types(AtlasSize::default()).unwrap();
        FlatTerrainGenerator::new(&registry).unwrap()
    }

    #[test]
    fn chunk_is_layered_around_ground_level() {
        let mut chunk = Chunk::new(3, 1);
        generator().generate_chunk(&mut chunk);

        for x in 0..Chunk::WIDTH as i32 {
            for z in 0..Chunk::LENGTH as i32 {
                assert_eq!(chunk.block_at(x, 16, z).unwrap().block_type().name(), "Grass");
                assert_eq!(chunk.block_at(x, 15, z).unwrap().block_type().name(), "Dirt");
                assert_eq!(chunk.block_at(x, 0, z).unwrap().block_type().name(), "Dirt");
                assert!(chunk.block_at(x, 17, z).unwrap().block_type().is_invisible);
            }
        }
    }
}
