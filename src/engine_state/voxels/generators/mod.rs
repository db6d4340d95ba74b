//! # Terrain Generators
//!
//! A [`TerrainGenerator`] fills chunks with blocks and then decorates the finished world
//! with structures. The world owns one as a `Box<dyn TerrainGenerator>` and drives it
//! from [`World::generate`](super::world::World::generate):
//!
//! 1. [`TerrainGenerator::generate_chunk`] once per chunk. Must overwrite every cell and
//!    depend only on the chunk coordinates and the generator's own configuration.
//! 2. [`TerrainGenerator::generate_structures`] once for the whole world, after every
//!    chunk has terrain.
//!
//! Block types are resolved from the registry when a generator is built, so lookups
//! cannot fail mid-generation.

use std::rc::Rc;

use super::{
    block::{
        block_type::BlockType,
        registry::{BlockTypeRegistry, AIR, DIRT, GRASS},
        Cell,
    },
    chunk::Chunk,
    world::World,
};
use crate::engine_state::error::VoxelError;

pub mod flat;
pub mod perlin;

pub use flat::FlatTerrainGenerator;
pub use perlin::PerlinTerrainGenerator;

/// Fills a world with terrain and structures.
pub trait TerrainGenerator {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Replaces every cell of `chunk`.
    fn generate_chunk(&self, chunk: &mut Chunk);

    /// Places structures into a world whose chunks are all generated.
    fn generate_structures(&mut self, _world: &mut World) {}
}

/// The block types every terrain layer is made of.
#[derive(Clone, Debug)]
pub struct TerrainPalette {
    pub air: Rc<BlockType>,
    pub grass: Rc<BlockType>,
    pub dirt: Rc<BlockType>,
}

impl TerrainPalette {
    pub fn from_registry(registry: &BlockTypeRegistry) -> Result<Self, VoxelError> {
        Ok(Self {
            air: registry.get(AIR)?,
            grass: registry.get(GRASS)?,
            dirt: registry.get(DIRT)?,
        })
    }

    /// Air above `ground_level`, grass at it and dirt below.
    pub fn layer_cell(&self, y: i32, ground_level: i32) -> Cell {
        let block_type = match y.cmp(&ground_level) {
            std::cmp::Ordering::Greater => &self.air,
            std::cmp::Ordering::Equal => &self.grass,
            std::cmp::Ordering::Less => &self.dirt,
        };
        Cell::of(block_type)
    }
}

/// Which generator a world is built with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum GeneratorKind {
    Flat,
    #[default]
    Perlin,
}

/// Builds the generator selected by `kind`.
pub fn create_generator(
    kind: GeneratorKind,
    registry: &BlockTypeRegistry,
    seed: u64,
    caves: bool,
) -> Result<Box<dyn TerrainGenerator>, VoxelError> {
    Ok(match kind {
        GeneratorKind::Flat => Box::new(FlatTerrainGenerator::new(registry)?),
        GeneratorKind::Perlin => Box::new(PerlinTerrainGenerator::new(registry, seed)?.with_caves(caves)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::AtlasSize;

    #[test]
    fn palette_layers_air_grass_dirt() {
        let registry = BlockTypeRegistry::with_standard_block_types(AtlasSize::default()).unwrap();
        let palette = TerrainPalette::from_registry(&registry).unwrap();
        let name = |cell: Cell| cell.block().unwrap().block_type().name().to_string();
        assert_eq!(name(palette.layer_cell(17, 16)), "Air");
        assert_eq!(name(palette.layer_cell(16, 16)), "Grass");
        assert_eq!(name(palette.layer_cell(3, 16)), "Dirt");
    }

    #[test]
    fn generator_kind_selects_implementation() {
        let registry = BlockTypeRegistry::with_standard_block_types(AtlasSize::default()).unwrap();
        assert_eq!(create_generator(GeneratorKind::Flat, &registry, 0, false).unwrap().name(), "flat");
        assert_eq!(create_generator(GeneratorKind::Perlin, &registry, 0, true).unwrap().name(), "perlin");
    }

    #[test]
    fn missing_block_types_fail_generator_construction() {
        let registry = BlockTypeRegistry::new(AtlasSize::default());
        assert!(create_generator(GeneratorKind::Flat, &registry, 0, false).is_err());
    }
}
