//! # Perlin Terrain
//!
//! Rolling hills from two octaves of 2D Perlin noise, optionally hollowed out by 3D noise
//! caves, then sprinkled with trees.
//!
//! ## Tree placement
//!
//! Every column of the world is considered once, in X then Z order. A tree is planted
//! when the forest noise at that column is above [`FOREST_THRESHOLD`], a roll of the
//! seeded placement RNG is below [`TREE_CHANCE`], and the first non-air block from the
//! top of the column is grass. Leaves of earlier trees therefore block later ones.

use std::rc::Rc;

use super::{TerrainGenerator, TerrainPalette};
use crate::engine_state::{
    error::VoxelError,
    noise::PerlinNoise,
    voxels::{
        block::{registry::BlockTypeRegistry, Cell},
        chunk::Chunk,
        structures::{BasicTree, Structure},
        world::World,
    },
};

/// Lowest possible grass level.
pub const MIN_GROUND_LEVEL: i32 = 15;
/// Highest possible grass level.
pub const MAX_GROUND_LEVEL: i32 = 45;

const TERRAIN_FREQUENCY: f64 = 0.02;
const TERRAIN_OCTAVES: u32 = 2;
const TERRAIN_PERSISTENCE: f64 = 0.7;

const CAVE_FREQUENCY: f64 = 0.04;
const CAVE_THRESHOLD: f64 = 0.75;

const FOREST_FREQUENCY: f64 = 0.05;
/// Forest noise a column needs before it can grow a tree.
pub const FOREST_THRESHOLD: f64 = 0.6;
/// Chance a forested column grows a tree.
pub const TREE_CHANCE: f64 = 0.04;

/// Noise-driven terrain generator.
pub struct PerlinTerrainGenerator {
    palette: TerrainPalette,
    terrain: PerlinNoise,
    forest: PerlinNoise,
    placement: fastrand::Rng,
    tree: Structure,
    caves: bool,
    forest_threshold: f64,
    tree_chance: f64,
}

impl PerlinTerrainGenerator {
    /// Creates a generator with caves enabled.
    ///
    /// # Arguments
    /// * `registry` - Source of the terrain and tree block types
    /// * `seed` - Seeds terrain noise, forest noise and tree placement
    pub fn new(registry: &BlockTypeRegistry, seed: u64) -> Result<Self, VoxelError> {
        Ok(Self {
            palette: TerrainPalette::from_registry(registry)?,
            terrain: PerlinNoise::new(seed),
            forest: PerlinNoise::new(seed.wrapping_add(1)),
            placement: fastrand::Rng::with_seed(seed.wrapping_add(2)),
            tree: BasicTree::build(registry)?,
            caves: true,
            forest_threshold: FOREST_THRESHOLD,
            tree_chance: TREE_CHANCE,
        })
    }

    /// Enables or disables cave carving.
    pub fn with_caves(mut self, caves: bool) -> Self {
        self.caves = caves;
        self
    }

    /// Overrides how dense forests are.
    #[cfg(test)]
    pub(crate) fn with_forest(mut self, threshold: f64, chance: f64) -> Self {
        self.forest_threshold = threshold;
        self.tree_chance = chance;
        self
    }

    /// Grass level of world column `(x, z)`.
    pub fn ground_level(&self, x: i32, z: i32) -> i32 {
        let height = self.terrain.octave_generate_2d(
            x as f64,
            z as f64,
            TERRAIN_FREQUENCY,
            TERRAIN_OCTAVES,
            TERRAIN_PERSISTENCE,
        );
        (MIN_GROUND_LEVEL as f64 + (MAX_GROUND_LEVEL - MIN_GROUND_LEVEL) as f64 * height) as i32
    }

    fn is_cave(&self, x: i32, y: i32, z: i32) -> bool {
        self.caves && self.terrain.generate_3d(x as f64, y as f64, z as f64, CAVE_FREQUENCY) > CAVE_THRESHOLD
    }

    /// Height of the grass block a tree could stand on, or `None` when the topmost
    /// non-air block of the column is anything else.
    fn grass_surface(&self, world: &World, x: i32, z: i32) -> Option<i32> {
        for y in (0..world.height_in_blocks()).rev() {
            match world.block_at(x, y, z) {
                None => continue,
                Some(block) if block.block_type().is_invisible => continue,
                Some(block) => {
                    return Rc::ptr_eq(block.block_type(), &self.palette.grass).then_some(y);
                }
            }
        }
        None
    }
}

impl TerrainGenerator for PerlinTerrainGenerator {
    fn name(&self) -> &'static str {
        "perlin"
    }

    fn generate_chunk(&self, chunk: &mut Chunk) {
        let origin_x = chunk.chunk_x() * Chunk::WIDTH as i32;
        let origin_z = chunk.chunk_z() * Chunk::LENGTH as i32;

        for x in 0..Chunk::WIDTH as i32 {
            for z in 0..Chunk::LENGTH as i32 {
                let (world_x, world_z) = (origin_x + x, origin_z + z);
                let ground_level = self.ground_level(world_x, world_z);

                for y in 0..Chunk::HEIGHT as i32 {
                    let cell = if self.is_cave(world_x, y, world_z) {
                        Cell::of(&self.palette.air)
                    } else {
                        self.palette.layer_cell(y, ground_level)
                    };
                    chunk.replace_block(x, y, z, cell);
                }
            }
        }
    }

    fn generate_structures(&mut self, world: &mut World) {
        let mut planted = 0;
        for x in 0..world.width_in_blocks() {
            for z in 0..world.length_in_blocks() {
                if self.forest.generate_2d(x as f64, z as f64, FOREST_FREQUENCY) <= self.forest_threshold {
                    continue;
                }
                if self.placement.f64() >= self.tree_chance {
                    continue;
                }
                if let Some(surface) = self.grass_surface(world, x, z) {
                    world.build_structure(x, surface + 1, z, &self.tree);
                    planted += 1;
                }
            }
        }
        log::debug!("Planted {} trees", planted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::{block_type::AtlasSize, registry::LOG};

    fn registry() -> BlockTypeRegistry {
        BlockTypeRegistry::with_standard_block_types(AtlasSize::default()).unwrap()
    }

    fn names(chunk: &Chunk) -> Vec<String> {
        let mut names = Vec::new();
        for x in 0..Chunk::WIDTH as i32 {
            for y in 0..Chunk::HEIGHT as i32 {
                for z in 0..Chunk::LENGTH as i32 {
                    names.push(chunk.block_at(x, y, z).unwrap().block_type().name().to_string());
                }
            }
        }
        names
    }

    #[test]
    fn same_seed_generates_the_same_chunk() {
        let registry = registry();
        let (mut a, mut b) = (Chunk::new(2, 5), Chunk::new(2, 5));
        PerlinTerrainGenerator::new(&registry, 99).unwrap().generate_chunk(&mut a);
        PerlinTerrainGenerator::new(&registry, 99).unwrap().generate_chunk(&mut b);
        assert_eq!(names(&a), names(&b));
    }

    #[test]
    fn ground_level_stays_in_range() {
        let generator = PerlinTerrainGenerator::new(&registry(), 7).unwrap();
        for x in (-200..200).step_by(7) {
            for z in (0..300).step_by(11) {
                let level = generator.ground_level(x, z);
                assert!((MIN_GROUND_LEVEL..=MAX_GROUND_LEVEL).contains(&level), "{}", level);
            }
        }
    }

    #[test]
    fn without_caves_every_column_has_one_grass_block_at_ground_level() {
        let generator = PerlinTerrainGenerator::new(&registry(), 3).unwrap().with_caves(false);
        let mut chunk = Chunk::new(1, 0);
        generator.generate_chunk(&mut chunk);

        for x in 0..Chunk::WIDTH as i32 {
            for z in 0..Chunk::LENGTH as i32 {
                let level = generator.ground_level(Chunk::WIDTH as i32 + x, z);
                let grass: Vec<i32> = (0..Chunk::HEIGHT as i32)
                    .filter(|&y| chunk.block_at(x, y, z).unwrap().block_type().name() == "Grass")
                    .collect();
                assert_eq!(grass, vec![level]);
            }
        }
    }

    #[test]
    fn trees_only_grow_on_grass() {
        let registry = registry();
        let generator = PerlinTerrainGenerator::new(&registry, 11)
            .unwrap()
            .with_caves(false)
            .with_forest(0.0, 0.05);
        let mut world = World::new(2, 2, Box::new(generator)).unwrap();
        world.generate();

        let log = registry.get(LOG).unwrap();
        let mut trunks = 0;
        for x in 0..world.width_in_blocks() {
            for z in 0..world.length_in_blocks() {
                for y in 1..world.height_in_blocks() {
                    let is_log = |y| {
                        world
                            .block_at(x, y, z)
                            .is_some_and(|b| Rc::ptr_eq(b.block_type(), &log))
                    };
                    if is_log(y) && !is_log(y - 1) {
                        trunks += 1;
                        assert_eq!(world.block_at(x, y - 1, z).unwrap().block_type().name(), "Grass");
                    }
                }
            }
        }
        assert!(trunks > 0);
    }
}
