//! # World Module
//!
//! This module provides the `World` struct, a fixed rectangular grid of chunks plus the
//! terrain generator that fills them.
//!
//! ## Coordinates
//!
//! World block coordinates start at `(0, 0, 0)` and run to
//! `(width_in_blocks, height_in_blocks, length_in_blocks)` exclusive. They map onto a chunk
//! grid position and a chunk-local position by integer division and remainder, see
//! [`World::world_to_chunk`]. Anything outside that box is simply not there: lookups
//! return `None` and writes are ignored.
//!
//! ## Frame Flow
//!
//! 1. [`World::generate`] runs once after construction.
//! 2. [`World::prepare_geometry`] runs every frame before drawing. Dirty chunks are rebuilt
//!    completely, culling their edge faces against the neighbouring chunks. Clean chunks
//!    only re-sort their alpha-blended geometry when the camera moved.
//! 3. [`World::draw`] hands every chunk's buffers to the scene renderer.

use std::fmt;

use cgmath::Point3;
use log::{info, trace};
use wgpu::Device;

use super::{
    block::{Block, Cell},
    chunk::{chunk_border::ChunkBorder, Chunk},
    generators::TerrainGenerator,
    structures::Structure,
};
use crate::engine_state::{error::VoxelError, rendering::scene_renderer::SceneRenderer};

/// Position of a chunk in the chunk grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkPosition {
    pub x: i32,
    pub z: i32,
}

/// Position of a cell inside its chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LocalPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// A fixed-size voxel world.
pub struct World {
    width_in_chunks: i32,
    length_in_chunks: i32,
    /// Row-major by Z: chunk `(cx, cz)` lives at `cz * width_in_chunks + cx`.
    chunks: Vec<Chunk>,
    /// Taken out while it runs so it can borrow the world mutably.
    generator: Option<Box<dyn TerrainGenerator>>,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("width_in_chunks", &self.width_in_chunks)
            .field("length_in_chunks", &self.length_in_chunks)
            .field("generator", &self.generator.as_ref().map(|g| g.name()))
            .finish()
    }
}

impl World {
    /// Creates a world of empty chunks.
    ///
    /// # Arguments
    /// * `width_in_chunks` - Chunks along X
    /// * `length_in_chunks` - Chunks along Z
    /// * `generator` - Terrain generator used by [`World::generate`]
    ///
    /// # Errors
    /// [`VoxelError::WorldTooLarge`] if the world's extent in blocks does not fit in `i32`.
    pub fn new(
        width_in_chunks: u32,
        length_in_chunks: u32,
        generator: Box<dyn TerrainGenerator>,
    ) -> Result<Self, VoxelError> {
        let too_large = VoxelError::WorldTooLarge {
            width_in_chunks,
            length_in_chunks,
        };
        let in_blocks = |chunks: u32, size: usize| {
            i32::try_from(chunks)
                .ok()
                .filter(|chunks| chunks.checked_mul(size as i32).is_some())
        };
        let (Some(width), Some(length)) = (
            in_blocks(width_in_chunks, Chunk::WIDTH),
            in_blocks(length_in_chunks, Chunk::LENGTH),
        ) else {
            return Err(too_large);
        };
        let count = (width as usize).checked_mul(length as usize).ok_or(too_large)?;

        let mut chunks = Vec::with_capacity(count);
        for chunk_z in 0..length {
            for chunk_x in 0..width {
                chunks.push(Chunk::new(chunk_x, chunk_z));
            }
        }

        Ok(Self {
            width_in_chunks: width,
            length_in_chunks: length,
            chunks,
            generator: Some(generator),
        })
    }

    /// Fills every chunk with terrain, then lets the generator place structures.
    pub fn generate(&mut self) {
        let Some(mut generator) = self.generator.take() else {
            return;
        };

        for chunk in &mut self.chunks {
            generator.generate_chunk(chunk);
        }
        generator.generate_structures(self);

        info!(
            "Generated {} chunks with the {} generator",
            self.chunks.len(),
            generator.name()
        );
        self.generator = Some(generator);
    }

    /// Splits world coordinates into a chunk position and a local position.
    ///
    /// Returns `None` outside the world.
    pub fn world_to_chunk(&self, x: i32, y: i32, z: i32) -> Option<(ChunkPosition, LocalPosition)> {
        let in_range = (0..self.width_in_blocks()).contains(&x)
            && (0..self.height_in_blocks()).contains(&y)
            && (0..self.length_in_blocks()).contains(&z);
        if !in_range {
            return None;
        }

        let (width, length) = (Chunk::WIDTH as i32, Chunk::LENGTH as i32);
        Some((
            ChunkPosition { x: x / width, z: z / length },
            LocalPosition { x: x % width, y, z: z % length },
        ))
    }

    /// Inverse of [`World::world_to_chunk`].
    #[allow(dead_code)]
    pub fn chunk_to_world(&self, chunk: ChunkPosition, local: LocalPosition) -> Point3<i32> {
        Point3::new(
            chunk.x * Chunk::WIDTH as i32 + local.x,
            local.y,
            chunk.z * Chunk::LENGTH as i32 + local.z,
        )
    }

    fn chunk_index(&self, chunk_x: i32, chunk_z: i32) -> Option<usize> {
        let in_range = (0..self.width_in_chunks).contains(&chunk_x)
            && (0..self.length_in_chunks).contains(&chunk_z);
        in_range.then(|| (chunk_z * self.width_in_chunks + chunk_x) as usize)
    }

    /// The block at world `(x, y, z)`, or `None` for empty or out-of-range cells.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> Option<&Block> {
        let (chunk, local) = self.world_to_chunk(x, y, z)?;
        self.chunk(chunk.x, chunk.z)?.block_at(local.x, local.y, local.z)
    }

    /// Replaces the cell at world `(x, y, z)`.
    ///
    /// Out-of-range coordinates are ignored. Cells on a chunk's X or Z edge also mark the
    /// chunk across that edge dirty, since its edge faces may change.
    pub fn replace_block(&mut self, x: i32, y: i32, z: i32, cell: impl Into<Cell>) {
        let Some((chunk, local)) = self.world_to_chunk(x, y, z) else {
            return;
        };

        if let Some(target) = self.chunk_mut(chunk.x, chunk.z) {
            target.replace_block(local.x, local.y, local.z, cell);
        }

        let mut neighbours = Vec::with_capacity(2);
        if local.x == 0 {
            neighbours.push((chunk.x - 1, chunk.z));
        } else if local.x == Chunk::WIDTH as i32 - 1 {
            neighbours.push((chunk.x + 1, chunk.z));
        }
        if local.z == 0 {
            neighbours.push((chunk.x, chunk.z - 1));
        } else if local.z == Chunk::LENGTH as i32 - 1 {
            neighbours.push((chunk.x, chunk.z + 1));
        }
        for (chunk_x, chunk_z) in neighbours {
            if let Some(neighbour) = self.chunk_mut(chunk_x, chunk_z) {
                neighbour.mark_dirty();
            }
        }
    }

    /// Stamps `structure` so that its origin lands on world `(x, y, z)`.
    ///
    /// Only the stamp's set cells are written; the rest of the world is left alone.
    pub fn build_structure(&mut self, x: i32, y: i32, z: i32, structure: &Structure) {
        let base_x = x - structure.origin().x;
        let base_y = y - structure.origin().y;
        let base_z = z - structure.origin().z;

        for (offset, block) in structure.blocks() {
            self.replace_block(
                base_x + offset.x,
                base_y + offset.y,
                base_z + offset.z,
                block.clone(),
            );
        }
    }

    /// Snapshot of the planes touching chunk `(chunk_x, chunk_z)` from its neighbours.
    pub fn chunk_border(&self, chunk_x: i32, chunk_z: i32) -> ChunkBorder {
        ChunkBorder::from_neighbours(
            self.chunk(chunk_x + 1, chunk_z),
            self.chunk(chunk_x - 1, chunk_z),
            self.chunk(chunk_x, chunk_z + 1),
            self.chunk(chunk_x, chunk_z - 1),
        )
    }

    /// Brings every chunk's GPU geometry up to date for `camera_position`.
    pub fn prepare_geometry(&mut self, device: &Device, camera_position: Point3<f32>) -> Result<(), VoxelError> {
        for i in 0..self.chunks.len() {
            let (chunk_x, chunk_z) = (self.chunks[i].chunk_x(), self.chunks[i].chunk_z());

            if self.chunks[i].is_dirty() {
                let border = self.chunk_border(chunk_x, chunk_z);
                self.chunks[i].rebuild_with_border(device, camera_position, &border)?;
            } else if self.chunks[i].needs_transparent_refresh(camera_position) {
                trace!("Re-sorting transparent geometry of chunk ({}, {})", chunk_x, chunk_z);
                self.chunks[i].refresh_transparent_geometry(device, camera_position)?;
            }
        }
        Ok(())
    }

    /// Queues every chunk's buffers on `renderer`: opaque first, alpha-blended at the
    /// chunk's world origin.
    pub fn draw(&self, renderer: &mut SceneRenderer) {
        for chunk in &self.chunks {
            if let Some(buffer) = chunk.opaque_buffer() {
                renderer.draw_vertices(buffer.clone());
            }
            if let Some(buffer) = chunk.transparent_buffer() {
                renderer.draw_alpha_blended_vertices(buffer.clone(), chunk.world_origin());
            }
        }
    }

    /// Extent of the world along X, in blocks.
    pub fn width_in_blocks(&self) -> i32 {
        self.width_in_chunks * Chunk::WIDTH as i32
    }

    /// Extent of the world along Y, in blocks.
    pub fn height_in_blocks(&self) -> i32 {
        Chunk::HEIGHT as i32
    }

    /// Extent of the world along Z, in blocks.
    pub fn length_in_blocks(&self) -> i32 {
        self.length_in_chunks * Chunk::LENGTH as i32
    }

    /// The chunk at grid position `(chunk_x, chunk_z)`.
    pub fn chunk(&self, chunk_x: i32, chunk_z: i32) -> Option<&Chunk> {
        self.chunk_index(chunk_x, chunk_z).map(|i| &self.chunks[i])
    }

    /// Mutable access to the chunk at grid position `(chunk_x, chunk_z)`.
    pub fn chunk_mut(&mut self, chunk_x: i32, chunk_z: i32) -> Option<&mut Chunk> {
        self.chunk_index(chunk_x, chunk_z).map(move |i| &mut self.chunks[i])
    }

    /// Every chunk, row-major by Z.
    #[cfg(test)]
    pub(crate) fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Centre of the world's bounding box.
    pub fn centre(&self) -> Point3<f32> {
        Point3::new(
            self.width_in_blocks() as f32 / 2.0,
            self.height_in_blocks() as f32 / 2.0,
            self.length_in_blocks() as f32 / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::engine_state::voxels::{
        block::{
            axis_directions::AxisDirections,
            block_type::AtlasSize,
            registry::{BlockTypeRegistry, DIRT},
        },
        generators::FlatTerrainGenerator,
    };

    struct EmptyGenerator;

    impl TerrainGenerator for EmptyGenerator {
        fn name(&self) -> &'static str {
            "empty"
        }

        fn generate_chunk(&self, _chunk: &mut Chunk) {}
    }

    fn registry() -> BlockTypeRegistry {
        BlockTypeRegistry::with_standard_block_types(AtlasSize::default()).unwrap()
    }

    fn empty_world(width: u32, length: u32) -> World {
        World::new(width, length, Box::new(EmptyGenerator)).unwrap()
    }

    fn clean_all(world: &mut World) {
        for chunk in &mut world.chunks {
            chunk.mark_clean();
        }
    }

    #[test]
    fn grid_is_fully_populated() {
        let world = empty_world(3, 2);
        assert_eq!(world.chunks().len(), 6);
        assert_eq!(world.width_in_blocks(), 48);
        assert_eq!(world.length_in_blocks(), 32);
        assert_eq!(world.height_in_blocks(), 64);
        let chunk = world.chunk(2, 1).unwrap();
        assert_eq!((chunk.chunk_x(), chunk.chunk_z()), (2, 1));
        assert!(world.chunk(3, 0).is_none());
    }

    #[test]
    fn oversized_worlds_are_rejected() {
        let result = World::new(u32::MAX, 1, Box::new(EmptyGenerator));
        assert!(matches!(
            result,
            Err(VoxelError::WorldTooLarge { width_in_chunks: u32::MAX, length_in_chunks: 1 })
        ));

        let past_block_range = (i32::MAX as u32) / Chunk::LENGTH as u32 + 1;
        assert!(World::new(1, past_block_range, Box::new(EmptyGenerator)).is_err());
    }

    #[test]
    fn out_of_range_access_is_ignored() {
        let registry = registry();
        let mut world = empty_world(1, 1);
        world.replace_block(-1, 0, 0, Cell::of(&registry.get(DIRT).unwrap()));
        world.replace_block(0, 64, 0, Cell::of(&registry.get(DIRT).unwrap()));
        world.replace_block(0, 0, 16, Cell::of(&registry.get(DIRT).unwrap()));
        assert!(world.block_at(-1, 0, 0).is_none());
        assert!(world.block_at(0, 64, 0).is_none());
        assert!(world.world_to_chunk(16, 0, 0).is_none());
    }

    #[test]
    fn replace_then_read_back() {
        let registry = registry();
        let mut world = empty_world(2, 2);
        world.replace_block(20, 5, 31, Cell::of(&registry.get(DIRT).unwrap()));
        assert_eq!(world.block_at(20, 5, 31).unwrap().block_type().name(), "Dirt");
        assert_eq!(world.chunk(1, 1).unwrap().block_at(4, 5, 15).unwrap().block_type().name(), "Dirt");
    }

    #[test]
    fn edge_replacement_dirties_the_neighbour() {
        let registry = registry();
        let mut world = empty_world(2, 2);
        clean_all(&mut world);

        world.replace_block(15, 3, 4, Cell::of(&registry.get(DIRT).unwrap()));
        assert!(world.chunk(0, 0).unwrap().is_dirty());
        assert!(world.chunk(1, 0).unwrap().is_dirty());
        assert!(!world.chunk(0, 1).unwrap().is_dirty());

        clean_all(&mut world);
        world.replace_block(5, 3, 5, Cell::of(&registry.get(DIRT).unwrap()));
        assert!(!world.chunk(1, 0).unwrap().is_dirty());
    }

    #[test]
    fn structures_are_stamped_relative_to_their_origin() {
        let registry = registry();
        let mut world = empty_world(1, 1);
        let tree = crate::engine_state::voxels::structures::BasicTree::build(&registry).unwrap();
        world.build_structure(8, 10, 8, &tree);

        for y in 10..14 {
            assert_eq!(world.block_at(8, y, 8).unwrap().block_type().name(), "Wooden log");
        }
        assert_eq!(world.block_at(8, 17, 8).unwrap().block_type().name(), "Leaves");
        assert_eq!(world.block_at(6, 14, 6).unwrap().block_type().name(), "Leaves");
        assert!(world.block_at(6, 10, 6).is_none());
    }

    #[test]
    fn flat_world_end_to_end() {
        let registry = registry();
        let mut world = World::new(2, 2, Box::new(FlatTerrainGenerator::new(&registry).unwrap())).unwrap();
        world.generate();

        // Marker columns run from the top of the world down to the ground.
        for y in 16..64 {
            assert_eq!(world.block_at(10, y, 20).unwrap().block_type().name(), "Debug");
        }
        assert_eq!(world.block_at(10, 15, 20).unwrap().block_type().name(), "Dirt");

        let camera = Point3::new(16.0, 40.0, 16.0);
        for chunk_z in 0..2 {
            for chunk_x in 0..2 {
                let border = world.chunk_border(chunk_x, chunk_z);
                let chunk = world.chunk_mut(chunk_x, chunk_z).unwrap();
                chunk.reconstruct_block_face_visibility_with(&border);
                chunk.reconstruct_vertices(camera, false).unwrap();
            }
        }

        let grass = world.block_at(5, 16, 5).unwrap();
        assert_eq!(grass.block_type().name(), "Grass");
        assert!(grass.visible_faces().contains(AxisDirections::Y_POSITIVE));
        // Ground continues into the next chunk, so the shared edge face is culled.
        assert!(!world
            .block_at(15, 16, 5)
            .unwrap()
            .visible_faces()
            .contains(AxisDirections::X_POSITIVE));

        let dirt = world.block_at(5, 15, 5).unwrap();
        assert!(!dirt.visible_faces().contains(AxisDirections::Y_POSITIVE));

        assert!(world.block_at(5, 17, 5).unwrap().block_type().is_invisible);
        for chunk in world.chunks() {
            assert!(chunk.geometry().opaque.iter().all(|v| v.position[1] <= 17.0));
            assert!(chunk.transparent_primitive_count() > 0);
        }
    }

    proptest! {
        #[test]
        fn world_coordinates_round_trip(x in 0..64i32, y in 0..64i32, z in 0..48i32) {
            let world = empty_world(4, 3);
            let (chunk, local) = world.world_to_chunk(x, y, z).unwrap();
            prop_assert!((0..16).contains(&local.x) && (0..16).contains(&local.z));
            prop_assert_eq!(world.chunk_to_world(chunk, local), Point3::new(x, y, z));
        }
    }
}
