//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a 16x64x16 column of cells plus the
//! geometry derived from it.
//!
//! ## Lifecycle
//!
//! A chunk is either *dirty* or *clean*. It starts dirty, [`Chunk::rebuild`] makes it
//! clean, and any [`Chunk::replace_block`] makes it dirty again. Rebuilding runs three
//! stages:
//!
//! 1. **Face visibility** - every occupied cell gets a fresh mask. A face is visible when
//!    the neighbour across it is empty, of an invisible type, or of an alpha-blended type.
//! 2. **Vertex reconstruction** - visible faces become triangles, split into an opaque
//!    list and a back-to-front sorted transparent list (see [`chunk_geometry`]).
//! 3. **Upload** - both lists become GPU buffers. Empty lists produce no buffer.
//!
//! Between full rebuilds the transparent list can be re-sorted on its own when the
//! camera moves, by passing `alpha_blended_only` to [`Chunk::reconstruct_vertices`].
//!
//! ## Storage
//!
//! Cells are stored densely, `x` major then `y` then `z`, which is also the scan order
//! used for opaque geometry.

use std::rc::Rc;

use cgmath::Point3;
use log::debug;
use wgpu::Device;

use chunk_border::ChunkBorder;
use chunk_geometry::{ChunkGeometry, PlacedBlock};

use super::block::{axis_directions::AxisDirections, Block, Cell};
use crate::engine_state::{error::VoxelError, rendering::VertexBuffer};

pub mod chunk_border;
pub mod chunk_geometry;

/// A fixed-size column of the world.
pub struct Chunk {
    chunk_x: i32,
    chunk_z: i32,
    cells: Vec<Cell>,
    dirty: bool,
    geometry: ChunkGeometry,
    opaque_buffer: Option<Rc<VertexBuffer>>,
    transparent_buffer: Option<Rc<VertexBuffer>>,
    /// Camera position the transparent list was last sorted for.
    last_sort_position: Option<Point3<f32>>,
}

impl Chunk {
    /// Cells along X.
    pub const WIDTH: usize = 16;
    /// Cells along Y.
    pub const HEIGHT: usize = 64;
    /// Cells along Z.
    pub const LENGTH: usize = 16;
    /// Cells in a chunk.
    pub const VOLUME: usize = Self::WIDTH * Self::HEIGHT * Self::LENGTH;

    /// Creates an empty, dirty chunk at grid position `(chunk_x, chunk_z)`.
    pub fn new(chunk_x: i32, chunk_z: i32) -> Self {
        Self {
            chunk_x,
            chunk_z,
            cells: vec![Cell::Empty; Self::VOLUME],
            dirty: true,
            geometry: ChunkGeometry::default(),
            opaque_buffer: None,
            transparent_buffer: None,
            last_sort_position: None,
        }
    }

    /// Grid position along X, in chunks.
    pub fn chunk_x(&self) -> i32 {
        self.chunk_x
    }

    /// Grid position along Z, in chunks.
    pub fn chunk_z(&self) -> i32 {
        self.chunk_z
    }

    /// World-space position of local cell `(0, 0, 0)`.
    pub fn world_origin(&self) -> Point3<f32> {
        Point3::new(
            (self.chunk_x * Self::WIDTH as i32) as f32,
            0.0,
            (self.chunk_z * Self::LENGTH as i32) as f32,
        )
    }

    /// `true` until the next [`Chunk::rebuild`].
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Forces the next frame to rebuild this chunk.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[cfg(test)]
    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    #[inline]
    fn index(x: i32, y: i32, z: i32) -> Option<usize> {
        let in_range = (0..Self::WIDTH as i32).contains(&x)
            && (0..Self::HEIGHT as i32).contains(&y)
            && (0..Self::LENGTH as i32).contains(&z);
        in_range.then(|| (x as usize * Self::HEIGHT + y as usize) * Self::LENGTH + z as usize)
    }

    /// The cell at local `(x, y, z)`, or `None` outside the chunk.
    pub fn cell_at(&self, x: i32, y: i32, z: i32) -> Option<&Cell> {
        Self::index(x, y, z).map(|i| &self.cells[i])
    }

    /// The block at local `(x, y, z)`, or `None` for empty or out-of-range cells.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> Option<&Block> {
        self.cell_at(x, y, z).and_then(Cell::block)
    }

    /// Replaces the cell at local `(x, y, z)` and marks the chunk dirty.
    ///
    /// Out-of-range coordinates are ignored.
    pub fn replace_block(&mut self, x: i32, y: i32, z: i32, cell: impl Into<Cell>) {
        if let Some(i) = Self::index(x, y, z) {
            self.cells[i] = cell.into();
            self.dirty = true;
        }
    }

    /// Recomputes every block's face mask, treating everything outside the chunk as empty.
    #[allow(dead_code)]
    pub fn reconstruct_block_face_visibility(&mut self) {
        self.reconstruct_block_face_visibility_with(&ChunkBorder::open());
    }

    /// Recomputes every block's face mask, consulting `border` for cells outside the chunk
    /// on its horizontal sides. Above and below the chunk is always empty.
    pub fn reconstruct_block_face_visibility_with(&mut self, border: &ChunkBorder) {
        for x in 0..Self::WIDTH as i32 {
            for y in 0..Self::HEIGHT as i32 {
                for z in 0..Self::LENGTH as i32 {
                    let Some(i) = Self::index(x, y, z) else {
                        continue;
                    };
                    if self.cells[i].block().is_none() {
                        continue;
                    }

                    let mut visible = AxisDirections::NONE;
                    for face in AxisDirections::FACES {
                        let Some((dx, dy, dz)) = face.neighbour_offset() else {
                            continue;
                        };
                        let (nx, ny, nz) = (x + dx, y + dy, z + dz);
                        let exposed = match self.cell_at(nx, ny, nz) {
                            Some(cell) => cell.exposes_neighbours(),
                            None => border.exposes(nx, ny, nz),
                        };
                        if exposed {
                            visible |= face;
                        }
                    }

                    if let Some(block) = self.cells[i].block_mut() {
                        block.set_face_hidden(AxisDirections::ALL);
                        block.set_face_visible(visible);
                    }
                }
            }
        }
    }

    /// Exposure flags of this chunk's outermost plane on side `face`, in the layout
    /// [`ChunkBorder`] expects.
    pub fn exposure_plane(&self, face: AxisDirections) -> Vec<bool> {
        let mut flags = Vec::new();
        match face {
            AxisDirections::X_POSITIVE | AxisDirections::X_NEGATIVE => {
                let x = if face == AxisDirections::X_POSITIVE { Self::WIDTH as i32 - 1 } else { 0 };
                for y in 0..Self::HEIGHT as i32 {
                    for z in 0..Self::LENGTH as i32 {
                        flags.push(self.cell_at(x, y, z).map_or(true, Cell::exposes_neighbours));
                    }
                }
            }
            AxisDirections::Z_POSITIVE | AxisDirections::Z_NEGATIVE => {
                let z = if face == AxisDirections::Z_POSITIVE { Self::LENGTH as i32 - 1 } else { 0 };
                for y in 0..Self::HEIGHT as i32 {
                    for x in 0..Self::WIDTH as i32 {
                        flags.push(self.cell_at(x, y, z).map_or(true, Cell::exposes_neighbours));
                    }
                }
            }
            _ => {}
        }
        flags
    }

    /// Rebuilds the CPU vertex lists from the current face masks.
    ///
    /// With `alpha_blended_only` the opaque list is left as it is and only the transparent
    /// list is re-sorted for `camera_position`.
    pub fn reconstruct_vertices(
        &mut self,
        camera_position: Point3<f32>,
        alpha_blended_only: bool,
    ) -> Result<(), VoxelError> {
        let origin = self.world_origin();
        let mut opaque = Vec::new();
        let mut transparent = Vec::new();

        for x in 0..Self::WIDTH {
            for y in 0..Self::HEIGHT {
                for z in 0..Self::LENGTH {
                    let Some(block) = self.cells[(x * Self::HEIGHT + y) * Self::LENGTH + z].block() else {
                        continue;
                    };
                    if !block.is_drawable() {
                        continue;
                    }

                    let placed = PlacedBlock {
                        block,
                        origin: Point3::new(origin.x + x as f32, y as f32, origin.z + z as f32),
                    };
                    if block.block_type().is_alpha_blended {
                        transparent.push(placed);
                    } else if !alpha_blended_only {
                        opaque.push(placed);
                    }
                }
            }
        }

        chunk_geometry::sort_back_to_front(&mut transparent, camera_position);

        let mut transparent_vertices = Vec::new();
        chunk_geometry::emit_blocks(&mut transparent_vertices, &transparent)?;

        if !alpha_blended_only {
            let mut opaque_vertices = Vec::new();
            chunk_geometry::emit_blocks(&mut opaque_vertices, &opaque)?;
            self.geometry.opaque = opaque_vertices;
        }
        self.geometry.transparent = transparent_vertices;
        self.last_sort_position = Some(camera_position);

        Ok(())
    }

    /// Uploads both vertex lists, replacing the previous buffers.
    pub fn upload_vertex_buffers(&mut self, device: &Device) {
        self.opaque_buffer =
            VertexBuffer::from_vertices(device, "Chunk Opaque Vertex Buffer", &self.geometry.opaque)
                .map(Rc::new);
        self.upload_transparent_vertex_buffer(device);
    }

    /// Uploads only the transparent vertex list.
    pub fn upload_transparent_vertex_buffer(&mut self, device: &Device) {
        self.transparent_buffer = VertexBuffer::from_vertices(
            device,
            "Chunk Transparent Vertex Buffer",
            &self.geometry.transparent,
        )
        .map(Rc::new);
    }

    /// Full rebuild with everything outside the chunk treated as empty.
    #[allow(dead_code)]
    pub fn rebuild(&mut self, device: &Device, camera_position: Point3<f32>) -> Result<(), VoxelError> {
        self.rebuild_with_border(device, camera_position, &ChunkBorder::open())
    }

    /// Full rebuild culling edge faces against `border`. Leaves the chunk clean.
    pub fn rebuild_with_border(
        &mut self,
        device: &Device,
        camera_position: Point3<f32>,
        border: &ChunkBorder,
    ) -> Result<(), VoxelError> {
        self.reconstruct_block_face_visibility_with(border);
        self.reconstruct_vertices(camera_position, false)?;
        self.upload_vertex_buffers(device);
        self.dirty = false;

        debug!(
            "Rebuilt chunk ({}, {}): {} opaque, {} transparent primitives",
            self.chunk_x,
            self.chunk_z,
            self.opaque_primitive_count(),
            self.transparent_primitive_count()
        );
        Ok(())
    }

    /// Re-sorts and re-uploads the transparent geometry for a new camera position.
    pub fn refresh_transparent_geometry(
        &mut self,
        device: &Device,
        camera_position: Point3<f32>,
    ) -> Result<(), VoxelError> {
        self.reconstruct_vertices(camera_position, true)?;
        self.upload_transparent_vertex_buffer(device);
        Ok(())
    }

    /// `true` when the chunk has alpha-blended geometry sorted for a different camera
    /// position than `camera_position`.
    pub fn needs_transparent_refresh(&self, camera_position: Point3<f32>) -> bool {
        !self.geometry.transparent.is_empty() && self.last_sort_position != Some(camera_position)
    }

    /// The CPU vertex lists from the last reconstruction.
    #[cfg(test)]
    pub(crate) fn geometry(&self) -> &ChunkGeometry {
        &self.geometry
    }

    /// The opaque GPU buffer, absent when there is no opaque geometry.
    pub fn opaque_buffer(&self) -> Option<&Rc<VertexBuffer>> {
        self.opaque_buffer.as_ref()
    }

    /// The transparent GPU buffer, absent when there is no alpha-blended geometry.
    pub fn transparent_buffer(&self) -> Option<&Rc<VertexBuffer>> {
        self.transparent_buffer.as_ref()
    }

    /// Opaque triangles from the last reconstruction.
    pub fn opaque_primitive_count(&self) -> u32 {
        self.geometry.opaque_primitive_count()
    }

    /// Transparent triangles from the last reconstruction.
    pub fn transparent_primitive_count(&self) -> u32 {
        self.geometry.transparent_primitive_count()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::MetricSpace;

    use super::*;
    use crate::engine_state::voxels::block::{
        block_type::AtlasSize,
        registry::{BlockTypeRegistry, AIR, DIRT, GRASS, LEAVES},
    };

    fn registry() -> BlockTypeRegistry {
        BlockTypeRegistry::with_standard_block_types(AtlasSize::default()).unwrap()
    }

    fn mask(chunk: &Chunk, x: i32, y: i32, z: i32) -> AxisDirections {
        chunk.block_at(x, y, z).unwrap().visible_faces()
    }

    #[test]
    fn new_chunks_are_dirty_and_empty() {
        let chunk = Chunk::new(2, -1);
        assert!(chunk.is_dirty());
        assert!(chunk.block_at(0, 0, 0).is_none());
        assert_eq!(chunk.world_origin(), Point3::new(32.0, 0.0, -16.0));
    }

    #[test]
    fn out_of_range_access_is_harmless() {
        let registry = registry();
        let mut chunk = Chunk::new(0, 0);
        chunk.replace_block(-1, 0, 0, Cell::of(&registry.get(DIRT).unwrap()));
        chunk.replace_block(0, Chunk::HEIGHT as i32, 0, Cell::of(&registry.get(DIRT).unwrap()));
        assert!(chunk.block_at(-1, 0, 0).is_none());
        assert!(chunk.block_at(0, 0, Chunk::LENGTH as i32).is_none());
        assert!(chunk.cells.iter().all(|c| *c == Cell::Empty));
    }

    #[test]
    fn isolated_block_shows_every_face() {
        let registry = registry();
        let mut chunk = Chunk::new(0, 0);
        chunk.replace_block(5, 10, 5, Cell::of(&registry.get(DIRT).unwrap()));
        chunk.reconstruct_block_face_visibility();
        assert_eq!(mask(&chunk, 5, 10, 5), AxisDirections::ALL);
    }

    #[test]
    fn shared_faces_between_opaque_blocks_are_hidden() {
        let registry = registry();
        let dirt = registry.get(DIRT).unwrap();
        let mut chunk = Chunk::new(0, 0);
        chunk.replace_block(5, 10, 5, Cell::of(&dirt));
        chunk.replace_block(6, 10, 5, Cell::of(&dirt));
        chunk.reconstruct_block_face_visibility();

        assert!(!mask(&chunk, 5, 10, 5).contains(AxisDirections::X_POSITIVE));
        assert!(!mask(&chunk, 6, 10, 5).contains(AxisDirections::X_NEGATIVE));
        assert_eq!(mask(&chunk, 5, 10, 5).count(), 5);
    }

    #[test]
    fn air_neighbour_exposes_only_the_opaque_side() {
        let registry = registry();
        let mut chunk = Chunk::new(0, 0);
        chunk.replace_block(5, 10, 5, Cell::of(&registry.get(DIRT).unwrap()));
        chunk.replace_block(5, 11, 5, Cell::of(&registry.get(AIR).unwrap()));
        chunk.reconstruct_block_face_visibility();

        assert!(mask(&chunk, 5, 10, 5).contains(AxisDirections::Y_POSITIVE));
        chunk.reconstruct_vertices(Point3::new(0.0, 0.0, 0.0), false).unwrap();
        // Only the dirt block emits geometry: 6 faces, 2 triangles each.
        assert_eq!(chunk.opaque_primitive_count(), 12);
        assert_eq!(chunk.transparent_primitive_count(), 0);
    }

    #[test]
    fn alpha_blended_neighbour_keeps_the_opaque_face() {
        let registry = registry();
        let mut chunk = Chunk::new(0, 0);
        chunk.replace_block(5, 10, 5, Cell::of(&registry.get(DIRT).unwrap()));
        chunk.replace_block(5, 10, 6, Cell::of(&registry.get(LEAVES).unwrap()));
        chunk.reconstruct_block_face_visibility();

        assert!(mask(&chunk, 5, 10, 5).contains(AxisDirections::Z_POSITIVE));
        // Leaves do not see through the opaque dirt.
        assert!(!mask(&chunk, 5, 10, 6).contains(AxisDirections::Z_NEGATIVE));
    }

    #[test]
    fn filled_chunk_only_shows_its_shell() {
        let registry = registry();
        let dirt = registry.get(DIRT).unwrap();
        let mut chunk = Chunk::new(0, 0);
        for x in 0..Chunk::WIDTH as i32 {
            for y in 0..Chunk::HEIGHT as i32 {
                for z in 0..Chunk::LENGTH as i32 {
                    chunk.replace_block(x, y, z, Cell::of(&dirt));
                }
            }
        }
        chunk.reconstruct_block_face_visibility();

        assert_eq!(mask(&chunk, 7, 30, 7), AxisDirections::NONE);
        assert_eq!(
            mask(&chunk, 0, 0, 0),
            AxisDirections::X_NEGATIVE | AxisDirections::Y_NEGATIVE | AxisDirections::Z_NEGATIVE
        );
        assert_eq!(mask(&chunk, 15, 63, 15).count(), 3);
        assert_eq!(mask(&chunk, 0, 30, 7), AxisDirections::X_NEGATIVE);
    }

    #[test]
    fn visibility_is_idempotent() {
        let registry = registry();
        let mut chunk = Chunk::new(0, 0);
        let mut rng = fastrand::Rng::with_seed(5);
        let types = [
            registry.get(DIRT).unwrap(),
            registry.get(AIR).unwrap(),
            registry.get(LEAVES).unwrap(),
        ];
        for _ in 0..500 {
            let t = &types[rng.usize(..types.len())];
            chunk.replace_block(rng.i32(0..16), rng.i32(0..64), rng.i32(0..16), Cell::of(t));
        }

        chunk.reconstruct_block_face_visibility();
        let first: Vec<_> = chunk.cells.clone();
        chunk.reconstruct_block_face_visibility();
        assert_eq!(first, chunk.cells);
    }

    #[test]
    fn primitive_counts_match_emitted_vertices() {
        let registry = registry();
        let mut chunk = Chunk::new(1, 1);
        for x in 0..4 {
            chunk.replace_block(x, 0, 0, Cell::of(&registry.get(GRASS).unwrap()));
            chunk.replace_block(x, 1, 0, Cell::of(&registry.get(LEAVES).unwrap()));
        }
        chunk.reconstruct_block_face_visibility();
        chunk.reconstruct_vertices(Point3::new(0.0, 10.0, 0.0), false).unwrap();

        let geometry = chunk.geometry();
        assert_eq!(chunk.opaque_primitive_count() as usize * 3, geometry.opaque.len());
        assert_eq!(chunk.transparent_primitive_count() as usize * 3, geometry.transparent.len());

        let opaque_faces: u32 = (0..4).map(|x| mask(&chunk, x, 0, 0).count()).sum();
        assert_eq!(chunk.opaque_primitive_count(), opaque_faces * 2);
    }

    #[test]
    fn vertices_are_in_world_space() {
        let registry = registry();
        let mut chunk = Chunk::new(2, 3);
        chunk.replace_block(0, 0, 0, Cell::of(&registry.get(DIRT).unwrap()));
        chunk.reconstruct_block_face_visibility();
        chunk.reconstruct_vertices(Point3::new(0.0, 0.0, 0.0), false).unwrap();

        for vertex in &chunk.geometry().opaque {
            assert!((32.0..=33.0).contains(&vertex.position[0]));
            assert!((48.0..=49.0).contains(&vertex.position[2]));
        }
    }

    #[test]
    fn transparent_geometry_is_sorted_farthest_first() {
        let registry = registry();
        let leaves = registry.get(LEAVES).unwrap();
        let mut chunk = Chunk::new(0, 0);
        for x in [1, 5, 9, 13] {
            chunk.replace_block(x, 20, 8, Cell::of(&leaves));
        }
        chunk.reconstruct_block_face_visibility();

        let camera = Point3::new(0.0, 20.5, 8.5);
        chunk.reconstruct_vertices(camera, false).unwrap();

        let per_block = 6 * chunk_geometry::VERTICES_PER_FACE;
        let distances: Vec<f32> = chunk
            .geometry()
            .transparent
            .chunks(per_block)
            .map(|block_vertices| {
                let min_x = block_vertices
                    .iter()
                    .map(|v| v.position[0])
                    .fold(f32::INFINITY, f32::min);
                camera.distance2(Point3::new(min_x + 0.5, 20.5, 8.5))
            })
            .collect();
        assert_eq!(distances.len(), 4);
        assert!(distances.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn alpha_only_reconstruction_keeps_opaque_geometry() {
        let registry = registry();
        let mut chunk = Chunk::new(0, 0);
        chunk.replace_block(3, 3, 3, Cell::of(&registry.get(DIRT).unwrap()));
        chunk.replace_block(8, 3, 3, Cell::of(&registry.get(LEAVES).unwrap()));
        chunk.replace_block(12, 3, 3, Cell::of(&registry.get(LEAVES).unwrap()));
        chunk.reconstruct_block_face_visibility();
        chunk.reconstruct_vertices(Point3::new(0.0, 3.5, 3.5), false).unwrap();
        let opaque_before = chunk.geometry().opaque.clone();
        let nearest_first = chunk.geometry().transparent[0].position[0];

        assert!(chunk.needs_transparent_refresh(Point3::new(20.0, 3.5, 3.5)));
        chunk.reconstruct_vertices(Point3::new(20.0, 3.5, 3.5), true).unwrap();

        assert_eq!(chunk.geometry().opaque, opaque_before);
        assert_ne!(chunk.geometry().transparent[0].position[0], nearest_first);
        assert!(!chunk.needs_transparent_refresh(Point3::new(20.0, 3.5, 3.5)));
    }

    #[test]
    fn replace_marks_dirty_again() {
        let registry = registry();
        let mut chunk = Chunk::new(0, 0);
        chunk.mark_clean();
        chunk.replace_block(1, 1, 1, Cell::of(&registry.get(DIRT).unwrap()));
        assert!(chunk.is_dirty());
    }

    #[test]
    fn border_snapshot_hides_faces_against_neighbour_chunks() {
        let registry = registry();
        let dirt = registry.get(DIRT).unwrap();
        let mut left = Chunk::new(0, 0);
        let mut right = Chunk::new(1, 0);
        left.replace_block(Chunk::WIDTH as i32 - 1, 4, 4, Cell::of(&dirt));
        right.replace_block(0, 4, 4, Cell::of(&dirt));

        let border = ChunkBorder::from_neighbours(Some(&right), None, None, None);
        left.reconstruct_block_face_visibility_with(&border);
        assert!(!mask(&left, Chunk::WIDTH as i32 - 1, 4, 4).contains(AxisDirections::X_POSITIVE));

        left.reconstruct_block_face_visibility();
        assert!(mask(&left, Chunk::WIDTH as i32 - 1, 4, 4).contains(AxisDirections::X_POSITIVE));
    }
}
