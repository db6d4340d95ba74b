//! # Chunk Geometry
//!
//! CPU-side vertex construction for a chunk.
//!
//! Every visible face becomes a quad of two triangles, six vertices, with no index buffer.
//! Corners are emitted counter-clockwise as seen from outside the block, so the render
//! pipeline can cull back faces with `FrontFace::Ccw`.
//!
//! Opaque blocks are emitted in scan order. Alpha-blended blocks are sorted by squared
//! distance from the camera to the block centre, farthest first, so that blending
//! composites correctly inside a single draw.

use std::cmp::Ordering;

use cgmath::{MetricSpace, Point3};

use crate::engine_state::{
    error::VoxelError,
    rendering::Vertex,
    voxels::block::{axis_directions::AxisDirections, Block},
};

/// Vertices emitted per visible face.
pub const VERTICES_PER_FACE: usize = 6;

/// The two vertex lists of a chunk.
#[derive(Default, Debug, Clone)]
pub struct ChunkGeometry {
    /// Opaque faces in scan order.
    pub opaque: Vec<Vertex>,
    /// Alpha-blended faces, farthest block first.
    pub transparent: Vec<Vertex>,
}

impl ChunkGeometry {
    /// Triangles in the opaque list.
    pub fn opaque_primitive_count(&self) -> u32 {
        (self.opaque.len() / 3) as u32
    }

    /// Triangles in the transparent list.
    pub fn transparent_primitive_count(&self) -> u32 {
        (self.transparent.len() / 3) as u32
    }
}

/// A block scheduled for emission together with its world-space minimum corner.
pub(super) struct PlacedBlock<'a> {
    pub block: &'a Block,
    pub origin: Point3<f32>,
}

impl PlacedBlock<'_> {
    fn centre(&self) -> Point3<f32> {
        Point3::new(self.origin.x + 0.5, self.origin.y + 0.5, self.origin.z + 0.5)
    }
}

/// Sorts alpha-blended blocks so the one farthest from `camera_position` comes first.
pub(super) fn sort_back_to_front(blocks: &mut [PlacedBlock<'_>], camera_position: Point3<f32>) {
    blocks.sort_by(|a, b| {
        let distance_a = camera_position.distance2(a.centre());
        let distance_b = camera_position.distance2(b.centre());
        distance_b.partial_cmp(&distance_a).unwrap_or(Ordering::Equal)
    });
}

/// Emits all visible faces of `blocks` into `vertices`.
pub(super) fn emit_blocks(
    vertices: &mut Vec<Vertex>,
    blocks: &[PlacedBlock<'_>],
) -> Result<(), VoxelError> {
    let faces: u32 = blocks.iter().map(|placed| placed.block.visible_faces().count()).sum();
    vertices.reserve(faces as usize * VERTICES_PER_FACE);

    for placed in blocks {
        for face in placed.block.visible_faces().iter() {
            emit_face(vertices, placed.block, face, placed.origin)?;
        }
    }
    Ok(())
}

/// Emits the two triangles of one face of `block`, whose minimum corner is at `origin`.
pub(super) fn emit_face(
    vertices: &mut Vec<Vertex>,
    block: &Block,
    face: AxisDirections,
    origin: Point3<f32>,
) -> Result<(), VoxelError> {
    let block_type = block.block_type();
    // [bottom-left, top-left, top-right, bottom-right]
    let uvs = block_type.uv_coordinates(face)?;
    let [bottom_left, bottom_right, top_right, top_left] = face_corners(face, origin)?;
    let opacity = block_type.opacity;

    let bl = Vertex::new(bottom_left, uvs[0], opacity);
    let br = Vertex::new(bottom_right, uvs[3], opacity);
    let tr = Vertex::new(top_right, uvs[2], opacity);
    let tl = Vertex::new(top_left, uvs[1], opacity);

    vertices.extend_from_slice(&[bl, br, tr, bl, tr, tl]);
    Ok(())
}

/// Corners of one face as bottom-left, bottom-right, top-right, top-left, seen from
/// outside the block.
pub(super) fn face_corners(
    face: AxisDirections,
    origin: Point3<f32>,
) -> Result<[[f32; 3]; 4], VoxelError> {
    let Point3 { x, y, z } = origin;
    let (x1, y1, z1) = (x + 1.0, y + 1.0, z + 1.0);

    let corners = match face {
        AxisDirections::X_POSITIVE => [[x1, y, z1], [x1, y, z], [x1, y1, z], [x1, y1, z1]],
        AxisDirections::X_NEGATIVE => [[x, y, z], [x, y, z1], [x, y1, z1], [x, y1, z]],
        AxisDirections::Y_POSITIVE => [[x, y1, z1], [x1, y1, z1], [x1, y1, z], [x, y1, z]],
        AxisDirections::Y_NEGATIVE => [[x, y, z], [x1, y, z], [x1, y, z1], [x, y, z1]],
        AxisDirections::Z_POSITIVE => [[x, y, z1], [x1, y, z1], [x1, y1, z1], [x, y1, z1]],
        AxisDirections::Z_NEGATIVE => [[x1, y, z], [x, y, z], [x, y1, z], [x1, y1, z]],
        other => return Err(VoxelError::InvalidFace(other.bits())),
    };
    Ok(corners)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use cgmath::{InnerSpace, Vector3};

    use super::*;
    use crate::engine_state::voxels::block::block_type::{BlockType, TextureRect};

    fn normal_of(triangle: &[Vertex]) -> Vector3<f32> {
        let a = Vector3::from(triangle[0].position);
        let b = Vector3::from(triangle[1].position);
        let c = Vector3::from(triangle[2].position);
        (b - a).cross(c - a).normalize()
    }

    fn solid_block() -> Block {
        let mut block = Block::new(Rc::new(BlockType::with_texture(
            "Dirt",
            TextureRect::new(16, 0, 8, 8),
        )));
        block.set_face_visible(AxisDirections::ALL);
        block
    }

    #[test]
    fn every_face_winds_counter_clockwise_from_outside() {
        let block = solid_block();
        for face in AxisDirections::FACES {
            let mut vertices = Vec::new();
            emit_face(&mut vertices, &block, face, Point3::new(3.0, 4.0, 5.0)).unwrap();
            assert_eq!(vertices.len(), VERTICES_PER_FACE);

            let (dx, dy, dz) = face.neighbour_offset().unwrap();
            let outward = Vector3::new(dx as f32, dy as f32, dz as f32);
            for triangle in vertices.chunks(3) {
                assert!((normal_of(triangle) - outward).magnitude() < 1e-5, "{:?}", face);
            }
        }
    }

    #[test]
    fn face_corners_lie_on_the_face_plane() {
        let origin = Point3::new(0.0, 0.0, 0.0);
        for corner in face_corners(AxisDirections::Y_POSITIVE, origin).unwrap() {
            assert_eq!(corner[1], 1.0);
        }
        for corner in face_corners(AxisDirections::X_NEGATIVE, origin).unwrap() {
            assert_eq!(corner[0], 0.0);
        }
        assert!(face_corners(AxisDirections::ALL, origin).is_err());
    }

    #[test]
    fn top_of_side_texture_maps_to_top_of_face() {
        let block = solid_block();
        let mut vertices = Vec::new();
        emit_face(&mut vertices, &block, AxisDirections::Z_POSITIVE, Point3::new(0.0, 0.0, 0.0))
            .unwrap();
        let uvs = block
            .block_type()
            .uv_coordinates(AxisDirections::Z_POSITIVE)
            .unwrap();
        for vertex in &vertices {
            let expected_v = if vertex.position[1] == 1.0 { uvs[1][1] } else { uvs[0][1] };
            assert_eq!(vertex.tex_coords[1], expected_v);
        }
    }

    #[test]
    fn back_to_front_puts_the_farthest_block_first() {
        let block = solid_block();
        let mut placed = vec![
            PlacedBlock { block: &block, origin: Point3::new(1.0, 0.0, 0.0) },
            PlacedBlock { block: &block, origin: Point3::new(9.0, 0.0, 0.0) },
            PlacedBlock { block: &block, origin: Point3::new(4.0, 0.0, 0.0) },
        ];
        sort_back_to_front(&mut placed, Point3::new(0.0, 0.5, 0.5));
        let order: Vec<f32> = placed.iter().map(|p| p.origin.x).collect();
        assert_eq!(order, vec![9.0, 4.0, 1.0]);
    }
}
