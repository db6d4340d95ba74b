//! # Block Type Module
//!
//! A [`BlockType`] is the shared description of a kind of block: its display name, how it
//! interacts with face culling and blending, and which regions of the block atlas texture
//! its faces sample from.
//!
//! Block types are created once at start-up, handed to the
//! [`BlockTypeRegistry`](super::registry::BlockTypeRegistry) and from then on only shared
//! through `Rc`. Nothing mutates a registered type.

use crate::engine_state::error::VoxelError;

use super::axis_directions::AxisDirections;

/// A rectangle of the block atlas, in pixels, with the origin at the top-left.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct TextureRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl TextureRect {
    /// Creates a rectangle from its top-left corner and size.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the right-most pixel column.
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// One past the bottom-most pixel row.
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Pixel dimensions of the block atlas, used to normalise texture rectangles into UVs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AtlasSize {
    /// Atlas width in pixels.
    pub width: u32,
    /// Atlas height in pixels.
    pub height: u32,
}

impl Default for AtlasSize {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
        }
    }
}

/// The shared properties of every block of one kind.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockType {
    name: String,
    /// Invisible types (air) are never drawn and never hide their neighbours' faces.
    pub is_invisible: bool,
    /// 0 is fully transparent, 255 fully opaque. Carried into the vertex alpha.
    pub opacity: u8,
    /// Alpha-blended types are drawn in the sorted transparent pass and never hide their
    /// neighbours' faces.
    pub is_alpha_blended: bool,
    top: TextureRect,
    side: TextureRect,
    bottom: TextureRect,
    atlas: AtlasSize,
}

impl BlockType {
    /// A type with no texture, such as air.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_faces(
            name,
            TextureRect::default(),
            TextureRect::default(),
            TextureRect::default(),
        )
    }

    /// A type using `rect` on every face.
    pub fn with_texture(name: impl Into<String>, rect: TextureRect) -> Self {
        Self::with_faces(name, rect, rect, rect)
    }

    /// A type with its own top texture and one texture shared by the sides and bottom.
    pub fn with_top_and_underside(
        name: impl Into<String>,
        top: TextureRect,
        underside: TextureRect,
    ) -> Self {
        Self::with_faces(name, top, underside, underside)
    }

    /// A type with separate top, side and bottom textures.
    pub fn with_faces(
        name: impl Into<String>,
        top: TextureRect,
        side: TextureRect,
        bottom: TextureRect,
    ) -> Self {
        Self {
            name: name.into(),
            is_invisible: false,
            opacity: u8::MAX,
            is_alpha_blended: false,
            top,
            side,
            bottom,
            atlas: AtlasSize::default(),
        }
    }

    /// Marks the type as never drawn.
    pub fn invisible(mut self) -> Self {
        self.is_invisible = true;
        self
    }

    /// Marks the type as alpha-blended with the given opacity.
    pub fn alpha_blended(mut self, opacity: u8) -> Self {
        self.is_alpha_blended = true;
        self.opacity = opacity;
        self
    }

    /// Sets the atlas size used to normalise this type's texture rectangles.
    pub(super) fn with_atlas(mut self, atlas: AtlasSize) -> Self {
        self.atlas = atlas;
        self
    }

    /// Human readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a neighbour of this type leaves the adjoining face of a block exposed.
    pub fn exposes_neighbours(&self) -> bool {
        self.is_invisible || self.is_alpha_blended
    }

    /// Returns the atlas UVs for one face.
    ///
    /// The corners come back as bottom-left, top-left, top-right, bottom-right. The top face
    /// uses the top rectangle, the bottom face the bottom rectangle and the four sides share
    /// the side rectangle.
    ///
    /// # Errors
    /// [`VoxelError::InvalidFace`] unless `face` is exactly one of the six face flags.
    pub fn uv_coordinates(&self, face: AxisDirections) -> Result<[[f32; 2]; 4], VoxelError> {
        let rect = match face {
            AxisDirections::Y_POSITIVE => self.top,
            AxisDirections::Y_NEGATIVE => self.bottom,
            AxisDirections::X_POSITIVE
            | AxisDirections::X_NEGATIVE
            | AxisDirections::Z_POSITIVE
            | AxisDirections::Z_NEGATIVE => self.side,
            other => return Err(VoxelError::InvalidFace(other.bits())),
        };

        let width = self.atlas.width as f32;
        let height = self.atlas.height as f32;
        let left = rect.x as f32 / width;
        let right = rect.right() as f32 / width;
        let top = rect.y as f32 / height;
        let bottom = rect.bottom() as f32 / height;

        Ok([[left, bottom], [left, top], [right, top], [right, bottom]])
    }
}
