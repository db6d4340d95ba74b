//! # Block Type Registry
//!
//! Maps string ids (`"grass"`, `"leaves"`, ...) to shared [`BlockType`]s. The registry is
//! filled once during start-up and then only read from; generators and structures resolve
//! the types they need through [`BlockTypeRegistry::get`].

use std::{collections::HashMap, rc::Rc};

use log::debug;

use crate::engine_state::error::VoxelError;

use super::block_type::{AtlasSize, BlockType, TextureRect};

/// Id of the invisible filler type.
pub const AIR: &str = "air";
/// Id of the surface type terrain generators grow structures on.
pub const GRASS: &str = "grass";
/// Id of the sub-surface filler type.
pub const DIRT: &str = "dirt";
/// Id of the tree trunk type.
pub const LOG: &str = "log";
/// Id of the translucent canopy type.
pub const LEAVES: &str = "leaves";
/// Id of the translucent marker type.
pub const DEBUG: &str = "debug";

/// Owner of every registered [`BlockType`].
pub struct BlockTypeRegistry {
    atlas: AtlasSize,
    types: HashMap<String, Rc<BlockType>>,
}

impl BlockTypeRegistry {
    /// Creates an empty registry whose types will be normalised against `atlas`.
    pub fn new(atlas: AtlasSize) -> Self {
        Self {
            atlas,
            types: HashMap::new(),
        }
    }

    /// Creates a registry already holding the standard block types.
    pub fn with_standard_block_types(atlas: AtlasSize) -> Result<Self, VoxelError> {
        let mut registry = Self::new(atlas);
        registry.register_standard_block_types()?;
        Ok(registry)
    }

    /// Registers `block_type` under `id`.
    ///
    /// # Errors
    /// [`VoxelError::DuplicateBlockType`] if `id` is taken. The existing entry is kept.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        block_type: BlockType,
    ) -> Result<Rc<BlockType>, VoxelError> {
        let id = id.into();
        if self.types.contains_key(&id) {
            return Err(VoxelError::DuplicateBlockType(id));
        }

        let block_type = Rc::new(block_type.with_atlas(self.atlas));
        debug!("Registered block type {} ({})", id, block_type.name());
        self.types.insert(id, block_type.clone());
        Ok(block_type)
    }

    /// Looks up the type registered under `id`.
    ///
    /// # Errors
    /// [`VoxelError::UnknownBlockType`] if nothing is registered under `id`.
    pub fn get(&self, id: &str) -> Result<Rc<BlockType>, VoxelError> {
        self.types
            .get(id)
            .cloned()
            .ok_or_else(|| VoxelError::UnknownBlockType(id.to_string()))
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Registers air, grass, dirt, log, leaves and debug.
    pub fn register_standard_block_types(&mut self) -> Result<(), VoxelError> {
        self.register(AIR, BlockType::new("Air").invisible())?;
        self.register(
            GRASS,
            BlockType::with_faces(
                "Grass",
                TextureRect::new(0, 0, 8, 8),
                TextureRect::new(8, 0, 8, 8),
                TextureRect::new(16, 0, 8, 8),
            ),
        )?;
        self.register(
            DIRT,
            BlockType::with_texture("Dirt", TextureRect::new(16, 0, 8, 8)),
        )?;
        self.register(
            LOG,
            BlockType::with_top_and_underside(
                "Wooden log",
                TextureRect::new(40, 0, 8, 8),
                TextureRect::new(24, 0, 8, 8),
            ),
        )?;
        self.register(
            LEAVES,
            BlockType::with_texture("Leaves", TextureRect::new(32, 0, 8, 8)).alpha_blended(128),
        )?;
        self.register(
            DEBUG,
            BlockType::with_texture("Debug", TextureRect::new(0, 8, 8, 8)).alpha_blended(u8::MAX),
        )?;
        Ok(())
    }
}
