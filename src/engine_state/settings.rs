//! # Game Settings
//!
//! Start-up configuration read once from `assets/settings.json`. Every field has a
//! default, so the file may list only what it changes or be missing entirely.

use std::{io, path::Path};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::{error::EngineError, voxels::generators::GeneratorKind};

/// Where the settings file lives, relative to the working directory.
pub const SETTINGS_PATH: &str = "assets/settings.json";

/// Start-up configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameSettings {
    /// Pixel width of the block atlas, used to normalise texture rectangles.
    pub atlas_width: u32,
    /// Pixel height of the block atlas.
    pub atlas_height: u32,
    pub field_of_view_degrees: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    pub world_width_in_chunks: u32,
    pub world_length_in_chunks: u32,
    pub generator: GeneratorKind,
    pub seed: u64,
    /// Carve caves into Perlin terrain.
    pub caves: bool,
    pub window_width: u32,
    pub window_height: u32,
    /// Free-look movement speed in blocks per second.
    pub camera_speed: f32,
    /// Free-look mouse sensitivity in radians per pixel.
    pub mouse_sensitivity: f32,
    /// Flat ambient light multiplied into every texel.
    pub ambient_color: [f32; 3],
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            atlas_width: 64,
            atlas_height: 64,
            field_of_view_degrees: 90.0,
            near_plane: 0.1,
            far_plane: 1000.0,
            world_width_in_chunks: 8,
            world_length_in_chunks: 8,
            generator: GeneratorKind::Perlin,
            seed: 0,
            caves: true,
            window_width: 1280,
            window_height: 720,
            camera_speed: 20.0,
            mouse_sensitivity: 0.003,
            ambient_color: [1.0, 1.0, 1.0],
        }
    }
}

impl GameSettings {
    /// Parses settings from JSON text.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads settings from `path`, falling back to defaults when the file does not exist.
    ///
    /// # Errors
    /// [`EngineError::Io`] if the file exists but cannot be read, and
    /// [`EngineError::Settings`] if it is not valid settings JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                warn!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(error) => Err(EngineError::io(path, error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_keep_defaults() {
        let settings = GameSettings::from_json(r#"{ "seed": 42, "generator": "Flat" }"#).unwrap();
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.generator, GeneratorKind::Flat);
        assert_eq!(settings.atlas_width, 64);
        assert_eq!(settings.world_width_in_chunks, 8);
    }

    #[test]
    fn malformed_files_are_errors() {
        assert!(matches!(
            GameSettings::from_json("{ \"seed\": \"many\" }"),
            Err(EngineError::Settings(_))
        ));
    }

    #[test]
    fn missing_files_mean_defaults() {
        let settings = GameSettings::load("does/not/exist/settings.json").unwrap();
        assert_eq!(settings, GameSettings::default());
    }
}
