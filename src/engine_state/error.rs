//! # Errors
//!
//! Two error families live here:
//!
//! * [`VoxelError`] - lookup failures inside the voxel model (unknown block type ids,
//!   malformed face requests, bad structure layouts). These are programming or content
//!   errors and are returned to the caller rather than logged.
//! * [`EngineError`] - everything that can go wrong while bringing the engine up:
//!   reading assets, decoding the atlas, talking to the GPU, creating the event loop.
//!
//! Out-of-range world coordinates are *not* errors; those APIs return `Option` or
//! silently do nothing.

use std::{fmt, path::PathBuf};

/// Errors raised by the voxel model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoxelError {
    /// No block type is registered under this id.
    UnknownBlockType(String),
    /// A block type is already registered under this id.
    DuplicateBlockType(String),
    /// A UV lookup was requested for something other than a single face flag.
    InvalidFace(u8),
    /// A structure layout referenced a type slot that does not exist.
    InvalidStructureIndex {
        /// The offending index from the layout.
        index: u8,
        /// How many type slots the structure declared.
        types: usize,
    },
    /// The requested world does not fit in `i32` block coordinates.
    WorldTooLarge {
        /// Requested chunks along X.
        width_in_chunks: u32,
        /// Requested chunks along Z.
        length_in_chunks: u32,
    },
    /// A structure layout does not have the dimensions of the structure it fills.
    StructureSizeMismatch {
        /// `(width, height, length)` of the structure.
        expected: (usize, usize, usize),
        /// `(width, height, length)` of the layout.
        found: (usize, usize, usize),
    },
}

impl fmt::Display for VoxelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoxelError::UnknownBlockType(id) => write!(f, "unknown block type: {}", id),
            VoxelError::DuplicateBlockType(id) => {
                write!(f, "block type already registered: {}", id)
            }
            VoxelError::InvalidFace(bits) => {
                write!(f, "expected a single face direction, got {:#08b}", bits)
            }
            VoxelError::InvalidStructureIndex { index, types } => write!(
                f,
                "structure layout index {} is out of range for {} block types",
                index, types
            ),
            VoxelError::WorldTooLarge {
                width_in_chunks,
                length_in_chunks,
            } => write!(
                f,
                "a world of {}x{} chunks is too large",
                width_in_chunks, length_in_chunks
            ),
            VoxelError::StructureSizeMismatch { expected, found } => write!(
                f,
                "structure layout is {}x{}x{} but the structure is {}x{}x{}",
                found.0, found.1, found.2, expected.0, expected.1, expected.2
            ),
        }
    }
}

impl std::error::Error for VoxelError {}

/// Errors that abort engine start-up.
#[derive(Debug)]
pub enum EngineError {
    /// An asset or settings file could not be read.
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// The settings file is not valid JSON for [`GameSettings`](super::settings::GameSettings).
    Settings(serde_json::Error),
    /// The block atlas could not be decoded.
    Image(image::ImageError),
    /// Building the voxel model failed.
    Voxel(VoxelError),
    /// No GPU adapter is compatible with the window surface.
    NoAdapter(wgpu::RequestAdapterError),
    /// The adapter refused to hand out a device.
    RequestDevice(wgpu::RequestDeviceError),
    /// The window surface could not be created.
    CreateSurface(wgpu::CreateSurfaceError),
    /// The adapter cannot present to the window surface.
    UnsupportedSurface,
    /// The OS refused to create the window.
    Window(winit::error::OsError),
    /// The event loop could not be created or exited abnormally.
    EventLoop(winit::error::EventLoopError),
}

impl EngineError {
    /// Wraps an I/O error with the path that produced it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            EngineError::Settings(e) => write!(f, "invalid settings file: {}", e),
            EngineError::Image(e) => write!(f, "failed to decode block atlas: {}", e),
            EngineError::Voxel(e) => write!(f, "voxel setup failed: {}", e),
            EngineError::NoAdapter(e) => write!(f, "no compatible GPU adapter: {}", e),
            EngineError::RequestDevice(e) => write!(f, "failed to request GPU device: {}", e),
            EngineError::CreateSurface(e) => write!(f, "failed to create surface: {}", e),
            EngineError::UnsupportedSurface => {
                write!(f, "the GPU adapter cannot present to the window surface")
            }
            EngineError::Window(e) => write!(f, "failed to create window: {}", e),
            EngineError::EventLoop(e) => write!(f, "event loop error: {}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Io { source, .. } => Some(source),
            EngineError::Settings(e) => Some(e),
            EngineError::Image(e) => Some(e),
            EngineError::Voxel(e) => Some(e),
            EngineError::NoAdapter(e) => Some(e),
            EngineError::RequestDevice(e) => Some(e),
            EngineError::CreateSurface(e) => Some(e),
            EngineError::UnsupportedSurface => None,
            EngineError::Window(e) => Some(e),
            EngineError::EventLoop(e) => Some(e),
        }
    }
}

impl From<VoxelError> for EngineError {
    fn from(e: VoxelError) -> Self {
        EngineError::Voxel(e)
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Settings(e)
    }
}

impl From<image::ImageError> for EngineError {
    fn from(e: image::ImageError) -> Self {
        EngineError::Image(e)
    }
}

impl From<wgpu::RequestAdapterError> for EngineError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        EngineError::NoAdapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for EngineError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        EngineError::RequestDevice(e)
    }
}

impl From<wgpu::CreateSurfaceError> for EngineError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        EngineError::CreateSurface(e)
    }
}

impl From<winit::error::OsError> for EngineError {
    fn from(e: winit::error::OsError) -> Self {
        EngineError::Window(e)
    }
}

impl From<winit::error::EventLoopError> for EngineError {
    fn from(e: winit::error::EventLoopError) -> Self {
        EngineError::EventLoop(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voxel_errors_name_the_offender() {
        let e = VoxelError::UnknownBlockType("marble".into());
        assert!(e.to_string().contains("marble"));

        let e = VoxelError::InvalidStructureIndex { index: 7, types: 3 };
        assert!(e.to_string().contains('7'));
    }

    #[test]
    fn voxel_error_converts_into_engine_error() {
        let engine: EngineError = VoxelError::DuplicateBlockType("dirt".into()).into();
        assert!(matches!(engine, EngineError::Voxel(VoxelError::DuplicateBlockType(_))));
        assert!(std::error::Error::source(&engine).is_some());
    }
}
