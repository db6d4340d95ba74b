#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A real-time voxel world renderer built with Rust and WGPU.
//!
//! A fixed grid of 16×64×16 chunks is filled by a terrain generator (flat, or layered
//! Perlin noise with caves and trees). Each chunk derives its visible faces from block
//! adjacency and uploads them as vertex buffers. Frames draw opaque geometry first, then
//! alpha-blended geometry back to front.
//!
//! ## Key Modules
//!
//! * `application_state` - Window, GPU initialization, input and the event loop handler
//! * `engine_state` - The world, camera, renderer and everything they are built from
//!
//! ## Usage
//!
//! ```no_run
//! fn main() -> Result<(), voxel_world::EngineError> {
//!     voxel_world::run()
//! }
//! ```
//!
//! Run from the repository root so `assets/` can be found. `RUST_LOG` sets the log level.

use application_state::{
    graphics_resources_builder::{GraphicsBuilder, MaybeGraphics},
    ApplicationState,
};
use log::info;
use winit::event_loop::EventLoop;

mod application_state;
mod engine_state;

pub use engine_state::error::EngineError;

/// Initializes logging, opens the window and runs the event loop until it exits.
///
/// # Errors
/// The first start-up failure: missing or malformed settings and assets, no usable GPU, or
/// an event loop that could not be created.
pub fn run() -> Result<(), EngineError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
    let event_loop = EventLoop::with_user_event().build()?;

    let mut state = ApplicationState::new(MaybeGraphics::Builder(GraphicsBuilder::new(
        event_loop.create_proxy(),
    )));

    event_loop.run_app(&mut state)?;

    match state.exit_error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
