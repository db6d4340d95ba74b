//! # Voxel World Entry Point
//!
//! Calls into the library's `run()` and turns a start-up failure into a non-zero exit.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    match voxel_world::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Voxel world stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}
