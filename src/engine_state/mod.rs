//! # Engine State Module
//!
//! Owns everything the running application needs after the window and GPU exist: the
//! voxel world, the camera and the scene renderer.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `camera_state` - Orbit demo and free-look camera
//! * `rendering` - Scene renderer, pipelines and GPU buffers
//! * `voxels` - Blocks, chunks, terrain generation and the world grid
//! * `noise` - Seeded Perlin noise used by terrain generation
//! * `settings` - Start-up configuration
//! * `error` - Error types
//!
//! ## Frame Flow
//!
//! 1. [`EngineState::set_input_commands`] turns the frame's input into a [`PlayerAction`]
//! 2. [`EngineState::process_input`] moves the camera
//! 3. [`EngineState::render`] rebuilds dirty chunks, then draws the world in two passes

use camera_state::CameraState;
use image::RgbaImage;
use log::{error, info, warn};
use rendering::scene_renderer::{RenderPassConfig, SceneRenderer};
use settings::GameSettings;
use voxels::{
    block::{block_type::AtlasSize, registry::BlockTypeRegistry},
    generators::create_generator,
    world::World,
};
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::keyboard::KeyCode;

use crate::application_state::input_state::ProcessedInputState;

mod camera_state;
pub mod error;
mod noise;
mod rendering;
pub mod settings;
mod voxels;

use error::EngineError;

/// The main state container for the voxel world renderer.
pub struct EngineState {
    /// The window surface being rendered to
    surface: Surface<'static>,
    /// Size and format of the surface
    surface_config: SurfaceConfiguration,
    device: Device,
    queue: Queue,
    settings: GameSettings,
    /// The generated voxel world
    world: World,
    /// Camera state managing position, orientation and movement
    camera_state: CameraState,
    /// Two-pass renderer the world submits its buffers to
    scene_renderer: SceneRenderer,
    /// Current player actions derived from input
    player_actions: PlayerAction,
}

impl EngineState {
    /// Builds the world and every rendering resource.
    ///
    /// # Arguments
    /// * `surface` - The configured window surface
    /// * `surface_config` - Configuration for the rendering surface
    /// * `device` - The GPU device
    /// * `queue` - The GPU command queue
    /// * `settings` - Start-up configuration
    /// * `shader_source` - WGSL source of the block shader
    /// * `atlas` - Decoded block atlas
    ///
    /// # Errors
    /// [`EngineError::Voxel`] if the standard block types or the generator cannot be set up.
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        settings: GameSettings,
        shader_source: &str,
        atlas: &RgbaImage,
    ) -> Result<Self, EngineError> {
        if atlas.dimensions() != (settings.atlas_width, settings.atlas_height) {
            warn!(
                "Block atlas is {}x{} but settings expect {}x{}; using the configured size for UVs",
                atlas.width(),
                atlas.height(),
                settings.atlas_width,
                settings.atlas_height
            );
        }

        let registry = BlockTypeRegistry::with_standard_block_types(AtlasSize {
            width: settings.atlas_width,
            height: settings.atlas_height,
        })?;
        info!("Registered {} block types", registry.len());

        let generator = create_generator(settings.generator, &registry, settings.seed, settings.caves)?;
        info!("Using the {} terrain generator", generator.name());

        let mut world = World::new(
            settings.world_width_in_chunks,
            settings.world_length_in_chunks,
            generator,
        )?;
        world.generate();

        let camera_state = CameraState::new(
            &settings,
            surface_config.width,
            surface_config.height,
            world.centre(),
        );

        let scene_renderer = SceneRenderer::new(&device, &queue, &surface_config, shader_source, atlas);

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            settings,
            world,
            camera_state,
            scene_renderer,
            player_actions: PlayerAction::default(),
        })
    }

    /// Resizes the rendering surface when the window size changes.
    ///
    /// # Arguments
    /// * `size` - The new physical size of the window
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }

        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.scene_renderer.resize(&self.device, &self.surface_config);
        self.camera_state.resize(size.width, size.height);
    }

    /// Rebuilds dirty chunk geometry and draws the current frame.
    pub fn render(&mut self) {
        let camera_position = self.camera_state.position();

        if let Err(e) = self.world.prepare_geometry(&self.device, camera_position) {
            error!("Failed to rebuild chunk geometry: {}", e);
        }

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                return;
            }
            Err(err) => {
                error!("Error getting current frame: {:?}", err);
                return;
            }
        };
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let pass_config = RenderPassConfig {
            view: self.camera_state.view_matrix(),
            projection: self.camera_state.projection_matrix(),
            vertex_color_enabled: true,
            texture_enabled: true,
            ambient_color: self.settings.ambient_color,
        };

        self.scene_renderer.begin(camera_position, pass_config);
        self.world.draw(&mut self.scene_renderer);
        self.scene_renderer.end(&self.device, &self.queue, &view);

        frame.present();
    }

    /// Moves the camera by the current player actions.
    ///
    /// # Arguments
    /// * `wait_duration` - The time elapsed since the last frame
    pub fn process_input(&mut self, wait_duration: web_time::Duration) {
        if self.player_actions.toggle_camera_mode {
            self.camera_state.toggle_mode();
            info!(
                "Camera switched to {}",
                if self.camera_state.is_orbiting() { "orbit" } else { "free-look" }
            );
        }

        self.camera_state.intake_actions(&self.player_actions);
        self.camera_state.update(wait_duration);
    }

    /// Sets the input commands for the engine state.
    ///
    /// # Arguments
    /// * `input` - The processed input state to use for setting commands
    pub fn set_input_commands(&mut self, input: &ProcessedInputState) {
        self.player_actions = translate_processed_input(input);
    }
}

/// Translates the processed input state into player actions.
///
/// # Arguments
/// * `input` - The processed input state to translate
///
/// # Returns
/// A PlayerAction struct with the appropriate actions set
fn translate_processed_input(input: &ProcessedInputState) -> PlayerAction {
    let held = |key| input.get_key_state(key).is_active();

    PlayerAction {
        move_forward: held(KeyCode::KeyW),
        move_backward: held(KeyCode::KeyS),
        move_left: held(KeyCode::KeyA),
        move_right: held(KeyCode::KeyD),
        move_up: held(KeyCode::Space),
        move_down: held(KeyCode::ShiftLeft),
        turn_left: held(KeyCode::ArrowLeft),
        turn_right: held(KeyCode::ArrowRight),
        turn_up: held(KeyCode::ArrowUp),
        turn_down: held(KeyCode::ArrowDown),
        rotate_view: input.get_mouse_delta().filter(|_| input.mouse_locked),
        toggle_camera_mode: input.get_key_state(KeyCode::KeyC).is_just_pressed(),
    }
}

/// Represents player actions derived from input.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlayerAction {
    /// Movement actions - true if key is pressed or held
    pub(crate) move_forward: bool,
    pub(crate) move_backward: bool,
    pub(crate) move_left: bool,
    pub(crate) move_right: bool,
    pub(crate) move_up: bool,
    pub(crate) move_down: bool,

    /// Keyboard rotation - true if the arrow key is pressed or held
    pub(crate) turn_left: bool,
    pub(crate) turn_right: bool,
    pub(crate) turn_up: bool,
    pub(crate) turn_down: bool,

    /// Mouse rotation - Some while the mouse is locked and has moved
    pub(crate) rotate_view: Option<(f64, f64)>,

    /// Only set on the frame the key goes down
    pub(crate) toggle_camera_mode: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_state::input_state::RawInputState;

    fn input_with(keys: &[(KeyCode, RawInputState)]) -> ProcessedInputState {
        ProcessedInputState {
            keyboard_states: keys.iter().copied().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn held_keys_move_and_turn() {
        let input = input_with(&[
            (KeyCode::KeyW, RawInputState::Held),
            (KeyCode::ShiftLeft, RawInputState::Pressed),
            (KeyCode::ArrowLeft, RawInputState::Held),
            (KeyCode::KeyD, RawInputState::Released),
        ]);
        let actions = translate_processed_input(&input);
        assert!(actions.move_forward);
        assert!(actions.move_down);
        assert!(actions.turn_left);
        assert!(!actions.move_right);
        assert!(!actions.toggle_camera_mode);
    }

    #[test]
    fn camera_toggle_fires_once_per_press() {
        let pressed = translate_processed_input(&input_with(&[(KeyCode::KeyC, RawInputState::Pressed)]));
        assert!(pressed.toggle_camera_mode);

        let held = translate_processed_input(&input_with(&[(KeyCode::KeyC, RawInputState::Held)]));
        assert!(!held.toggle_camera_mode);
    }

    #[test]
    fn mouse_only_rotates_while_locked() {
        let mut input = ProcessedInputState {
            mouse_delta: Some((3.0, -1.0)),
            ..Default::default()
        };
        assert_eq!(translate_processed_input(&input).rotate_view, None);

        input.mouse_locked = true;
        assert_eq!(translate_processed_input(&input).rotate_view, Some((3.0, -1.0)));
    }
}
